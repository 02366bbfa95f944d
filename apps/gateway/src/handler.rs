//! # HTTP リクエストハンドラ
//!
//! axum のルートに対応するハンドラ関数を定義する。
//!
//! ## 設計方針
//!
//! - 各ハンドラはサブモジュールに配置
//! - 親モジュールで re-export し、フラットな API を提供
//! - ハンドラは入力検証のみを行い、プロバイダ呼び出しはユースケースに委譲
//!
//! ## ハンドラ一覧
//!
//! - `health`: 稼働確認・ヘルスチェック
//! - `auth`: サインアップ、ログイン
//! - `idea`: アイデア分析（一括、ストリーミング）

pub mod auth;
pub mod health;
pub mod idea;

use axum::body::Bytes;
pub use auth::{AuthState, login, signup};
pub use health::{ReadinessState, health_check, readiness_check, root_status};
pub use idea::{AnalysisState, stream_validate_idea, validate_idea};

/// リクエストボディを寛容に JSON として読む
///
/// 空ボディや JSON として不正なボディは `null` として扱い、
/// 「必須フィールドの欠落」と同じ 400 に揃える。Content-Type は問わない。
pub(crate) fn parse_json_body(body: &Bytes) -> serde_json::Value {
   serde_json::from_slice(body).unwrap_or(serde_json::Value::Null)
}

#[cfg(test)]
mod tests {
   use pretty_assertions::assert_eq;

   use super::*;

   #[test]
   fn test_parse_json_body_正しいjsonはそのまま読む() {
      let body = Bytes::from_static(br#"{"idea": "x"}"#);

      assert_eq!(parse_json_body(&body), serde_json::json!({"idea": "x"}));
   }

   #[test]
   fn test_parse_json_body_不正なボディはnull() {
      assert_eq!(parse_json_body(&Bytes::new()), serde_json::Value::Null);
      assert_eq!(
         parse_json_body(&Bytes::from_static(b"idea=x")),
         serde_json::Value::Null
      );
   }
}
