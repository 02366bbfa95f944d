//! # エラーレスポンス
//!
//! 全エンドポイントで共通のエラーレスポンス構造体を提供する。
//!
//! ## 設計
//!
//! - 形式は `{"error": "<人間が読めるメッセージ>"}` の 1 フィールドのみ
//! - HTTP ステータスはボディに含めない（レスポンスのステータス行で表現する）
//! - `ErrorResponse` は純粋なデータ構造（`Serialize` / `Deserialize` のみ）
//! - axum の `IntoResponse` 変換は各サービスの責務（shared に axum 依存を入れない）

use serde::{Deserialize, Serialize};

/// エラーレスポンス
///
/// フロントエンドは `error` フィールドの文字列をそのまま表示する。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ErrorResponse {
   /// エラーメッセージ
   pub error: String,
}

impl ErrorResponse {
   /// メッセージからエラーレスポンスを作成する
   pub fn new(message: impl Into<String>) -> Self {
      Self {
         error: message.into(),
      }
   }

   /// JSON 文字列にシリアライズする
   ///
   /// ストリーミングレスポンスのように `Json` エクストラクタを通さずに
   /// ボディを組み立てる箇所で使う。
   pub fn to_json_string(&self) -> String {
      serde_json::to_string(self).unwrap_or_else(|_| r#"{"error":"internal error"}"#.to_string())
   }
}

#[cfg(test)]
mod tests {
   use pretty_assertions::assert_eq;

   use super::*;

   #[test]
   fn test_new_でメッセージが設定される() {
      let error = ErrorResponse::new("Email and password are required.");

      assert_eq!(error.error, "Email and password are required.");
   }

   #[test]
   fn test_jsonシリアライズでerrorフィールドのみを持つ() {
      let error = ErrorResponse::new("boom");
      let json = serde_json::to_value(&error).unwrap();

      assert_eq!(json, serde_json::json!({ "error": "boom" }));
   }

   #[test]
   fn test_to_json_stringで制御文字と引用符がエスケープされる() {
      let error = ErrorResponse::new("quote \" newline \n");
      let parsed: serde_json::Value = serde_json::from_str(&error.to_json_string()).unwrap();

      assert_eq!(parsed["error"], "quote \" newline \n");
   }

   #[test]
   fn test_jsonデシリアライズが正しく動作する() {
      let error: ErrorResponse = serde_json::from_str(r#"{"error": "見つかりません"}"#).unwrap();

      assert_eq!(error.error, "見つかりません");
   }
}
