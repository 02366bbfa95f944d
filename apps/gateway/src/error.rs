//! # ゲートウェイエラーハンドリング
//!
//! HTTP API のエラー定義と、axum レスポンスへの変換。
//!
//! ## エラーの種類と HTTP ステータスの対応
//!
//! | エラー種別 | HTTP ステータス | 用途 |
//! |-----------|----------------|------|
//! | `Validation` | 400 | 必須フィールドの欠落 |
//! | `UpstreamUnavailable` | 500 | プロバイダクライアントが未初期化 |
//! | `UpstreamRejected` | 400 | プロバイダがドメインエラーを返した |
//! | `Parse` | 500 | モデル出力がスキーマに合致しない |
//! | `Upstream` | 500 | その他のプロバイダ障害 |
//!
//! ボディは常に `{"error": "<メッセージ>"}`。

use axum::{
   Json,
   http::StatusCode,
   response::{IntoResponse, Response},
};
use strum::IntoStaticStr;
use thiserror::Error;
use venturelens_domain::{AnalysisParseError, DomainError};
use venturelens_shared::ErrorResponse;

/// 外部プロバイダの種別
///
/// Readiness Check のチェック名にもこの文字列を使う。
#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoStaticStr, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum Provider {
   /// 認証プロバイダ（Supabase）
   AuthProvider,
   /// 言語モデルプロバイダ（Mistral）
   ModelProvider,
}

/// ゲートウェイで発生するエラー
#[derive(Debug, Error)]
pub enum GatewayError {
   /// 必須フィールドの欠落
   #[error("{0}")]
   Validation(String),

   /// プロバイダクライアントが初期化されていない
   #[error("{}", unavailable_message(.0))]
   UpstreamUnavailable(Provider),

   /// プロバイダがドメインエラーを返した
   #[error("{0}")]
   UpstreamRejected(String),

   /// モデル出力の解釈失敗
   #[error("An error occurred: {0}")]
   Parse(#[from] AnalysisParseError),

   /// その他のプロバイダ障害
   #[error("{0}")]
   Upstream(String),
}

fn unavailable_message(provider: &Provider) -> &'static str {
   match provider {
      Provider::AuthProvider => "Supabase client not initialized.",
      Provider::ModelProvider => "AI Model not initialized. Check API Key.",
   }
}

impl From<DomainError> for GatewayError {
   fn from(err: DomainError) -> Self {
      GatewayError::Validation(err.client_message().to_string())
   }
}

impl GatewayError {
   /// HTTP ステータスコード
   pub fn status_code(&self) -> StatusCode {
      match self {
         GatewayError::Validation(_) | GatewayError::UpstreamRejected(_) => StatusCode::BAD_REQUEST,
         GatewayError::UpstreamUnavailable(_) | GatewayError::Parse(_) | GatewayError::Upstream(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
         }
      }
   }
}

impl IntoResponse for GatewayError {
   fn into_response(self) -> Response {
      (self.status_code(), Json(ErrorResponse::new(self.to_string()))).into_response()
   }
}

/// ストリーミング中のエラーを本文内で伝える最終チャンク
///
/// `{"error": "An error occurred during streaming: <detail>"}` を正しくエスケープして返す。
pub fn stream_error_chunk(detail: &str) -> String {
   ErrorResponse::new(format!("An error occurred during streaming: {detail}")).to_json_string()
}
