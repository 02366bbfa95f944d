//! # 認証ハンドラ
//!
//! メール/パスワードでのサインアップとログインを認証プロバイダへ中継する。
//!
//! ## エンドポイント
//!
//! - `POST /signup` - サインアップ（201）
//! - `POST /login` - ログイン（200、セッションをそのまま返す）

use std::sync::Arc;

use axum::{Json, body::Bytes, extract::State, http::StatusCode};
use utoipa::ToSchema;
use venturelens_domain::credentials::Credentials;
use venturelens_shared::ErrorResponse;

use super::parse_json_body;
use crate::{
   error::GatewayError,
   usecase::{AuthUseCase, SignUpResult},
};

/// 認証ハンドラの State
pub struct AuthState {
   pub usecase: Arc<dyn AuthUseCase>,
}

// --- リクエスト型 ---

/// 認証リクエスト（OpenAPI ドキュメント用）
///
/// ボディは `parse_json_body` と [`Credentials::from_json`] で寛容に読み取る
/// （欠落・空・文字列以外はすべて 400）。
#[derive(Debug, ToSchema)]
pub struct CredentialsRequest {
   pub email:    String,
   pub password: String,
}

/// POST /signup
///
/// ## リクエストボディ
///
/// ```json
/// {
///   "email": "user@example.com",
///   "password": "password123"
/// }
/// ```
#[utoipa::path(
   post,
   path = "/signup",
   tag = "auth",
   request_body = CredentialsRequest,
   responses(
      (status = 201, description = "サインアップ成功", body = SignUpResult),
      (status = 400, description = "必須フィールドの欠落、またはプロバイダによる拒否", body = ErrorResponse),
      (status = 500, description = "クライアント未初期化、またはプロバイダ障害", body = ErrorResponse)
   )
)]
#[tracing::instrument(skip_all)]
pub async fn signup(
   State(state): State<Arc<AuthState>>,
   body: Bytes,
) -> Result<(StatusCode, Json<SignUpResult>), GatewayError> {
   let credentials = Credentials::from_json(&parse_json_body(&body))?;

   let result = state.usecase.sign_up(&credentials).await?;

   tracing::info!("サインアップ成功");
   Ok((StatusCode::CREATED, Json(result)))
}

/// POST /login
///
/// プロバイダが発行したセッション（アクセストークン等）を加工せずに返す。
#[utoipa::path(
   post,
   path = "/login",
   tag = "auth",
   request_body = CredentialsRequest,
   responses(
      (status = 200, description = "ログイン成功（プロバイダのセッション）", body = serde_json::Value),
      (status = 400, description = "必須フィールドの欠落、またはプロバイダによる拒否", body = ErrorResponse),
      (status = 500, description = "クライアント未初期化、またはプロバイダ障害", body = ErrorResponse)
   )
)]
#[tracing::instrument(skip_all)]
pub async fn login(
   State(state): State<Arc<AuthState>>,
   body: Bytes,
) -> Result<Json<serde_json::Value>, GatewayError> {
   let credentials = Credentials::from_json(&parse_json_body(&body))?;

   let session = state.usecase.login(&credentials).await?;

   Ok(Json(session))
}
