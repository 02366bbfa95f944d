//! # ヘルスチェックハンドラ
//!
//! ゲートウェイの稼働状態を確認するためのエンドポイント。
//!
//! - `/`: 稼働確認（フロントエンド向けの固定メッセージ）
//! - `/health`: Liveness Check（常に `"healthy"` を返す）
//! - `/health/ready`: Readiness Check（プロバイダクライアントの初期化状態を確認）
//!
//! レスポンス型は [`venturelens_shared::HealthResponse`] / [`venturelens_shared::ReadinessResponse`] を参照。

use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use venturelens_shared::{CheckStatus, HealthResponse, ReadinessResponse, StatusResponse};

use crate::{
    error::Provider,
    usecase::{AnalysisUseCase, AuthUseCase},
};

/// 稼働確認メッセージ
pub const RUNNING_MESSAGE: &str = "AI Startup Validator is running";

/// 稼働確認エンドポイント
#[utoipa::path(
   get,
   path = "/",
   tag = "health",
   responses(
      (status = 200, description = "サーバー稼働中", body = StatusResponse)
   )
)]
pub async fn root_status() -> Json<StatusResponse> {
    Json(StatusResponse {
        status: RUNNING_MESSAGE.to_string(),
    })
}

/// Liveness Check エンドポイント
#[utoipa::path(
   get,
   path = "/health",
   tag = "health",
   responses(
      (status = 200, description = "サーバー稼働中", body = HealthResponse)
   )
)]
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status:  "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Readiness Check 用の State
pub struct ReadinessState {
    pub auth:     Arc<dyn AuthUseCase>,
    pub analysis: Arc<dyn AnalysisUseCase>,
}

/// Readiness Check エンドポイント
///
/// 両プロバイダのクライアントが初期化済みなら 200、どちらかが未初期化なら 503。
/// プロバイダへの疎通確認は行わない。
#[utoipa::path(
   get,
   path = "/health/ready",
   tag = "health",
   responses(
      (status = 200, description = "全プロバイダクライアントが利用可能", body = ReadinessResponse),
      (status = 503, description = "一部のプロバイダクライアントが未初期化", body = ReadinessResponse)
   )
)]
#[tracing::instrument(skip_all)]
pub async fn readiness_check(State(state): State<Arc<ReadinessState>>) -> impl IntoResponse {
    let response = ReadinessResponse::from_checks([
        (
            <&'static str>::from(Provider::AuthProvider),
            CheckStatus::from_ok(state.auth.is_ready()),
        ),
        (
            <&'static str>::from(Provider::ModelProvider),
            CheckStatus::from_ok(state.analysis.is_ready()),
        ),
    ]);

    let http_status = if response.is_ready() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (http_status, Json(response))
}
