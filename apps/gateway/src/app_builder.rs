//! # ゲートウェイアプリケーション構築
//!
//! DI（クライアント・ユースケース・State）の初期化とルーター構築を担当する。
//! `main.rs` は設定読み込みとサーバー起動に集中する。

use std::sync::Arc;

use axum::{
    Router,
    middleware::from_fn,
    routing::{get, post},
};
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use venturelens_shared::{
    canonical_log::CanonicalLogLineLayer,
    observability::{MakeRequestUuidV7, make_request_span},
};

use crate::{
    client::{AuthProviderClient, ModelProviderClient, build_auth_client, build_model_client},
    config::{GatewayConfig, StreamErrorMode},
    handler::{
        AnalysisState,
        AuthState,
        ReadinessState,
        health_check,
        login,
        readiness_check,
        root_status,
        signup,
        stream_validate_idea,
        validate_idea,
    },
    middleware::no_cache,
    usecase::{AnalysisUseCase, AnalysisUseCaseImpl, AuthUseCase, AuthUseCaseImpl},
};

/// ゲートウェイが使うプロバイダクライアント
///
/// `None` は未初期化を表す。該当エンドポイントは 500 を返す。
#[derive(Clone, Default)]
pub struct GatewayClients {
    pub auth:  Option<Arc<dyn AuthProviderClient>>,
    pub model: Option<Arc<dyn ModelProviderClient>>,
}

impl GatewayClients {
    /// 設定からクライアントを構築する
    pub fn from_config(config: &GatewayConfig) -> Self {
        Self {
            auth:  build_auth_client(config),
            model: build_model_client(config),
        }
    }
}

/// DI コンテナの構築とルーター定義を行う
///
/// クライアント → ユースケース → State → Router の順に組み立てる。
pub fn build_app(clients: GatewayClients, stream_error_mode: StreamErrorMode) -> Router {
    // ユースケースはハンドラ State と Readiness Check で共有する
    let auth_usecase: Arc<dyn AuthUseCase> = Arc::new(AuthUseCaseImpl::new(clients.auth));
    let analysis_usecase: Arc<dyn AnalysisUseCase> =
        Arc::new(AnalysisUseCaseImpl::new(clients.model));

    let auth_state = Arc::new(AuthState {
        usecase: auth_usecase.clone(),
    });
    let analysis_state = Arc::new(AnalysisState {
        usecase: analysis_usecase.clone(),
        stream_error_mode,
    });
    let readiness_state = Arc::new(ReadinessState {
        auth:     auth_usecase,
        analysis: analysis_usecase,
    });

    // ルーター構築
    // Request ID + TraceLayer により、すべての HTTP リクエストに request_id が付与されログに自動注入される
    Router::new()
        .route("/", get(root_status))
        .route("/health", get(health_check))
        .merge(
            Router::new()
                .route("/health/ready", get(readiness_check))
                .with_state(readiness_state),
        )
        // 認証 API
        .merge(
            Router::new()
                .route("/signup", post(signup))
                .route("/login", post(login))
                .with_state(auth_state),
        )
        // アイデア分析 API
        .merge(
            Router::new()
                .route("/validate-idea", post(validate_idea))
                .route("/stream-validate-idea", post(stream_validate_idea))
                .with_state(analysis_state),
        )
        // キャッシュ制御: セッションや分析結果がキャッシュされないようにする
        .layer(from_fn(no_cache))
        // Request ID レイヤー（レイヤー順序が重要: 下に書いたものが外側）
        // 1. SetRequestIdLayer（最外）: リクエスト受信時に UUID v7 を生成（またはクライアント提供値を使用）
        // 2. TraceLayer: カスタムスパンに request_id を含め、全ログに自動注入
        // 3. CanonicalLogLineLayer: リクエスト完了時に1行サマリログを出力（スパン内）
        // 4. PropagateRequestIdLayer: レスポンスヘッダーに X-Request-Id をコピー
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(CanonicalLogLineLayer)
        .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7))
}
