//! # VentureLens ゲートウェイサーバー
//!
//! スタートアップアイデア検証サービスの API サーバー。
//!
//! ## 役割
//!
//! ゲートウェイはフロントエンドと 2 つの外部プロバイダの間に位置し、
//! 以下の責務を担う:
//!
//! - **認証の中継**: サインアップ・ログインを Supabase Auth に転送する
//! - **アイデア分析**: プロンプトを組み立てて Mistral に送り、構造化結果またはテキストストリームを返す
//!
//! ## アーキテクチャ
//!
//! ```text
//! ┌──────────────┐     ┌──────────────┐     ┌──────────────┐
//! │   Browser    │────▶│   Gateway    │────▶│ Supabase Auth│
//! │              │     │  port: 5000  │     └──────────────┘
//! └──────────────┘     └──────────────┘
//!                             │
//!                             ▼
//!                      ┌──────────────┐
//!                      │   Mistral    │
//!                      │ (Chat API)   │
//!                      └──────────────┘
//! ```
//!
//! ## 環境変数
//!
//! | 変数名 | 必須 | 説明 |
//! |--------|------|------|
//! | `APP_HOST` | No | バインドアドレス（デフォルト: `0.0.0.0`） |
//! | `APP_PORT` | No | ポート番号（デフォルト: `5000`） |
//! | `SUPABASE_URL` | No | Supabase プロジェクト URL（未設定なら認証 API は 500） |
//! | `SUPABASE_KEY` | No | Supabase API キー |
//! | `MISTRAL_API_KEY` | No | Mistral API キー（未設定なら分析 API は 500） |
//! | `MISTRAL_MODEL` | No | モデル名（デフォルト: `mistral-large-latest`） |
//! | `MISTRAL_BASE_URL` | No | API ベース URL（デフォルト: `https://api.mistral.ai`） |
//! | `STREAM_ERROR_MODE` | No | `abort`（デフォルト）または `in_band` |
//! | `LOG_FORMAT` | No | `json` または `pretty`（デフォルト） |
//!
//! ## 起動方法
//!
//! ```bash
//! # 開発環境（.env ファイルを使用）
//! cargo run -p venturelens-gateway
//!
//! # 本番環境（環境変数を直接指定）
//! APP_PORT=8080 LOG_FORMAT=json cargo run -p venturelens-gateway --release
//! ```

use std::net::SocketAddr;

use anyhow::Context as _;
use tokio::net::TcpListener;
use venturelens_gateway::{
    app_builder::{GatewayClients, build_app},
    config::GatewayConfig,
};
use venturelens_shared::observability::TracingConfig;

/// ゲートウェイサーバーのエントリーポイント
///
/// 以下の順序で初期化を行う:
///
/// 1. 環境変数の読み込み（.env ファイル）
/// 2. トレーシングの初期化
/// 3. アプリケーション設定の読み込み
/// 4. プロバイダクライアントとルーターの構築
/// 5. HTTP サーバーの起動
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env ファイルを読み込む（存在する場合）
    // 本番環境では .env ファイルは使用せず、環境変数を直接設定する
    dotenvy::dotenv().ok();

    // トレーシング初期化
    let tracing_config = TracingConfig::from_env("gateway");
    venturelens_shared::observability::init_tracing(&tracing_config);
    let _tracing_guard = tracing_config.app_span().entered();

    // 設定読み込み
    let config = GatewayConfig::from_env().context("設定の読み込みに失敗しました")?;

    tracing::info!(
        "ゲートウェイサーバーを起動します: {}:{}",
        config.host,
        config.port
    );

    // 依存関係の初期化
    // 未設定のプロバイダは警告のみで起動を継続する
    let clients = GatewayClients::from_config(&config);
    tracing::info!(
        auth_provider = clients.auth.is_some(),
        model_provider = clients.model.is_some(),
        stream_error_mode = <&'static str>::from(config.stream_error_mode),
        "プロバイダクライアントを初期化しました"
    );

    let app = build_app(clients, config.stream_error_mode);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .context("アドレスのパースに失敗しました")?;

    let listener = TcpListener::bind(addr).await?;
    tracing::info!("ゲートウェイサーバーが起動しました: {}", addr);

    // Graceful shutdown は axum::serve が自動的に処理する
    axum::serve(listener, app).await?;

    Ok(())
}
