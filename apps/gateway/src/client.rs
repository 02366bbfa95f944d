//! # 外部 API クライアント
//!
//! 認証プロバイダ（Supabase）と言語モデルプロバイダ（Mistral）との通信を担当する。
//!
//! 各クライアントは起動時に設定から一度だけ構築され、読み取り専用のハンドルとして
//! `Arc<dyn ...>` で共有される。設定が欠けている場合は構築せず `None` とし、
//! 該当エンドポイントは「未初期化」エラーを返す。

pub mod auth_provider;
pub mod model_provider;
pub mod sse;

use std::sync::Arc;

pub use auth_provider::{AuthProviderClient, AuthProviderError, SupabaseAuthClient};
pub use model_provider::{MistralClient, ModelProviderClient, ModelProviderError, TextStream};

use crate::config::GatewayConfig;

/// 設定から認証プロバイダクライアントを構築する
///
/// URL とキーの両方が揃い、URL が正しい場合のみ構築する。
pub fn build_auth_client(config: &GatewayConfig) -> Option<Arc<dyn AuthProviderClient>> {
    let (Some(url), Some(key)) = (&config.supabase_url, &config.supabase_key) else {
        tracing::warn!("SUPABASE_URL / SUPABASE_KEY が未設定のため認証クライアントを初期化しません");
        return None;
    };
    if let Err(e) = reqwest::Url::parse(url) {
        tracing::warn!("SUPABASE_URL が不正なため認証クライアントを初期化しません: {}", e);
        return None;
    }
    Some(Arc::new(SupabaseAuthClient::new(url, key)))
}

/// 設定からモデルプロバイダクライアントを構築する
///
/// API キーが無い場合は構築しない。
pub fn build_model_client(config: &GatewayConfig) -> Option<Arc<dyn ModelProviderClient>> {
    let Some(api_key) = &config.mistral_api_key else {
        tracing::warn!("MISTRAL_API_KEY が未設定のためモデルクライアントを初期化しません");
        return None;
    };
    if let Err(e) = reqwest::Url::parse(&config.mistral_base_url) {
        tracing::warn!("MISTRAL_BASE_URL が不正なためモデルクライアントを初期化しません: {}", e);
        return None;
    }
    Some(Arc::new(MistralClient::new(
        &config.mistral_base_url,
        api_key,
        &config.mistral_model,
    )))
}
