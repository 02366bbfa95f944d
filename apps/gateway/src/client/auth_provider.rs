//! # 認証プロバイダクライアント
//!
//! Supabase Auth（GoTrue）の REST API との通信を担当する。
//!
//! ## エンドポイント
//!
//! - `POST /auth/v1/signup` - メール/パスワードでのサインアップ
//! - `POST /auth/v1/token?grant_type=password` - パスワードログイン
//!
//! ユーザーやセッションの中身は解釈せず、JSON のまま呼び出し元へ渡す。

use async_trait::async_trait;
use thiserror::Error;
use venturelens_domain::credentials::Credentials;

/// 認証プロバイダクライアントエラー
///
/// 表示文字列はそのままクライアントへのエラーメッセージになる。
#[derive(Debug, Clone, Error)]
pub enum AuthProviderError {
    /// プロバイダがドメインエラーを返した（4xx: 登録済み、認証失敗、弱いパスワード等）
    #[error("{0}")]
    Rejected(String),

    /// ネットワークエラー
    #[error("auth provider request failed: {0}")]
    Network(String),

    /// 予期しないエラー（5xx、読めない応答）
    #[error("auth provider error: {0}")]
    Unexpected(String),
}

impl From<reqwest::Error> for AuthProviderError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            AuthProviderError::Unexpected(err.to_string())
        } else {
            AuthProviderError::Network(err.to_string())
        }
    }
}

/// エラーボディから人間が読めるメッセージを取り出す
///
/// GoTrue はバージョンによって `msg` / `message` / `error_description` / `error`
/// のいずれかにメッセージを入れる。
fn extract_error_message(body: &str, status: reqwest::StatusCode) -> String {
    let from_json = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|json| {
            ["msg", "message", "error_description", "error"]
                .iter()
                .find_map(|key| json[*key].as_str().filter(|s| !s.is_empty()).map(str::to_string))
        });

    match from_json {
        Some(message) => message,
        None if !body.trim().is_empty() => body.trim().to_string(),
        None => status.to_string(),
    }
}

/// サインアップ応答からユーザーオブジェクトを取り出す
///
/// メール確認が有効な場合はユーザーオブジェクト（`id` を持つ）、
/// 自動確認の場合はセッション（`user` を内包）が返る。
fn extract_user(body: serde_json::Value) -> Option<serde_json::Value> {
    if body.get("id").is_some() {
        return Some(body);
    }
    match body {
        serde_json::Value::Object(mut map) => map.remove("user").filter(|user| !user.is_null()),
        _ => None,
    }
}

/// ログイン応答がセッションであればそのまま返す
fn extract_session(body: serde_json::Value) -> Option<serde_json::Value> {
    body.get("access_token").is_some().then_some(body)
}

/// 認証プロバイダクライアントトレイト
///
/// テスト時にスタブを使用できるようトレイトで定義。
#[async_trait]
pub trait AuthProviderClient: Send + Sync {
    /// サインアップする
    ///
    /// 成功したがユーザーが返らなかった場合は `Ok(None)`。
    async fn sign_up(
        &self,
        credentials: &Credentials,
    ) -> Result<Option<serde_json::Value>, AuthProviderError>;

    /// パスワードでログインする
    ///
    /// 成功したがセッションが返らなかった場合は `Ok(None)`。
    async fn login(
        &self,
        credentials: &Credentials,
    ) -> Result<Option<serde_json::Value>, AuthProviderError>;
}

/// Supabase Auth クライアント実装
pub struct SupabaseAuthClient {
    base_url: String,
    api_key:  String,
    client:   reqwest::Client,
}

impl SupabaseAuthClient {
    /// 新しい SupabaseAuthClient を作成する
    ///
    /// # 引数
    ///
    /// - `base_url`: プロジェクト URL（例: `https://xyzcompany.supabase.co`）
    /// - `api_key`: anon / service role キー
    pub fn new(base_url: &str, api_key: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key:  api_key.to_string(),
            client:   reqwest::Client::new(),
        }
    }

    async fn post_credentials(
        &self,
        url: &str,
        credentials: &Credentials,
    ) -> Result<serde_json::Value, AuthProviderError> {
        let response = self
            .client
            .post(url)
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .json(credentials)
            .send()
            .await?;

        match response.status() {
            status if status.is_success() => Ok(response.json::<serde_json::Value>().await?),
            status if status.is_client_error() => {
                let body = response.text().await.unwrap_or_default();
                Err(AuthProviderError::Rejected(extract_error_message(&body, status)))
            }
            status => {
                let body = response.text().await.unwrap_or_default();
                Err(AuthProviderError::Unexpected(format!(
                    "unexpected status {}: {}",
                    status,
                    extract_error_message(&body, status)
                )))
            }
        }
    }
}

#[async_trait]
impl AuthProviderClient for SupabaseAuthClient {
    #[tracing::instrument(skip_all)]
    async fn sign_up(
        &self,
        credentials: &Credentials,
    ) -> Result<Option<serde_json::Value>, AuthProviderError> {
        let url = format!("{}/auth/v1/signup", self.base_url);
        let body = self.post_credentials(&url, credentials).await?;
        Ok(extract_user(body))
    }

    #[tracing::instrument(skip_all)]
    async fn login(
        &self,
        credentials: &Credentials,
    ) -> Result<Option<serde_json::Value>, AuthProviderError> {
        let url = format!("{}/auth/v1/token?grant_type=password", self.base_url);
        let body = self.post_credentials(&url, credentials).await?;
        Ok(extract_session(body))
    }
}
