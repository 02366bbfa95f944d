//! # 認証ユースケース
//!
//! サインアップ・ログインを認証プロバイダへ転送し、応答を整形する。
//! 認証情報は保存せず、プロバイダ側の状態だけが変化する。

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use venturelens_domain::credentials::Credentials;

use super::AuthUseCase;
use crate::{
    client::{AuthProviderClient, AuthProviderError},
    error::{GatewayError, Provider},
};

/// サインアップ成功時のメッセージ
pub const SIGN_UP_SUCCESS_MESSAGE: &str = "User signed up successfully.";

/// サインアップ結果
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct SignUpResult {
    pub message: String,
    /// プロバイダが返したユーザー（加工しない）
    #[schema(value_type = Object)]
    pub user:    serde_json::Value,
}

/// 認証ユースケースの実装
pub struct AuthUseCaseImpl {
    client: Option<Arc<dyn AuthProviderClient>>,
}

impl AuthUseCaseImpl {
    /// 新しいユースケースインスタンスを作成
    ///
    /// `client` が `None` の場合、全操作が未初期化エラーになる。
    pub fn new(client: Option<Arc<dyn AuthProviderClient>>) -> Self {
        Self { client }
    }

    fn client(&self) -> Result<&dyn AuthProviderClient, GatewayError> {
        self.client
            .as_deref()
            .ok_or(GatewayError::UpstreamUnavailable(Provider::AuthProvider))
    }
}

/// プロバイダのエラーをゲートウェイのエラーに変換する
fn map_provider_error(err: AuthProviderError, kind: &'static str) -> GatewayError {
    match err {
        AuthProviderError::Rejected(message) => GatewayError::UpstreamRejected(message),
        other => {
            tracing::error!(
                error.category = "external_service",
                error.kind = kind,
                "認証プロバイダの呼び出しに失敗: {}",
                other
            );
            GatewayError::Upstream(other.to_string())
        }
    }
}

#[async_trait]
impl AuthUseCase for AuthUseCaseImpl {
    async fn sign_up(&self, credentials: &Credentials) -> Result<SignUpResult, GatewayError> {
        let user = self
            .client()?
            .sign_up(credentials)
            .await
            .map_err(|e| map_provider_error(e, "sign_up"))?;

        match user {
            Some(user) => Ok(SignUpResult {
                message: SIGN_UP_SUCCESS_MESSAGE.to_string(),
                user,
            }),
            None => {
                tracing::error!(
                    error.category = "external_service",
                    error.kind = "sign_up",
                    "認証プロバイダがユーザーを返しませんでした"
                );
                Err(GatewayError::Upstream(
                    "An unknown error occurred during signup.".to_string(),
                ))
            }
        }
    }

    async fn login(&self, credentials: &Credentials) -> Result<serde_json::Value, GatewayError> {
        let session = self
            .client()?
            .login(credentials)
            .await
            .map_err(|e| map_provider_error(e, "login"))?;

        session.ok_or_else(|| {
            tracing::error!(
                error.category = "external_service",
                error.kind = "login",
                "認証プロバイダがセッションを返しませんでした"
            );
            GatewayError::Upstream("An unknown error occurred during login.".to_string())
        })
    }

    fn is_ready(&self) -> bool {
        self.client.is_some()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    /// 固定の応答を返し、受け取ったメールアドレスを記録するスタブ
    struct StubAuthProvider {
        response: Result<Option<serde_json::Value>, AuthProviderError>,
        received: Mutex<Vec<String>>,
    }

    impl StubAuthProvider {
        fn returning(response: Result<Option<serde_json::Value>, AuthProviderError>) -> Arc<Self> {
            Arc::new(Self {
                response,
                received: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl AuthProviderClient for StubAuthProvider {
        async fn sign_up(
            &self,
            credentials: &Credentials,
        ) -> Result<Option<serde_json::Value>, AuthProviderError> {
            self.received
                .lock()
                .unwrap()
                .push(credentials.email().to_string());
            self.response.clone()
        }

        async fn login(
            &self,
            credentials: &Credentials,
        ) -> Result<Option<serde_json::Value>, AuthProviderError> {
            self.sign_up(credentials).await
        }
    }

    fn credentials() -> Credentials {
        Credentials::new("a@example.com", "secret").unwrap()
    }

    #[tokio::test]
    async fn test_sign_up_ユーザーが返れば固定メッセージ付きで成功() {
        let stub = StubAuthProvider::returning(Ok(Some(json!({"id": "u-1"}))));
        let sut = AuthUseCaseImpl::new(Some(stub.clone()));

        let result = sut.sign_up(&credentials()).await.unwrap();

        assert_eq!(result.message, "User signed up successfully.");
        assert_eq!(result.user, json!({"id": "u-1"}));
        assert_eq!(*stub.received.lock().unwrap(), vec!["a@example.com"]);
    }

    #[tokio::test]
    async fn test_sign_up_ユーザーが返らなければ不明なエラー() {
        let sut = AuthUseCaseImpl::new(Some(StubAuthProvider::returning(Ok(None))));

        let error = sut.sign_up(&credentials()).await.unwrap_err();

        assert!(
            matches!(error, GatewayError::Upstream(m) if m == "An unknown error occurred during signup.")
        );
    }

    #[tokio::test]
    async fn test_login_セッションをそのまま返す() {
        let session = json!({"access_token": "t", "user": {"id": "u-1"}});
        let sut = AuthUseCaseImpl::new(Some(StubAuthProvider::returning(Ok(Some(
            session.clone(),
        )))));

        let result = sut.login(&credentials()).await.unwrap();

        assert_eq!(result, session);
    }

    #[tokio::test]
    async fn test_login_セッションが返らなければ不明なエラー() {
        let sut = AuthUseCaseImpl::new(Some(StubAuthProvider::returning(Ok(None))));

        let error = sut.login(&credentials()).await.unwrap_err();

        assert!(
            matches!(error, GatewayError::Upstream(m) if m == "An unknown error occurred during login.")
        );
    }

    #[tokio::test]
    async fn test_プロバイダの拒否はupstream_rejectedになる() {
        let sut = AuthUseCaseImpl::new(Some(StubAuthProvider::returning(Err(
            AuthProviderError::Rejected("Invalid login credentials".to_string()),
        ))));

        let error = sut.login(&credentials()).await.unwrap_err();

        assert!(matches!(error, GatewayError::UpstreamRejected(m) if m == "Invalid login credentials"));
    }

    #[tokio::test]
    async fn test_ネットワークエラーはupstreamになる() {
        let sut = AuthUseCaseImpl::new(Some(StubAuthProvider::returning(Err(
            AuthProviderError::Network("connection refused".to_string()),
        ))));

        let error = sut.sign_up(&credentials()).await.unwrap_err();

        assert!(matches!(error, GatewayError::Upstream(m) if m.contains("connection refused")));
    }

    #[tokio::test]
    async fn test_クライアント未初期化ならupstream_unavailable() {
        let sut = AuthUseCaseImpl::new(None);

        let error = sut.sign_up(&credentials()).await.unwrap_err();

        assert!(!sut.is_ready());
        assert!(matches!(
            error,
            GatewayError::UpstreamUnavailable(Provider::AuthProvider)
        ));
    }
}
