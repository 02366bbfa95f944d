//! # ユースケース層
//!
//! 外部プロバイダの呼び出しと、結果の整形を担う。
//!
//! ## 設計方針
//!
//! - **トレイトベースの設計**: ハンドラのテストでスタブを差し込めるようトレイトを定義
//! - **依存性注入**: プロバイダクライアントは起動時に構築して外部から注入する
//!   （未初期化は `None`）
//! - **薄いハンドラ**: 入力検証の後はユースケースに委譲する

pub mod analysis;
pub mod auth;

pub use analysis::AnalysisUseCaseImpl;
use async_trait::async_trait;
pub use auth::{AuthUseCaseImpl, SignUpResult};
use venturelens_domain::{analysis::StartupAnalysis, credentials::Credentials, prompt::StartupIdea};

use crate::{client::TextStream, error::GatewayError};

/// 認証ユースケーストレイト
#[async_trait]
pub trait AuthUseCase: Send + Sync {
    /// サインアップする
    ///
    /// ## 戻り値
    ///
    /// - `Ok(SignUpResult)`: 固定メッセージとプロバイダが返したユーザー
    /// - `Err(GatewayError)`: 未初期化、プロバイダによる拒否、その他の障害
    async fn sign_up(&self, credentials: &Credentials) -> Result<SignUpResult, GatewayError>;

    /// パスワードでログインする
    ///
    /// プロバイダが返したセッションを加工せずに返す。
    async fn login(&self, credentials: &Credentials) -> Result<serde_json::Value, GatewayError>;

    /// 認証プロバイダクライアントが初期化済みか
    fn is_ready(&self) -> bool;
}

/// アイデア分析ユースケーストレイト
#[async_trait]
pub trait AnalysisUseCase: Send + Sync {
    /// アイデアを分析し、検証済みの構造化結果を返す
    async fn analyze(&self, idea: &StartupIdea) -> Result<StartupAnalysis, GatewayError>;

    /// アイデアを分析し、モデル出力をテキスト断片のストリームとして返す
    ///
    /// 呼び出すたびにプロンプトを組み立て直し、新しいリクエストを発行する。
    /// 最初のバイトより前の失敗は `Err` として返る。
    async fn analyze_stream(&self, idea: &StartupIdea) -> Result<TextStream, GatewayError>;

    /// モデルプロバイダクライアントが初期化済みか
    fn is_ready(&self) -> bool;
}
