//! # VentureLens ドメイン層
//!
//! スタートアップアイデア分析の構造化出力スキーマ、プロンプト、
//! 認証情報といった、外部サービスに依存しない型と関数を定義する。
//!
//! ## 依存関係の方向
//!
//! ```text
//! gateway → domain
//! ```
//!
//! HTTP やプロバイダの通信には一切依存しない（shared にも依存しない）。
//!
//! ## モジュール構成
//!
//! - [`analysis`] - 分析結果スキーマとモデル出力の検証付き変換
//! - [`prompt`] - プロンプトテンプレートとチャットメッセージ
//! - [`credentials`] - サインアップ・ログインの認証情報
//! - [`error`] - ドメイン層エラー
//!
//! ## 使用例
//!
//! ```rust
//! use venturelens_domain::prompt::{StartupIdea, build_analysis_prompt};
//!
//! let messages = build_analysis_prompt(&StartupIdea::new("Uber for dog walking"));
//! assert_eq!(messages.len(), 2);
//! ```

pub mod analysis;
pub mod credentials;
pub mod error;
pub mod prompt;

pub use error::{AnalysisParseError, DomainError};
