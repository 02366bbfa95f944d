//! # プロンプト
//!
//! スタートアップアイデア分析のプロンプトテンプレート。
//!
//! システム指示（辛口の VC アナリストとして JSON のみを返す）の後に改行と
//! [`format_instructions`](crate::analysis::format_instructions) を続け、
//! ユーザーメッセージにアイデアを埋め込む。プロンプトはあくまで緩い契約であり、
//! モデルが従わなかった場合は [`parse_analysis`](crate::analysis::parse_analysis)
//! が通常のエラーとして扱う。

use serde::{Deserialize, Serialize};

use crate::{DomainError, analysis::format_instructions};

/// アイデア欠落時のメッセージ
pub const IDEA_REQUIRED_MESSAGE: &str = "Request body must be JSON with an 'idea' key.";

/// システム指示
pub const SYSTEM_PROMPT: &str = "You are a highly critical and pragmatic Venture Capital analyst. \
     You evaluate startup ideas with skepticism, focusing on market realities, competition, \
     monetization and execution risk rather than on enthusiasm. \
     Respond with a single JSON object only, without any prose or Markdown around it.";

/// チャットメッセージの役割
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
}

/// チャットメッセージ
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role:    ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role:    ChatRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role:    ChatRole::User,
            content: content.into(),
        }
    }
}

/// 分析対象のスタートアップアイデア
///
/// キーの存在と文字列であることだけを要求する。空文字列はそのまま転送する。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartupIdea(String);

impl StartupIdea {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// 任意の JSON 値から `idea` を取り出す
    ///
    /// # Errors
    ///
    /// オブジェクトでない、`idea` キーが無い、文字列でない場合は
    /// [`DomainError::Validation`]。
    pub fn from_json(body: &serde_json::Value) -> Result<Self, DomainError> {
        body.get("idea")
            .and_then(serde_json::Value::as_str)
            .map(Self::new)
            .ok_or_else(|| DomainError::Validation(IDEA_REQUIRED_MESSAGE.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// 分析用プロンプトを組み立てる
///
/// 戻り値は常に `[system, user]` の順の 2 メッセージ。
pub fn build_analysis_prompt(idea: &StartupIdea) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(format!("{SYSTEM_PROMPT}\n{}", format_instructions())),
        ChatMessage::user(format!(
            "Please provide a critical analysis of this startup idea: {}",
            idea.as_str()
        )),
    ]
}
