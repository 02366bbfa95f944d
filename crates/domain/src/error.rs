//! # ドメイン層エラー定義
//!
//! 入力値の検証失敗と、モデル出力の解釈失敗を表現するエラー型。
//!
//! ## エラーの種類と HTTP ステータスの対応
//!
//! | エラー種別 | HTTP ステータス | 用途 |
//! |-----------|----------------|------|
//! | `DomainError::Validation` | 400 Bad Request | 必須フィールドの欠落 |
//! | `AnalysisParseError` | 500 Internal Server Error | モデル出力がスキーマに合致しない |
//!
//! ## 使用例
//!
//! ```rust
//! use venturelens_domain::DomainError;
//!
//! fn require_idea(idea: Option<&str>) -> Result<&str, DomainError> {
//!     idea.ok_or_else(|| {
//!         DomainError::Validation("Request body must be JSON with an 'idea' key.".to_string())
//!     })
//! }
//!
//! assert!(require_idea(None).is_err());
//! ```

use thiserror::Error;

/// ドメイン層で発生するエラー
#[derive(Debug, Error)]
pub enum DomainError {
    /// バリデーションエラー
    ///
    /// 保持するメッセージはそのままクライアントへ返される。
    #[error("バリデーションエラー: {0}")]
    Validation(String),
}

impl DomainError {
    /// クライアントに返すメッセージ
    pub fn client_message(&self) -> &str {
        match self {
            Self::Validation(message) => message,
        }
    }
}

/// モデル出力の解釈エラー
///
/// 再試行はしない。表示文字列はクライアントへ `"An error occurred: ..."` として返る。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalysisParseError {
    /// JSON として解釈できない
    #[error("Failed to parse StartupAnalysis from completion: invalid JSON ({0})")]
    InvalidJson(String),

    /// JSON だがスキーマに合致しない（必須キーの欠落、型違い）
    #[error("Failed to parse StartupAnalysis from completion: schema mismatch ({0})")]
    SchemaMismatch(String),
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_validationのclient_messageは接頭辞を含まない() {
        let error = DomainError::Validation("Email and password are required.".to_string());

        assert_eq!(error.client_message(), "Email and password are required.");
        assert_eq!(
            error.to_string(),
            "バリデーションエラー: Email and password are required."
        );
    }

    #[test]
    fn test_analysis_parse_errorの表示に詳細が含まれる() {
        let error = AnalysisParseError::SchemaMismatch("missing field `risk_factor`".to_string());

        assert!(error.to_string().contains("missing field `risk_factor`"));
        assert!(error.to_string().starts_with("Failed to parse StartupAnalysis"));
    }
}
