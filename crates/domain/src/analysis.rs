//! # スタートアップ分析
//!
//! 言語モデルが返す構造化出力（Structured Output）のスキーマと、
//! その生テキストを検証付きで型に変換する関数を定義する。
//!
//! ## ドメイン用語
//!
//! | 型 | ドメイン用語 | 用途 |
//! |---|------------|------|
//! | [`StartupAnalysis`] | 分析結果 | `/validate-idea` のレスポンス本体 |
//! | [`MonetizationStrategy`] | 収益化戦略 | 分析結果の一要素 |
//! | [`SimilarStartup`] | 類似スタートアップ | 競合と差別化ポイント |
//! | [`RiskFactor`] | リスク要因 | リスク評価と緩和策 |
//!
//! ## スキーマの扱い
//!
//! フィールドの説明はドキュメントコメントとして型に持たせ、`schemars` が
//! JSON Schema の `description` に展開する。プロンプトに埋め込む
//! フォーマット指示は [`format_instructions`] がこのスキーマから生成する。
//!
//! `viability` や `level` の取りうる値は説明文で示すだけで、型では強制しない。

use schemars::{JsonSchema, schema_for};
use serde::{Deserialize, Serialize};

use crate::error::AnalysisParseError;

/// 収益化戦略
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct MonetizationStrategy {
    /// The specific name of the strategy.
    pub strategy:    String,
    /// Explain how this strategy applies.
    pub description: String,
    /// A rating of this strategy's viability ('High', 'Medium', 'Low').
    pub viability:   String,
}

/// 類似スタートアップ
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct SimilarStartup {
    /// Name of a direct or indirect competitor.
    pub name:            String,
    /// What they do and, critically, how this new idea MUST be different.
    pub differentiation: String,
}

/// リスク要因
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct RiskFactor {
    /// A risk rating: 'Low', 'Medium', 'High', or 'Very High'.
    pub level:      String,
    /// A critical summary of the top 3 risks.
    pub analysis:   String,
    /// Suggest a concrete step to mitigate the primary risk.
    pub mitigation: String,
}

/// スタートアップアイデアの分析結果
///
/// リクエストごとに一度だけ組み立てられ、永続化されない。
/// 5 つのキーはすべて必須。未知のキーは無視する。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct StartupAnalysis {
    /// Describe the ideal customer persona (ICP).
    pub target_audience:     String,
    /// Candidate monetization strategies with a viability rating each.
    pub monetization_plan:   Vec<MonetizationStrategy>,
    /// Direct or indirect competitors and how this idea must differ.
    pub similar_startups:    Vec<SimilarStartup>,
    /// Overall risk rating with analysis and mitigation.
    pub risk_factor:         RiskFactor,
    /// A concluding summary and final verdict.
    pub summary_and_verdict: String,
}

/// プロンプトに埋め込むフォーマット指示を生成する
///
/// [`StartupAnalysis`] の JSON Schema を埋め込んだ英文の指示。
pub fn format_instructions() -> String {
    let schema = serde_json::to_string(&schema_for!(StartupAnalysis))
        .unwrap_or_else(|_| "{}".to_string());

    format!(
        "The output should be formatted as a JSON instance that conforms to the JSON schema below.\n\
         \n\
         As an example, for the schema {{\"properties\": {{\"foo\": {{\"title\": \"Foo\", \"description\": \"a list of strings\", \"type\": \"array\", \"items\": {{\"type\": \"string\"}}}}}}, \"required\": [\"foo\"]}}\n\
         the object {{\"foo\": [\"bar\", \"baz\"]}} is a well-formatted instance of the schema. \
         The object {{\"properties\": {{\"foo\": [\"bar\", \"baz\"]}}}} is not well-formatted.\n\
         \n\
         Here is the output schema:\n\
         ```\n\
         {schema}\n\
         ```"
    )
}

/// モデルの生テキストを検証して [`StartupAnalysis`] に変換する
///
/// 前後の空白と、全体を囲む Markdown コードフェンス（```` ```json ```` / ```` ``` ````）
/// は取り除いてから解釈する。
///
/// # Errors
///
/// - JSON として解釈できない場合: [`AnalysisParseError::InvalidJson`]
/// - JSON だがスキーマに合致しない場合: [`AnalysisParseError::SchemaMismatch`]
pub fn parse_analysis(raw: &str) -> Result<StartupAnalysis, AnalysisParseError> {
    let text = strip_code_fence(raw);

    let value: serde_json::Value =
        serde_json::from_str(text).map_err(|e| AnalysisParseError::InvalidJson(e.to_string()))?;

    serde_json::from_value(value).map_err(|e| AnalysisParseError::SchemaMismatch(e.to_string()))
}

/// 全体を囲むコードフェンスを取り除く
///
/// フェンスで囲まれていない場合はトリムした文字列をそのまま返す。
fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let Some(body) = rest.strip_suffix("```") else {
        return trimmed;
    };
    // 開始フェンス行の言語タグ（json 等）を読み飛ばす
    match body.split_once('\n') {
        Some((tag, content)) if !tag.trim().contains(['{', '[']) => content.trim(),
        _ => body.trim(),
    }
}
