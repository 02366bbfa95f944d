//! # アイデア分析ユースケース
//!
//! プロンプトを組み立てて言語モデルに送り、結果を返す。
//!
//! - 一括: モデル出力を [`parse_analysis`] で検証して [`StartupAnalysis`] にする。
//!   解釈に失敗しても再試行しない。
//! - ストリーミング: モデル出力の断片を到着順にそのまま流す。バッファも検証もしない。

use std::sync::Arc;

use async_trait::async_trait;
use venturelens_domain::{
    analysis::{StartupAnalysis, parse_analysis},
    prompt::{StartupIdea, build_analysis_prompt},
};

use super::AnalysisUseCase;
use crate::{
    client::{ModelProviderClient, ModelProviderError, TextStream},
    error::{GatewayError, Provider},
};

/// アイデア分析ユースケースの実装
pub struct AnalysisUseCaseImpl {
    client: Option<Arc<dyn ModelProviderClient>>,
}

impl AnalysisUseCaseImpl {
    /// 新しいユースケースインスタンスを作成
    ///
    /// `client` が `None` の場合、全操作が未初期化エラーになる。
    pub fn new(client: Option<Arc<dyn ModelProviderClient>>) -> Self {
        Self { client }
    }

    fn client(&self) -> Result<&dyn ModelProviderClient, GatewayError> {
        self.client
            .as_deref()
            .ok_or(GatewayError::UpstreamUnavailable(Provider::ModelProvider))
    }
}

fn map_provider_error(err: ModelProviderError, kind: &'static str) -> GatewayError {
    tracing::error!(
        error.category = "external_service",
        error.kind = kind,
        "モデルプロバイダの呼び出しに失敗: {}",
        err
    );
    GatewayError::Upstream(format!("An error occurred: {err}"))
}

#[async_trait]
impl AnalysisUseCase for AnalysisUseCaseImpl {
    async fn analyze(&self, idea: &StartupIdea) -> Result<StartupAnalysis, GatewayError> {
        let client = self.client()?;
        let messages = build_analysis_prompt(idea);

        let raw = client
            .complete(&messages)
            .await
            .map_err(|e| map_provider_error(e, "model_completion"))?;

        parse_analysis(&raw).map_err(|e| {
            tracing::error!(
                error.category = "external_service",
                error.kind = "model_output_parse",
                "モデル出力の解釈に失敗: {}",
                e
            );
            GatewayError::from(e)
        })
    }

    async fn analyze_stream(&self, idea: &StartupIdea) -> Result<TextStream, GatewayError> {
        let client = self.client()?;
        let messages = build_analysis_prompt(idea);

        client
            .complete_stream(&messages)
            .await
            .map_err(|e| map_provider_error(e, "model_stream_start"))
    }

    fn is_ready(&self) -> bool {
        self.client.is_some()
    }
}
