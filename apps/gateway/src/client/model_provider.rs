//! # 言語モデルプロバイダクライアント
//!
//! Mistral の Chat Completions API との通信を担当する。
//!
//! ## エンドポイント
//!
//! - `POST /v1/chat/completions` - チャット補完（`stream: true` で SSE）
//!
//! 出力は `response_format: {"type": "json_object"}` で JSON に寄せるが、
//! スキーマへの適合はプロンプトによる緩い契約にすぎない。

use std::pin::Pin;

use async_trait::async_trait;
use futures_util::{Stream, StreamExt};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use venturelens_domain::prompt::ChatMessage;

use super::sse::{SseEvent, SseParser};

/// 既定のモデル名
pub const DEFAULT_MODEL: &str = "mistral-large-latest";

/// 既定の API ベース URL
pub const DEFAULT_BASE_URL: &str = "https://api.mistral.ai";

/// ストリーム終端を示す `data:` の値
const DONE_SENTINEL: &str = "[DONE]";

/// モデルの出力テキストを到着順に流すストリーム
pub type TextStream = Pin<Box<dyn Stream<Item = Result<String, ModelProviderError>> + Send>>;

/// モデルプロバイダクライアントエラー
///
/// 表示文字列はそのままクライアントへのエラーメッセージに含まれる。
#[derive(Debug, Clone, Error)]
pub enum ModelProviderError {
    /// プロバイダが非 2xx を返した
    #[error("model provider returned {status}: {message}")]
    Api { status: u16, message: String },

    /// ネットワークエラー
    #[error("model provider request failed: {0}")]
    Network(String),

    /// 応答の形式が想定と異なる
    #[error("unexpected model provider response: {0}")]
    InvalidResponse(String),
}

impl From<reqwest::Error> for ModelProviderError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ModelProviderError::InvalidResponse(err.to_string())
        } else {
            ModelProviderError::Network(err.to_string())
        }
    }
}

// --- リクエスト/レスポンス型 ---

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model:           &'a str,
    messages:        &'a [ChatMessage],
    response_format: ResponseFormat,
    stream:          bool,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

impl ResponseFormat {
    fn json_object() -> Self {
        Self {
            kind: "json_object",
        }
    }
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    message: CompletionMessage,
}

#[derive(Debug, Deserialize)]
struct CompletionMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionChunk {
    #[serde(default)]
    choices: Vec<ChunkChoice>,
}

#[derive(Debug, Deserialize)]
struct ChunkChoice {
    #[serde(default)]
    delta: ChunkDelta,
}

#[derive(Debug, Default, Deserialize)]
struct ChunkDelta {
    content: Option<String>,
}

/// SSE の `data:` 1 件を解釈した結果
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum ChunkEvent {
    /// 転送すべきテキスト断片
    Text(String),
    /// 転送対象なし（role のみのデルタ等）
    Empty,
    /// ストリーム終端
    Done,
}

/// SSE イベント 1 件をテキスト断片に変換する
pub(crate) fn parse_chunk_event(event: &SseEvent) -> Result<ChunkEvent, ModelProviderError> {
    if event.event == "error" {
        return Err(ModelProviderError::InvalidResponse(event.data.clone()));
    }
    let data = event.data.trim();
    if data == DONE_SENTINEL {
        return Ok(ChunkEvent::Done);
    }
    if data.is_empty() {
        return Ok(ChunkEvent::Empty);
    }

    let chunk: ChatCompletionChunk = serde_json::from_str(data)
        .map_err(|e| ModelProviderError::InvalidResponse(format!("{e}: {data}")))?;

    Ok(chunk
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.delta.content)
        .filter(|text| !text.is_empty())
        .map_or(ChunkEvent::Empty, ChunkEvent::Text))
}

/// エラーボディから人間が読めるメッセージを取り出す
fn extract_error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|json| {
            ["message", "detail"].iter().find_map(|key| match &json[*key] {
                serde_json::Value::String(s) if !s.is_empty() => Some(s.clone()),
                serde_json::Value::String(_) | serde_json::Value::Null => None,
                other => Some(other.to_string()),
            })
        })
        .unwrap_or_else(|| body.to_string())
}

/// モデルプロバイダクライアントトレイト
///
/// テスト時にスタブを使用できるようトレイトで定義。
#[async_trait]
pub trait ModelProviderClient: Send + Sync {
    /// 補完結果のテキスト全体を返す
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, ModelProviderError>;

    /// 補完結果をテキスト断片のストリームとして返す
    ///
    /// リクエスト送信と応答ステータスの確認までを行ってから返すため、
    /// 送信失敗や非 2xx は `Err` として即座に分かる。
    async fn complete_stream(
        &self,
        messages: &[ChatMessage],
    ) -> Result<TextStream, ModelProviderError>;
}

/// Mistral クライアント実装
pub struct MistralClient {
    base_url: String,
    api_key:  String,
    model:    String,
    client:   reqwest::Client,
}

impl MistralClient {
    /// 新しい MistralClient を作成する
    ///
    /// # 引数
    ///
    /// - `base_url`: API のベース URL（例: `https://api.mistral.ai`）
    /// - `api_key`: API キー
    /// - `model`: モデル名（例: `mistral-large-latest`）
    pub fn new(base_url: &str, api_key: &str, model: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key:  api_key.to_string(),
            model:    model.to_string(),
            client:   reqwest::Client::new(),
        }
    }

    async fn send(
        &self,
        messages: &[ChatMessage],
        stream: bool,
    ) -> Result<reqwest::Response, ModelProviderError> {
        let url = format!("{}/v1/chat/completions", self.base_url);
        let request = ChatCompletionRequest {
            model: &self.model,
            messages,
            response_format: ResponseFormat::json_object(),
            stream,
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(ModelProviderError::Api {
            status:  status.as_u16(),
            message: extract_error_message(&body),
        })
    }
}

#[async_trait]
impl ModelProviderClient for MistralClient {
    #[tracing::instrument(skip_all, fields(model = %self.model))]
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, ModelProviderError> {
        let response = self.send(messages, false).await?;
        let body = response.json::<ChatCompletionResponse>().await?;

        body.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| ModelProviderError::InvalidResponse("no message content".to_string()))
    }

    #[tracing::instrument(skip_all, fields(model = %self.model))]
    async fn complete_stream(
        &self,
        messages: &[ChatMessage],
    ) -> Result<TextStream, ModelProviderError> {
        let response = self.send(messages, true).await?;
        let mut bytes = Box::pin(response.bytes_stream());

        let stream = async_stream::stream! {
            let mut parser = SseParser::new();
            while let Some(chunk) = bytes.next().await {
                let chunk = match chunk {
                    Ok(chunk) => chunk,
                    Err(e) => {
                        yield Err(ModelProviderError::from(e));
                        return;
                    }
                };
                for event in parser.feed(&chunk) {
                    match parse_chunk_event(&event) {
                        Ok(ChunkEvent::Text(text)) => yield Ok(text),
                        Ok(ChunkEvent::Empty) => {}
                        Ok(ChunkEvent::Done) => return,
                        Err(e) => {
                            yield Err(e);
                            return;
                        }
                    }
                }
            }
            // 終端の空行が無いまま閉じられた最後のイベント
            if let Some(event) = parser.finish() {
                match parse_chunk_event(&event) {
                    Ok(ChunkEvent::Text(text)) => yield Ok(text),
                    Ok(ChunkEvent::Empty | ChunkEvent::Done) => {}
                    Err(e) => yield Err(e),
                }
            }
        };

        Ok(Box::pin(stream))
    }
}
