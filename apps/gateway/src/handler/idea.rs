//! # アイデア分析ハンドラ
//!
//! ## エンドポイント
//!
//! - `POST /validate-idea` - 構造化された分析結果を JSON で返す
//! - `POST /stream-validate-idea` - モデル出力を `text/plain` のまま逐次転送する
//!
//! ストリーミングでは、最初のバイトを送る前の失敗（未初期化、プロバイダの拒否）は
//! 通常の JSON エラーとして返る。送出開始後の失敗は [`StreamErrorMode`] に従う。

use std::sync::Arc;

use axum::{
   Json,
   body::{Body, Bytes},
   extract::State,
   http::header,
   response::{IntoResponse, Response},
};
use futures_util::{Stream, StreamExt};
use utoipa::ToSchema;
use venturelens_domain::{analysis::StartupAnalysis, prompt::StartupIdea};
use venturelens_shared::ErrorResponse;

use super::parse_json_body;
use crate::{
   client::TextStream,
   config::StreamErrorMode,
   error::{GatewayError, stream_error_chunk},
   usecase::AnalysisUseCase,
};

/// ストリーミングレスポンスの Content-Type
const STREAM_CONTENT_TYPE: &str = "text/plain; charset=utf-8";

/// アイデア分析ハンドラの State
pub struct AnalysisState {
   pub usecase:           Arc<dyn AnalysisUseCase>,
   pub stream_error_mode: StreamErrorMode,
}

/// アイデア分析リクエスト（OpenAPI ドキュメント用）
///
/// ボディは `parse_json_body` と [`StartupIdea::from_json`] で寛容に読み取る。
#[derive(Debug, ToSchema)]
pub struct IdeaRequest {
   /// 分析対象のスタートアップアイデア
   pub idea: String,
}

/// POST /validate-idea
#[utoipa::path(
   post,
   path = "/validate-idea",
   tag = "analysis",
   request_body = IdeaRequest,
   responses(
      (status = 200, description = "分析結果", body = StartupAnalysis),
      (status = 400, description = "idea の欠落", body = ErrorResponse),
      (status = 500, description = "モデル未初期化、出力の解釈失敗、またはプロバイダ障害", body = ErrorResponse)
   )
)]
#[tracing::instrument(skip_all)]
pub async fn validate_idea(
   State(state): State<Arc<AnalysisState>>,
   body: Bytes,
) -> Result<Json<StartupAnalysis>, GatewayError> {
   let idea = StartupIdea::from_json(&parse_json_body(&body))?;

   let analysis = state.usecase.analyze(&idea).await?;

   Ok(Json(analysis))
}

/// POST /stream-validate-idea
#[utoipa::path(
   post,
   path = "/stream-validate-idea",
   tag = "analysis",
   request_body = IdeaRequest,
   responses(
      (status = 200, description = "モデル出力のテキストストリーム", body = String, content_type = "text/plain"),
      (status = 400, description = "idea の欠落", body = ErrorResponse),
      (status = 500, description = "モデル未初期化、またはプロバイダ障害", body = ErrorResponse)
   )
)]
#[tracing::instrument(skip_all)]
pub async fn stream_validate_idea(State(state): State<Arc<AnalysisState>>, body: Bytes) -> Response {
   let idea = match StartupIdea::from_json(&parse_json_body(&body)) {
      Ok(idea) => idea,
      Err(e) => return GatewayError::from(e).into_response(),
   };

   let stream = match state.usecase.analyze_stream(&idea).await {
      Ok(stream) => stream,
      Err(e) => return e.into_response(),
   };

   (
      [(header::CONTENT_TYPE, STREAM_CONTENT_TYPE)],
      Body::from_stream(apply_stream_error_policy(stream, state.stream_error_mode)),
   )
      .into_response()
}

/// テキストストリームをレスポンスボディ用のバイトストリームに変換する
///
/// 上流のエラーは最初の 1 件で打ち切る。
/// - [`StreamErrorMode::Abort`]: `Err` を流し、ボディを異常終了させる
/// - [`StreamErrorMode::InBand`]: エラー JSON を最終チャンクとして流し、正常終了する
pub(crate) fn apply_stream_error_policy(
   mut upstream: TextStream,
   mode: StreamErrorMode,
) -> impl Stream<Item = Result<Bytes, std::io::Error>> + Send + 'static {
   async_stream::stream! {
      while let Some(item) = upstream.next().await {
         match item {
            Ok(text) => yield Ok(Bytes::from(text)),
            Err(e) => {
               tracing::error!(
                  error.category = "external_service",
                  error.kind = "model_stream",
                  stream_error_mode = <&'static str>::from(mode),
                  "ストリーミング中にエラー: {}",
                  e
               );
               match mode {
                  StreamErrorMode::Abort => yield Err(std::io::Error::other(e.to_string())),
                  StreamErrorMode::InBand => yield Ok(Bytes::from(stream_error_chunk(&e.to_string()))),
               }
               break;
            }
         }
      }
   }
}
