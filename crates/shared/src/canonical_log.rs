//! # Canonical Log Line ミドルウェア
//!
//! HTTP リクエスト完了時に、そのリクエストの重要情報を1行に集約した
//! サマリログ（Canonical Log Line）を出力する tower Layer。
//!
//! ## TraceLayer との責務分離
//!
//! - TraceLayer: スパン作成（method, uri, request_id）
//! - CanonicalLogLineLayer: リクエスト完了サマリ（status, latency）
//!
//! TraceLayer のスパン内に配置することで、スパンフィールド（request_id）が
//! JSON ログに自動的に含まれる。
//!
//! ストリーミングレスポンスでは、レイテンシはレスポンスヘッダー確定までの時間であり、
//! ボディの送出完了までは含まない。

use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
    time::Instant,
};

use http::{Request, Response};
use tower::{Layer, Service};

/// ログ対象外のパスかどうかを判定する
///
/// 監視系から高頻度で叩かれる `/`（稼働確認）と `/health` 配下を除外する。
fn is_probe_path(path: &str) -> bool {
    path == "/" || path.starts_with("/health")
}

/// Canonical Log Line を出力する Layer
///
/// ```text
/// TraceLayer → CanonicalLogLineLayer → [他のミドルウェア] → handler
/// ```
#[derive(Clone, Debug)]
pub struct CanonicalLogLineLayer;

impl<S> Layer<S> for CanonicalLogLineLayer {
    type Service = CanonicalLogLineService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        CanonicalLogLineService { inner }
    }
}

/// [`CanonicalLogLineLayer`] が生成する Service
#[derive(Clone, Debug)]
pub struct CanonicalLogLineService<S> {
    inner: S,
}

impl<S, ReqBody, ResBody> Service<Request<ReqBody>> for CanonicalLogLineService<S>
where
    S: Service<Request<ReqBody>, Response = Response<ResBody>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    S::Error: std::fmt::Display + 'static,
    ReqBody: Send + 'static,
    ResBody: Send + 'static,
{
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;
    type Response = S::Response;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<ReqBody>) -> Self::Future {
        // clone-swap: poll_ready 済みの inner を使う
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);

        let path = req.uri().path().to_owned();
        if is_probe_path(&path) {
            return Box::pin(async move { inner.call(req).await });
        }

        let method = req.method().to_string();
        let start = Instant::now();

        Box::pin(async move {
            let result = inner.call(req).await;
            let latency_ms = start.elapsed().as_millis() as u64;

            match &result {
                Ok(response) => {
                    tracing::info!(
                        log.r#type = "canonical",
                        http.method = %method,
                        http.path = %path,
                        http.status_code = response.status().as_u16(),
                        http.latency_ms = latency_ms,
                        "リクエスト完了"
                    );
                }
                Err(err) => {
                    tracing::error!(
                        log.r#type = "canonical",
                        http.method = %method,
                        http.path = %path,
                        http.latency_ms = latency_ms,
                        error.message = %err,
                        "リクエスト処理エラー"
                    );
                }
            }

            result
        })
    }
}

#[cfg(test)]
mod tests {
    use std::{
        convert::Infallible,
        sync::{Arc, Mutex},
    };

    use tracing_subscriber::layer::SubscriberExt;

    use super::*;

    #[derive(Clone)]
    struct FixedStatusService {
        status: http::StatusCode,
    }

    impl Service<Request<()>> for FixedStatusService {
        type Error = Infallible;
        type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;
        type Response = Response<()>;

        fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
            Poll::Ready(Ok(()))
        }

        fn call(&mut self, _req: Request<()>) -> Self::Future {
            let status = self.status;
            Box::pin(async move { Ok(Response::builder().status(status).body(()).unwrap()) })
        }
    }

    #[derive(Clone)]
    struct FailingService;

    impl Service<Request<()>> for FailingService {
        type Error = String;
        type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;
        type Response = Response<()>;

        fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
            Poll::Ready(Ok(()))
        }

        fn call(&mut self, _req: Request<()>) -> Self::Future {
            Box::pin(async { Err("upstream exploded".to_string()) })
        }
    }

    /// 出力されたイベントを (level, message, fields) で記録する Layer
    #[derive(Clone, Default)]
    struct Recorder {
        events: Arc<Mutex<Vec<Recorded>>>,
    }

    #[derive(Debug, Clone)]
    struct Recorded {
        level:   tracing::Level,
        message: String,
        fields:  Vec<(String, String)>,
    }

    impl Recorded {
        fn field(&self, name: &str) -> Option<&str> {
            self.fields
                .iter()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v.as_str())
        }
    }

    impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for Recorder {
        fn on_event(
            &self,
            event: &tracing::Event<'_>,
            _ctx: tracing_subscriber::layer::Context<'_, S>,
        ) {
            let mut visitor = FieldVisitor::default();
            event.record(&mut visitor);
            self.events.lock().unwrap().push(Recorded {
                level:   *event.metadata().level(),
                message: visitor.message.unwrap_or_default(),
                fields:  visitor.fields,
            });
        }
    }

    #[derive(Default)]
    struct FieldVisitor {
        message: Option<String>,
        fields:  Vec<(String, String)>,
    }

    impl tracing::field::Visit for FieldVisitor {
        fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
            let rendered = format!("{value:?}");
            if field.name() == "message" {
                self.message = Some(rendered);
            } else {
                self.fields.push((field.name().to_string(), rendered));
            }
        }

        fn record_u64(&mut self, field: &tracing::field::Field, value: u64) {
            self.fields.push((field.name().to_string(), value.to_string()));
        }

        fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
            if field.name() == "message" {
                self.message = Some(value.to_string());
            } else {
                self.fields.push((field.name().to_string(), value.to_string()));
            }
        }
    }

    fn install_recorder() -> (tracing::subscriber::DefaultGuard, Arc<Mutex<Vec<Recorded>>>) {
        let recorder = Recorder::default();
        let events = recorder.events.clone();
        let guard = tracing::subscriber::set_default(tracing_subscriber::registry().with(recorder));
        (guard, events)
    }

    fn post(path: &str) -> Request<()> {
        Request::builder()
            .method(http::Method::POST)
            .uri(path)
            .body(())
            .unwrap()
    }

    #[test]
    fn test_is_probe_pathはルートとhealth配下のみtrue() {
        assert!(is_probe_path("/"));
        assert!(is_probe_path("/health"));
        assert!(is_probe_path("/health/ready"));
        assert!(!is_probe_path("/validate-idea"));
        assert!(!is_probe_path("/signup"));
    }

    #[tokio::test]
    async fn test_正常リクエストで1行のinfoログにステータスとパスが含まれる() {
        let (_guard, events) = install_recorder();
        let mut sut = CanonicalLogLineLayer.layer(FixedStatusService {
            status: http::StatusCode::CREATED,
        });

        let response = sut.call(post("/signup")).await.unwrap();
        assert_eq!(response.status(), http::StatusCode::CREATED);

        let events = events.lock().unwrap();
        assert_eq!(events.len(), 1);
        let line = &events[0];
        assert_eq!(line.level, tracing::Level::INFO);
        assert_eq!(line.message, "リクエスト完了");
        assert_eq!(line.field("log.type"), Some("canonical"));
        assert_eq!(line.field("http.status_code"), Some("201"));
        assert_eq!(line.field("http.method"), Some("POST"));
        assert_eq!(line.field("http.path"), Some("/signup"));
        assert!(line.field("http.latency_ms").is_some());
    }

    #[tokio::test]
    async fn test_プローブパスではログを出力しない() {
        let (_guard, events) = install_recorder();
        let mut sut = CanonicalLogLineLayer.layer(FixedStatusService {
            status: http::StatusCode::OK,
        });

        sut.call(post("/")).await.unwrap();
        sut.call(post("/health/ready")).await.unwrap();

        assert!(events.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_serviceエラー時にerrorレベルで出力される() {
        let (_guard, events) = install_recorder();
        let mut sut = CanonicalLogLineLayer.layer(FailingService);

        let result = sut.call(post("/validate-idea")).await;
        assert!(result.is_err());

        let events = events.lock().unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].level, tracing::Level::ERROR);
        assert_eq!(events[0].field("error.message"), Some("upstream exploded"));
    }
}
