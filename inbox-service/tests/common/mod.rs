#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use inbox_service::config::CorsConfig;
use inbox_service::services::providers::mock::MockCompletionProvider;
use inbox_service::startup::{build_router, AppState};
use std::io;
use std::sync::{Arc, Mutex};
use tower::util::ServiceExt;
use tracing::subscriber::DefaultGuard;

/// Router wired to a mock provider, plus the mock for request assertions.
pub struct TestApp {
    pub router: Router,
    pub provider: Arc<MockCompletionProvider>,
}

impl TestApp {
    pub fn with_provider(provider: MockCompletionProvider) -> Self {
        let provider = Arc::new(provider);
        let state = AppState::new(CorsConfig::local_frontend(), provider.clone());

        Self {
            router: build_router(state),
            provider,
        }
    }

    pub fn replying_json(value: serde_json::Value) -> Self {
        Self::with_provider(MockCompletionProvider::replying_json(value))
    }

    pub fn replying(text: &str) -> Self {
        Self::with_provider(MockCompletionProvider::replying(text))
    }

    /// GET `uri` and return the status and parsed response body.
    pub async fn get(&self, uri: &str) -> (StatusCode, serde_json::Value) {
        let response = self
            .router
            .clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (status, json)
    }

    /// POST a JSON body and return the status and parsed response body.
    pub async fn post_json(&self, uri: &str, body: serde_json::Value) -> (StatusCode, serde_json::Value) {
        let response = self
            .router
            .clone()
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri(uri)
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (status, json)
    }
}

/// In-memory sink for formatted log lines.
#[derive(Clone, Default)]
pub struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Route this thread's log events into a buffer until the guard drops.
pub fn capture_logs() -> (LogBuffer, DefaultGuard) {
    let buffer = LogBuffer::default();
    let writer = buffer.clone();

    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .finish();

    (buffer, tracing::subscriber::set_default(subscriber))
}
