//! Integration tests that run inbox-service on a real socket.
//!
//! The completion provider is mocked, so no API key or network is needed.

use inbox_service::config::{CorsConfig, InboxConfig, ObservabilityConfig, OpenAiConfig};
use inbox_service::services::providers::mock::MockCompletionProvider;
use inbox_service::startup::Application;
use reqwest::Client;
use service_core::config::Config as CoreConfig;
use std::sync::Arc;
use std::time::Duration;

fn test_config() -> InboxConfig {
    InboxConfig {
        common: CoreConfig { port: 0 }, // Random port
        openai: OpenAiConfig {
            api_key: "test-api-key".to_string(),
            model: "gpt-4.1-mini".to_string(),
            base_url: "http://127.0.0.1:9".to_string(),
            timeout_secs: 5,
        },
        cors: CorsConfig::local_frontend(),
        observability: ObservabilityConfig {
            log_level: "error".to_string(),
            otlp_endpoint: None,
        },
    }
}

/// Spawn the application on a random port and return its base URL.
async fn spawn_app() -> String {
    let provider = Arc::new(MockCompletionProvider::replying_json(serde_json::json!({
        "classification": "Urgent",
        "summary": "Production is down.",
        "tasks": ["Join the incident call"],
        "suggested_reply": "Joining now."
    })));

    let app = Application::build_with_provider(test_config(), provider)
        .await
        .expect("Failed to build application");

    let address = format!("http://127.0.0.1:{}", app.port());

    tokio::spawn(async move {
        let _ = app.run_until_stopped().await;
    });

    // Wait for server to start
    tokio::time::sleep(Duration::from_millis(100)).await;

    address
}

#[tokio::test]
async fn health_check_returns_ok() {
    let address = spawn_app().await;
    let client = Client::new();

    let response = client
        .get(format!("{}/health", address))
        .timeout(Duration::from_secs(5))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
    assert_eq!(response.headers()["x-content-type-options"], "nosniff");
    assert!(response.headers().contains_key("x-request-id"));

    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "inbox-service");
}

#[tokio::test]
async fn readiness_check_returns_ok() {
    let address = spawn_app().await;

    let response = Client::new()
        .get(format!("{}/ready", address))
        .timeout(Duration::from_secs(5))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
}

#[tokio::test]
async fn analyze_message_over_http() {
    let address = spawn_app().await;

    let response = Client::new()
        .post(format!("{}/analyze_message", address))
        .json(&serde_json::json!({ "message": "Prod is down, need you ASAP" }))
        .timeout(Duration::from_secs(5))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["classification"], "Urgent");
    assert_eq!(body["tasks"], serde_json::json!(["Join the incident call"]));
}

#[tokio::test]
async fn metrics_endpoint_exposes_pipeline_counters() {
    let address = spawn_app().await;
    let client = Client::new();

    client
        .post(format!("{}/analyze_message", address))
        .json(&serde_json::json!({ "message": "Status update: all green." }))
        .send()
        .await
        .expect("Failed to send request");

    let text = client
        .get(format!("{}/metrics", address))
        .send()
        .await
        .expect("Failed to send request")
        .text()
        .await
        .expect("Failed to read body");

    assert!(text.contains("inbox_pipeline_requests_total"));
    assert!(text.contains("http_requests_total"));
}

#[tokio::test]
async fn cors_preflight_allows_local_frontend() {
    let address = spawn_app().await;

    let response = Client::new()
        .request(reqwest::Method::OPTIONS, format!("{}/rewrite_reply", address))
        .header("Origin", "http://localhost:5500")
        .header("Access-Control-Request-Method", "POST")
        .header("Access-Control-Request-Headers", "content-type")
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
    assert_eq!(
        response.headers()["access-control-allow-origin"],
        "http://localhost:5500"
    );
    assert_eq!(response.headers()["access-control-allow-credentials"], "true");
}

#[tokio::test]
async fn cors_preflight_mirrors_requested_method() {
    let address = spawn_app().await;

    let response = Client::new()
        .request(reqwest::Method::OPTIONS, format!("{}/analyze_message", address))
        .header("Origin", "http://127.0.0.1:5500")
        .header("Access-Control-Request-Method", "PUT")
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
    assert_eq!(response.headers()["access-control-allow-methods"], "PUT");
}

#[tokio::test]
async fn cors_rejects_unknown_origin() {
    let address = spawn_app().await;

    let response = Client::new()
        .get(format!("{}/health", address))
        .header("Origin", "http://evil.example")
        .send()
        .await
        .expect("Failed to send request");

    assert!(!response
        .headers()
        .contains_key("access-control-allow-origin"));
}
