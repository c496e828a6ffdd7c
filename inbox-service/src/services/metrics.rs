//! Prometheus metrics for inbox-service.
//!
//! HTTP, pipeline and completion-provider metrics, exported at `/metrics`.

use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder,
};
use std::sync::{Once, OnceLock};

static INIT: Once = Once::new();

// Global registry
pub static REGISTRY: OnceLock<Registry> = OnceLock::new();

// HTTP metrics
pub static HTTP_REQUESTS_TOTAL: OnceLock<IntCounterVec> = OnceLock::new();
pub static HTTP_REQUEST_DURATION_SECONDS: OnceLock<HistogramVec> = OnceLock::new();

// Pipeline metrics
pub static PIPELINE_REQUESTS_TOTAL: OnceLock<IntCounterVec> = OnceLock::new();
pub static UNRECOGNIZED_LABELS_TOTAL: OnceLock<IntCounterVec> = OnceLock::new();

// Provider metrics
pub static COMPLETION_LATENCY_SECONDS: OnceLock<HistogramVec> = OnceLock::new();
pub static COMPLETION_ERRORS_TOTAL: OnceLock<IntCounterVec> = OnceLock::new();
pub static COMPLETION_TOKENS_TOTAL: OnceLock<IntCounterVec> = OnceLock::new();

/// Initialize all metrics. Safe to call more than once; only the first call
/// registers anything.
pub fn init_metrics() {
    INIT.call_once(register_metrics);
}

fn register_metrics() {
    let registry = Registry::new();

    let http_requests = IntCounterVec::new(
        Opts::new("http_requests_total", "Total number of HTTP requests"),
        &["method", "path", "status"],
    )
    .expect("Failed to create http_requests_total metric");

    let http_duration = HistogramVec::new(
        HistogramOpts::new(
            "http_request_duration_seconds",
            "HTTP request duration in seconds",
        )
        .buckets(vec![0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]),
        &["method", "path"],
    )
    .expect("Failed to create http_request_duration_seconds metric");

    let pipeline_requests = IntCounterVec::new(
        Opts::new(
            "inbox_pipeline_requests_total",
            "Pipeline runs by outcome",
        ),
        &["pipeline", "outcome"],
    )
    .expect("Failed to create inbox_pipeline_requests_total metric");

    let unrecognized_labels = IntCounterVec::new(
        Opts::new(
            "inbox_unrecognized_labels_total",
            "Classifications or styles outside the documented set",
        ),
        &["field"],
    )
    .expect("Failed to create inbox_unrecognized_labels_total metric");

    let completion_latency = HistogramVec::new(
        HistogramOpts::new(
            "completion_latency_seconds",
            "Completion provider API latency in seconds",
        )
        .buckets(vec![0.1, 0.5, 1.0, 2.0, 5.0, 10.0, 30.0, 60.0, 120.0]),
        &["provider", "model"],
    )
    .expect("Failed to create completion_latency_seconds metric");

    let completion_errors = IntCounterVec::new(
        Opts::new("completion_errors_total", "Total completion provider errors"),
        &["provider", "error_type"],
    )
    .expect("Failed to create completion_errors_total metric");

    let completion_tokens = IntCounterVec::new(
        Opts::new("completion_tokens_total", "Total tokens processed"),
        &["model", "type"], // type: input, output
    )
    .expect("Failed to create completion_tokens_total metric");

    registry
        .register(Box::new(http_requests.clone()))
        .expect("Failed to register http_requests_total");
    registry
        .register(Box::new(http_duration.clone()))
        .expect("Failed to register http_request_duration_seconds");
    registry
        .register(Box::new(pipeline_requests.clone()))
        .expect("Failed to register inbox_pipeline_requests_total");
    registry
        .register(Box::new(unrecognized_labels.clone()))
        .expect("Failed to register inbox_unrecognized_labels_total");
    registry
        .register(Box::new(completion_latency.clone()))
        .expect("Failed to register completion_latency_seconds");
    registry
        .register(Box::new(completion_errors.clone()))
        .expect("Failed to register completion_errors_total");
    registry
        .register(Box::new(completion_tokens.clone()))
        .expect("Failed to register completion_tokens_total");

    let _ = REGISTRY.set(registry);
    let _ = HTTP_REQUESTS_TOTAL.set(http_requests);
    let _ = HTTP_REQUEST_DURATION_SECONDS.set(http_duration);
    let _ = PIPELINE_REQUESTS_TOTAL.set(pipeline_requests);
    let _ = UNRECOGNIZED_LABELS_TOTAL.set(unrecognized_labels);
    let _ = COMPLETION_LATENCY_SECONDS.set(completion_latency);
    let _ = COMPLETION_ERRORS_TOTAL.set(completion_errors);
    let _ = COMPLETION_TOKENS_TOTAL.set(completion_tokens);

    tracing::info!("Prometheus metrics initialized");
}

/// Get metrics in Prometheus text format.
pub fn get_metrics() -> String {
    let mut buffer = Vec::new();
    let encoder = TextEncoder::new();

    let registry = match REGISTRY.get() {
        Some(r) => r,
        None => {
            tracing::error!("Metrics registry not initialized");
            return "# Metrics registry not initialized\n".to_string();
        }
    };

    let metric_families = registry.gather();

    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!(error = %e, "Failed to encode metrics");
        return format!("# Failed to encode metrics: {}\n", e);
    }

    match String::from_utf8(buffer) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!(error = %e, "Failed to convert metrics to UTF-8");
            format!("# Failed to convert metrics to UTF-8: {}\n", e)
        }
    }
}

/// Record a completed HTTP request.
pub fn record_http_request(method: &str, path: &str, status: &str, duration_secs: f64) {
    if let Some(counter) = HTTP_REQUESTS_TOTAL.get() {
        counter.with_label_values(&[method, path, status]).inc();
    }
    if let Some(histogram) = HTTP_REQUEST_DURATION_SECONDS.get() {
        histogram
            .with_label_values(&[method, path])
            .observe(duration_secs);
    }
}

/// Record one pipeline run (`outcome` is `success` or `error`).
pub fn record_pipeline(pipeline: &str, outcome: &str) {
    if let Some(counter) = PIPELINE_REQUESTS_TOTAL.get() {
        counter.with_label_values(&[pipeline, outcome]).inc();
    }
}

/// Record a classification or style outside the documented set.
pub fn record_unrecognized_label(field: &str) {
    if let Some(counter) = UNRECOGNIZED_LABELS_TOTAL.get() {
        counter.with_label_values(&[field]).inc();
    }
}

/// Record provider latency.
pub fn record_completion_latency(provider: &str, model: &str, duration_secs: f64) {
    if let Some(histogram) = COMPLETION_LATENCY_SECONDS.get() {
        histogram
            .with_label_values(&[provider, model])
            .observe(duration_secs);
    }
}

/// Record a provider error.
pub fn record_completion_error(provider: &str, error_type: &str) {
    if let Some(counter) = COMPLETION_ERRORS_TOTAL.get() {
        counter.with_label_values(&[provider, error_type]).inc();
    }
}

/// Record token usage.
pub fn record_tokens(model: &str, input_tokens: u64, output_tokens: u64) {
    if let Some(counter) = COMPLETION_TOKENS_TOTAL.get() {
        counter
            .with_label_values(&[model, "input"])
            .inc_by(input_tokens);
        counter
            .with_label_values(&[model, "output"])
            .inc_by(output_tokens);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recorded_metrics_are_exported() {
        init_metrics();
        record_pipeline("analyze_message", "success");
        record_tokens("mock", 12, 3);

        let text = get_metrics();
        assert!(text.contains("inbox_pipeline_requests_total"));
        assert!(text.contains("completion_tokens_total"));
    }
}
