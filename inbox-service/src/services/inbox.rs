//! The two inbox pipelines: prompt assembly, completion, normalization.

use crate::models::{AnalysisRequest, AnalysisResult, RewriteRequest, RewriteResult};
use crate::prompts::{ANALYSIS_SYSTEM_PROMPT, REWRITE_SYSTEM_PROMPT};
use crate::services::metrics;
use crate::services::providers::{CompletionProvider, CompletionRequest, ProviderError};
use serde_json::{Map, Value};
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;

/// Why a pipeline run produced no result.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("completion failed")]
    Completion(#[from] ProviderError),

    #[error("completion was not valid JSON")]
    MalformedResponse(#[source] serde_json::Error),

    #[error("completion was JSON but not an object (got {0})")]
    NotAnObject(&'static str),

    #[error("failed to encode rewrite payload")]
    Payload(#[source] serde_json::Error),
}

/// Runs both pipelines against one shared completion provider.
#[derive(Clone)]
pub struct InboxAgent {
    provider: Arc<dyn CompletionProvider>,
}

impl InboxAgent {
    pub fn new(provider: Arc<dyn CompletionProvider>) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> &Arc<dyn CompletionProvider> {
        &self.provider
    }

    /// Classify a message, summarise it, extract tasks and draft a reply.
    #[tracing::instrument(skip_all, fields(message_len = request.message.len()))]
    pub async fn analyze_message(
        &self,
        request: &AnalysisRequest,
    ) -> Result<AnalysisResult, PipelineError> {
        let completion =
            CompletionRequest::json_object(ANALYSIS_SYSTEM_PROMPT, request.message.as_str());

        let object = self.complete_object(&completion).await?;
        let result = AnalysisResult::from_completion(&object);

        if result.known_classification().is_none() {
            metrics::record_unrecognized_label("classification");
            tracing::warn!(
                classification = %result.classification,
                "Model returned a classification outside the known labels"
            );
        }

        tracing::info!(
            classification = %result.classification,
            task_count = result.tasks.len(),
            "Message analyzed"
        );

        Ok(result)
    }

    /// Rewrite `base_reply` in the requested style.
    #[tracing::instrument(skip_all, fields(style = %request.style))]
    pub async fn rewrite_reply(
        &self,
        request: &RewriteRequest,
    ) -> Result<RewriteResult, PipelineError> {
        if request.known_style().is_none() {
            metrics::record_unrecognized_label("style");
            tracing::warn!(style = %request.style, "Forwarding unrecognized rewrite style");
        }

        let payload = serde_json::to_string(request).map_err(PipelineError::Payload)?;
        let completion = CompletionRequest::json_object(REWRITE_SYSTEM_PROMPT, payload);

        let object = self.complete_object(&completion).await?;
        let result = RewriteResult::from_completion(&object, &request.base_reply);

        tracing::info!(reply_len = result.rewritten_reply.len(), "Reply rewritten");

        Ok(result)
    }

    /// Call the provider and parse its text as a single JSON object.
    async fn complete_object(
        &self,
        request: &CompletionRequest,
    ) -> Result<Map<String, Value>, PipelineError> {
        let provider = self.provider.name();
        let start = Instant::now();

        let response = self.provider.complete(request).await.map_err(|e| {
            metrics::record_completion_error(provider, e.kind());
            e
        })?;

        metrics::record_completion_latency(
            provider,
            &response.model,
            start.elapsed().as_secs_f64(),
        );
        metrics::record_tokens(
            &response.model,
            response.usage.input_tokens,
            response.usage.output_tokens,
        );

        parse_object(&response.text)
    }
}

fn parse_object(text: &str) -> Result<Map<String, Value>, PipelineError> {
    match serde_json::from_str(text).map_err(PipelineError::MalformedResponse)? {
        Value::Object(map) => Ok(map),
        Value::Array(_) => Err(PipelineError::NotAnObject("array")),
        Value::String(_) => Err(PipelineError::NotAnObject("string")),
        Value::Number(_) => Err(PipelineError::NotAnObject("number")),
        Value::Bool(_) => Err(PipelineError::NotAnObject("bool")),
        Value::Null => Err(PipelineError::NotAnObject("null")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::providers::mock::MockCompletionProvider;
    use crate::services::providers::ResponseFormat;
    use serde_json::json;

    fn agent(provider: MockCompletionProvider) -> (InboxAgent, Arc<MockCompletionProvider>) {
        let provider = Arc::new(provider);
        (InboxAgent::new(provider.clone()), provider)
    }

    #[test]
    fn test_parse_object_rejects_non_objects() {
        assert!(matches!(
            parse_object("not json"),
            Err(PipelineError::MalformedResponse(_))
        ));
        assert!(matches!(
            parse_object("[1, 2]"),
            Err(PipelineError::NotAnObject("array"))
        ));
        assert!(matches!(
            parse_object("{} {}"),
            Err(PipelineError::MalformedResponse(_))
        ));
        assert!(parse_object(r#"{"a": 1}"#).is_ok());
    }

    #[test]
    fn test_error_chain_names_cause_once() {
        let err = parse_object("not json").unwrap_err();
        let cause = std::error::Error::source(&err)
            .map(|source| source.to_string())
            .unwrap();

        let chain = format!("{:#}", anyhow::Error::new(err));
        assert!(chain.starts_with("completion was not valid JSON: "));
        assert_eq!(chain.matches(cause.as_str()).count(), 1);
    }

    #[test]
    fn test_provider_error_chain_names_cause_once() {
        let err = PipelineError::from(ProviderError::NetworkError("connection reset".to_string()));
        let chain = format!("{:#}", anyhow::Error::new(err));
        assert_eq!(chain, "completion failed: Network error: connection reset");
    }

    #[tokio::test]
    async fn test_analysis_sends_system_prompt_and_raw_message() {
        let (agent, mock) = agent(MockCompletionProvider::replying_json(json!({
            "classification": "Request"
        })));

        let request = AnalysisRequest {
            message: "Can you review the API docs before tomorrow's stand-up?".to_string(),
        };
        let result = agent.analyze_message(&request).await.unwrap();
        assert_eq!(result.classification, "Request");

        let seen = mock.requests();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].system, ANALYSIS_SYSTEM_PROMPT);
        assert_eq!(seen[0].user, request.message);
        assert_eq!(seen[0].response_format, ResponseFormat::JsonObject);
    }

    #[tokio::test]
    async fn test_rewrite_sends_structured_payload() {
        let (agent, mock) = agent(MockCompletionProvider::replying_json(json!({
            "rewritten_reply": "Got it, will do."
        })));

        let request = RewriteRequest {
            original_message: "Please send the slides.".to_string(),
            base_reply: "Sure, I'll send them.".to_string(),
            style: "short".to_string(),
        };
        let result = agent.rewrite_reply(&request).await.unwrap();
        assert_eq!(result.rewritten_reply, "Got it, will do.");

        let seen = mock.requests();
        assert_eq!(seen[0].system, REWRITE_SYSTEM_PROMPT);
        let payload: Value = serde_json::from_str(&seen[0].user).unwrap();
        assert_eq!(
            payload,
            json!({
                "original_message": "Please send the slides.",
                "base_reply": "Sure, I'll send them.",
                "style": "short"
            })
        );
    }

    #[tokio::test]
    async fn test_unrecognized_style_is_forwarded() {
        let (agent, mock) = agent(MockCompletionProvider::replying("{}"));

        let request = RewriteRequest {
            original_message: "Hi".to_string(),
            base_reply: "Hello!".to_string(),
            style: "pirate".to_string(),
        };
        let result = agent.rewrite_reply(&request).await.unwrap();
        assert_eq!(result.rewritten_reply, "Hello!");

        let payload: Value = serde_json::from_str(&mock.requests()[0].user).unwrap();
        assert_eq!(payload["style"], "pirate");
    }

    #[tokio::test]
    async fn test_provider_failure_is_reported() {
        let (agent, _) = agent(MockCompletionProvider::failing("connection reset"));

        let err = agent
            .analyze_message(&AnalysisRequest {
                message: "FYI".to_string(),
            })
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            PipelineError::Completion(ProviderError::NetworkError(_))
        ));
    }

    #[tokio::test]
    async fn test_empty_message_degrades_to_default_classification() {
        let (agent, _) = agent(MockCompletionProvider::replying("{}"));

        let result = agent
            .analyze_message(&AnalysisRequest {
                message: String::new(),
            })
            .await
            .unwrap();

        assert_eq!(result.classification, "Informational");
        assert!(result.tasks.is_empty());
    }
}
