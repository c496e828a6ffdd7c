//! Mock provider implementation for testing.

use super::{
    CompletionProvider, CompletionRequest, CompletionResponse, ProviderError, TokenUsage,
};
use async_trait::async_trait;
use std::sync::Mutex;

enum Reply {
    Text(String),
    NetworkFailure(String),
}

/// Completion provider that returns a fixed reply and records every request
/// it receives.
pub struct MockCompletionProvider {
    reply: Reply,
    ready: bool,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl MockCompletionProvider {
    /// Always answer with `text` as the generated content.
    pub fn replying(text: impl Into<String>) -> Self {
        Self {
            reply: Reply::Text(text.into()),
            ready: true,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Answer with `value` serialised as JSON.
    pub fn replying_json(value: serde_json::Value) -> Self {
        Self::replying(value.to_string())
    }

    /// Fail every call as if the upstream were unreachable.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            reply: Reply::NetworkFailure(message.into()),
            ready: true,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Report the provider as unconfigured from `health_check`.
    pub fn not_ready(mut self) -> Self {
        self.ready = false;
        self
    }

    /// Requests seen so far, oldest first.
    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl CompletionProvider for MockCompletionProvider {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn complete(
        &self,
        request: &CompletionRequest,
    ) -> Result<CompletionResponse, ProviderError> {
        if let Ok(mut seen) = self.requests.lock() {
            seen.push(request.clone());
        }

        match &self.reply {
            Reply::Text(text) => Ok(CompletionResponse {
                text: text.clone(),
                model: "mock".to_string(),
                usage: TokenUsage {
                    input_tokens: (request.system.len() + request.user.len()) as u64 / 4,
                    output_tokens: text.len() as u64 / 4,
                },
            }),
            Reply::NetworkFailure(message) => Err(ProviderError::NetworkError(message.clone())),
        }
    }

    async fn health_check(&self) -> Result<(), ProviderError> {
        if self.ready {
            Ok(())
        } else {
            Err(ProviderError::NotConfigured("mock marked not ready".to_string()))
        }
    }
}
