//! Completion-service client.
//!
//! A thin asynchronous call into an external OpenAI-compatible chat
//! completions endpoint. The client holds no per-call state; the only
//! thing shared across calls is the lazily-built HTTP handle, which is
//! write-once and read-many. A missing credential puts the client into
//! a permanent unavailable state in which every call fails fast without
//! touching the network.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::OnceLock;
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use tracing::debug;

use super::types::ServiceStatus;
use super::ExtractionError;
use crate::config::CompletionConfig;

/// A single chat message.
#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

/// Forces the completion service to emit a JSON object.
#[derive(Debug, Clone, Serialize)]
pub struct ResponseFormat {
    #[serde(rename = "type")]
    pub format_type: String,
}

impl ResponseFormat {
    pub fn json_object() -> Self {
        Self {
            format_type: "json_object".to_string(),
        }
    }
}

/// Request body for the chat completions endpoint.
#[derive(Debug, Serialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub max_tokens: u32,
    pub temperature: f32,
    pub response_format: ResponseFormat,
}

/// Thin asynchronous call into an external completion service.
///
/// Concurrent calls are independent; implementations hold no per-call
/// state.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    /// Issue one completion call, returning the raw response payload.
    async fn complete(
        &self,
        request: &ChatCompletionRequest,
    ) -> Result<serde_json::Value, ExtractionError>;

    /// Availability, computed from the exact check `complete` performs
    /// before issuing a call.
    fn status(&self) -> ServiceStatus;
}

/// OpenAI-compatible HTTP client.
pub struct OpenAiClient {
    config: CompletionConfig,
    /// Initialize-if-absent, then read-many. Configuration cannot
    /// change mid-flight.
    client: OnceLock<reqwest::Client>,
}

impl OpenAiClient {
    pub fn new(config: CompletionConfig) -> Self {
        Self {
            config,
            client: OnceLock::new(),
        }
    }

    /// Client configured from the environment.
    pub fn from_env() -> Self {
        Self::new(CompletionConfig::from_env())
    }

    pub fn config(&self) -> &CompletionConfig {
        &self.config
    }

    /// The availability predicate shared by `complete` and `status`.
    fn availability_error(&self) -> Option<String> {
        if self.config.api_key.is_none() {
            return Some("API key not configured".to_string());
        }
        None
    }

    fn http(&self) -> &reqwest::Client {
        self.client.get_or_init(|| {
            reqwest::Client::builder()
                .timeout(Duration::from_secs(self.config.timeout_seconds))
                .build()
                .expect("Failed to create HTTP client")
        })
    }
}

#[async_trait]
impl CompletionBackend for OpenAiClient {
    async fn complete(
        &self,
        request: &ChatCompletionRequest,
    ) -> Result<serde_json::Value, ExtractionError> {
        if let Some(reason) = self.availability_error() {
            return Err(ExtractionError::Unavailable(reason));
        }
        let api_key = self.config.api_key.as_deref().unwrap_or_default();
        let url = format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        );

        debug!(model = %request.model, "Issuing completion request");

        let response = self
            .http()
            .post(&url)
            .bearer_auth(api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ExtractionError::Transient(format!(
                        "Request timed out after {}s",
                        self.config.timeout_seconds
                    ))
                } else {
                    ExtractionError::Transient(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ExtractionError::Transient(format!(
                "Completion service returned {status}: {body}"
            )));
        }

        response
            .json()
            .await
            .map_err(|e| ExtractionError::Transient(format!("Unreadable response body: {e}")))
    }

    fn status(&self) -> ServiceStatus {
        match self.availability_error() {
            Some(error) => ServiceStatus {
                available: false,
                model: None,
                error: Some(error),
            },
            None => ServiceStatus {
                available: true,
                model: Some(self.config.model.clone()),
                error: None,
            },
        }
    }
}

/// Mock completion backend for tests: a canned payload or a canned
/// transient failure, plus a call counter for no-network assertions.
pub struct MockCompletionClient {
    outcome: MockOutcome,
    calls: AtomicUsize,
}

enum MockOutcome {
    Payload(serde_json::Value),
    Transient(String),
}

impl MockCompletionClient {
    /// Respond with a payload whose single choice carries `content`.
    pub fn with_content(content: &str) -> Self {
        Self::with_payload(serde_json::json!({
            "choices": [{"message": {"role": "assistant", "content": content}}]
        }))
    }

    /// Respond with an arbitrary raw payload.
    pub fn with_payload(payload: serde_json::Value) -> Self {
        Self {
            outcome: MockOutcome::Payload(payload),
            calls: AtomicUsize::new(0),
        }
    }

    /// Fail every call with a transient error.
    pub fn failing(message: &str) -> Self {
        Self {
            outcome: MockOutcome::Transient(message.to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    /// How many completion calls were attempted.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CompletionBackend for MockCompletionClient {
    async fn complete(
        &self,
        _request: &ChatCompletionRequest,
    ) -> Result<serde_json::Value, ExtractionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.outcome {
            MockOutcome::Payload(payload) => Ok(payload.clone()),
            MockOutcome::Transient(message) => Err(ExtractionError::Transient(message.clone())),
        }
    }

    fn status(&self) -> ServiceStatus {
        ServiceStatus {
            available: true,
            model: Some("mock".to_string()),
            error: None,
        }
    }
}
