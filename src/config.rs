//! Completion-service configuration.
//!
//! All knobs are externally configured through the environment and
//! defaulted when absent. `ENABLE_LLM_PARSING` gates the completion
//! path entirely: when off, the LLM engine refuses before any client
//! initialization or network attempt.

/// Default OpenAI-compatible API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Default completion model.
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

/// Default maximum output tokens per completion.
pub const DEFAULT_MAX_TOKENS: u32 = 2000;

/// Default sampling temperature. Low: this is extraction, not generation.
pub const DEFAULT_TEMPERATURE: f32 = 0.1;

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Configuration for the completion-backed extraction engine.
#[derive(Debug, Clone)]
pub struct CompletionConfig {
    /// API credential. Absent ⇒ the client is permanently unavailable.
    pub api_key: Option<String>,
    /// Base URL of the completion endpoint.
    pub base_url: String,
    /// Model name sent with every request.
    pub model: String,
    /// Maximum output tokens per completion.
    pub max_tokens: u32,
    /// Sampling temperature.
    pub temperature: f32,
    /// Request timeout in seconds.
    pub timeout_seconds: u64,
    /// Feature flag for the whole completion path.
    pub enabled: bool,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
            timeout_seconds: DEFAULT_TIMEOUT_SECS,
            enabled: true,
        }
    }
}

impl CompletionConfig {
    /// Read configuration from environment variables, defaulting every
    /// field. An empty `OPENAI_API_KEY` counts as absent.
    pub fn from_env() -> Self {
        Self {
            api_key: std::env::var("OPENAI_API_KEY")
                .ok()
                .filter(|k| !k.trim().is_empty()),
            base_url: std::env::var("OPENAI_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            model: std::env::var("LLM_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            max_tokens: env_parse("LLM_MAX_TOKENS", DEFAULT_MAX_TOKENS),
            temperature: env_parse("LLM_TEMPERATURE", DEFAULT_TEMPERATURE),
            timeout_seconds: env_parse("LLM_TIMEOUT", DEFAULT_TIMEOUT_SECS),
            enabled: std::env::var("ENABLE_LLM_PARSING")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(false),
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
