pub mod completion;
pub mod normalize;
pub mod orchestrator;
pub mod preprocess;
pub mod prompt;
pub mod types;
pub mod validate;

pub use completion::{ChatCompletionRequest, ChatMessage, CompletionBackend, OpenAiClient};
pub use orchestrator::{
    ComparisonResult, EnvironmentInfo, ExtractionOrchestrator, LlmExtractor, ParserStatus,
};
pub use types::*;

use thiserror::Error;

/// Errors surfaced inside the extraction pipeline.
///
/// None of these cross the orchestrator boundary: each engine converts
/// failures into a uniform [`types::ExtractionResult`] at the point of
/// return, so callers always get a definite verdict instead of an
/// exception.
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// The completion path is switched off by configuration. An
    /// intentional no-op, not an engine failure.
    #[error("LLM parsing is disabled")]
    Disabled,

    /// No usable credential, detected before any network attempt.
    #[error("Completion service unavailable: {0}")]
    Unavailable(String),

    /// The network call itself failed (connect, timeout, bad status).
    #[error("Completion request failed: {0}")]
    Transient(String),

    /// The completion payload carried no textual content field.
    #[error("No content in completion response")]
    NoContent,

    /// The content field was not parseable as JSON.
    #[error("Malformed JSON in completion response: {0}")]
    MalformedJson(String),

    /// The parsed payload lacks one of the required sequences
    /// (assignments, exams, activities).
    #[error("Missing required fields in completion response")]
    MissingFields,
}
