use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::models::ParsedSyllabus;

/// Caller-supplied course metadata, threaded into the prompt as context
/// and used as a fallback when the extractor reports no course info.
#[derive(Debug, Clone, Default)]
pub struct CourseHint {
    pub name: Option<String>,
    pub code: Option<String>,
    pub semester: Option<String>,
    pub year: Option<i32>,
}

/// Which engine produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionMethod {
    Llm,
    Pattern,
    /// A failed run, whichever engine it came from.
    Fallback,
}

impl ExtractionMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Llm => "llm",
            Self::Pattern => "pattern",
            Self::Fallback => "fallback",
        }
    }
}

impl std::fmt::Display for ExtractionMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Uniform result envelope returned by every engine.
///
/// `confidence` is 0 and `method` is `fallback` whenever `success` is
/// false.
#[derive(Debug, Clone, Serialize)]
pub struct ExtractionResult {
    pub success: bool,
    pub data: Option<ParsedSyllabus>,
    /// 0–100.
    pub confidence: u8,
    pub method: ExtractionMethod,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Raw completion payload, carried through for side-by-side
    /// debugging. Opaque to this crate.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_response: Option<serde_json::Value>,
}

impl ExtractionResult {
    /// Well-formed failure envelope.
    pub fn failure(error: impl Into<String>) -> Self {
        Self::failure_with_raw(error, None)
    }

    /// Failure envelope that keeps the raw payload (validation
    /// failures still have something worth inspecting).
    pub fn failure_with_raw(error: impl Into<String>, raw_response: Option<serde_json::Value>) -> Self {
        Self {
            success: false,
            data: None,
            confidence: 0,
            method: ExtractionMethod::Fallback,
            error: Some(error.into()),
            raw_response,
        }
    }
}

/// An assignment as produced by an extractor, before normalization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignmentItem {
    pub title: String,
    pub due_date: String,
    #[serde(default)]
    pub details: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
}

/// An exam as produced by an extractor, before normalization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExamItem {
    pub title: String,
    pub date: String,
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub details: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
}

/// An item the extractor could not anchor to a calendar date.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityItem {
    pub title: String,
    #[serde(default)]
    pub details: Option<String>,
    #[serde(rename = "type", default = "default_activity_type")]
    pub activity_type: String,
    #[serde(default)]
    pub priority: Option<String>,
}

fn default_activity_type() -> String {
    "other".to_string()
}

/// Course metadata the extractor found in the document itself.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CourseInfo {
    #[serde(default)]
    pub course_name: Option<String>,
    #[serde(default)]
    pub course_code: Option<String>,
    #[serde(default)]
    pub semester: Option<String>,
    #[serde(default)]
    pub year: Option<i32>,
}

/// The schema-validated intermediate between raw extractor output and
/// canonical events. All three sequences are present (possibly empty)
/// by construction.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ExtractionEnvelope {
    pub assignments: Vec<AssignmentItem>,
    pub exams: Vec<ExamItem>,
    pub activities: Vec<ActivityItem>,
    pub course_info: Option<CourseInfo>,
    pub confidence_score: Option<f32>,
}

/// Completion-service availability as reported to callers.
///
/// Built from the same predicate the client checks before issuing a
/// call, so status reporting cannot drift from actual behavior.
#[derive(Debug, Clone, Serialize)]
pub struct ServiceStatus {
    pub available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// One extraction strategy: turns raw text into a uniform result.
///
/// The two engines (completion-backed, pattern-based collaborator) and
/// any test stub live behind this one interface; the orchestrator is
/// generic over it. Implementations must be total: failures are
/// reported through the envelope, never propagated.
#[async_trait]
pub trait SyllabusExtractor: Send + Sync {
    /// Extract calendar events from `text`.
    async fn extract(&self, text: &str, hint: &CourseHint) -> ExtractionResult;

    /// The method label this engine reports on success.
    fn method(&self) -> ExtractionMethod;
}
