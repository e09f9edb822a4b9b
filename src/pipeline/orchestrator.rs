//! Engine orchestration: single-engine extraction, dual-engine
//! comparison, and the status surface.
//!
//! Both engines live behind [`SyllabusExtractor`] and are total: every
//! internal failure is converted into a well-formed fallback result at
//! the point of detection, so no error ever crosses this boundary and
//! one engine can never disturb the other. All stages except the
//! completion call are synchronous and side-effect-free, so a caller
//! that abandons a request after its own timeout can simply discard the
//! late result.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Datelike, Utc};
use serde::Serialize;
use tracing::{info, warn};

use super::completion::{ChatCompletionRequest, ChatMessage, CompletionBackend, ResponseFormat};
use super::normalize::normalize_envelope;
use super::preprocess;
use super::prompt::{build_extraction_prompt, EXTRACTION_SYSTEM_PROMPT};
use super::types::{
    CourseHint, ExtractionMethod, ExtractionResult, ServiceStatus, SyllabusExtractor,
};
use super::validate::validate_completion;
use super::ExtractionError;
use crate::config::CompletionConfig;
use crate::models::ParsedSyllabus;

/// Confidence reported when the model omits (or zeroes) its own score.
const DEFAULT_LLM_CONFIDENCE: u8 = 85;

/// Completion-backed extraction engine: preprocess → prompt →
/// completion → validate → normalize, with every failure mapped to a
/// fallback result. The backend is injected; tests substitute a mock.
pub struct LlmExtractor {
    backend: Arc<dyn CompletionBackend>,
    config: CompletionConfig,
}

impl LlmExtractor {
    pub fn new(backend: Arc<dyn CompletionBackend>, config: CompletionConfig) -> Self {
        Self { backend, config }
    }

    pub fn config(&self) -> &CompletionConfig {
        &self.config
    }

    /// Completion-service availability, from the same predicate the
    /// client applies before a call.
    pub fn status(&self) -> ServiceStatus {
        self.backend.status()
    }

    async fn run_pipeline(
        &self,
        text: &str,
        hint: &CourseHint,
    ) -> Result<(ParsedSyllabus, u8, serde_json::Value), (ExtractionError, Option<serde_json::Value>)>
    {
        if !self.config.enabled {
            return Err((ExtractionError::Disabled, None));
        }

        let cleaned = preprocess::normalize(text);
        let prompt = build_extraction_prompt(&cleaned, hint);
        let request = ChatCompletionRequest {
            model: self.config.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: EXTRACTION_SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: prompt,
                },
            ],
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
            response_format: ResponseFormat::json_object(),
        };

        let payload = self
            .backend
            .complete(&request)
            .await
            .map_err(|e| (e, None))?;

        let envelope = match validate_completion(&payload) {
            Ok(envelope) => envelope,
            Err(e) => return Err((e, Some(payload))),
        };

        let events = normalize_envelope(&envelope);
        let course = envelope.course_info.clone().unwrap_or_default();
        let syllabus = ParsedSyllabus {
            course_name: course
                .course_name
                .or_else(|| hint.name.clone())
                .unwrap_or_else(|| "Unknown Course".to_string()),
            course_code: course
                .course_code
                .or_else(|| hint.code.clone())
                .unwrap_or_else(|| "UNKNOWN".to_string()),
            semester: course
                .semester
                .or_else(|| hint.semester.clone())
                .unwrap_or_else(|| "Unknown".to_string()),
            year: course.year.or(hint.year).unwrap_or_else(|| Utc::now().year()),
            events,
            raw_text: text.to_string(),
            parsed_at: Utc::now(),
        };

        let confidence = envelope
            .confidence_score
            .map(|score| score.round().clamp(0.0, 100.0) as u8)
            .filter(|&c| c > 0)
            .unwrap_or(DEFAULT_LLM_CONFIDENCE);

        Ok((syllabus, confidence, payload))
    }
}

#[async_trait]
impl SyllabusExtractor for LlmExtractor {
    async fn extract(&self, text: &str, hint: &CourseHint) -> ExtractionResult {
        match self.run_pipeline(text, hint).await {
            Ok((syllabus, confidence, raw)) => {
                info!(
                    events = syllabus.events.len(),
                    confidence, "Completion extraction succeeded"
                );
                ExtractionResult {
                    success: true,
                    data: Some(syllabus),
                    confidence,
                    method: ExtractionMethod::Llm,
                    error: None,
                    raw_response: Some(raw),
                }
            }
            Err((e, raw)) => {
                warn!(error = %e, "Completion extraction failed");
                ExtractionResult::failure_with_raw(e.to_string(), raw)
            }
        }
    }

    fn method(&self) -> ExtractionMethod {
        ExtractionMethod::Llm
    }
}

/// Side-by-side outcome of running both engines.
#[derive(Debug, Clone, Serialize)]
pub struct ComparisonResult {
    pub llm: ExtractionResult,
    pub pattern: ExtractionResult,
}

/// Effective completion configuration, surfaced to status callers.
#[derive(Debug, Clone, Serialize)]
pub struct EnvironmentInfo {
    pub enabled: bool,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

/// Full status surface: per-engine availability plus configuration.
#[derive(Debug, Clone, Serialize)]
pub struct ParserStatus {
    pub llm: ServiceStatus,
    pub pattern: ServiceStatus,
    pub environment: EnvironmentInfo,
}

/// Runs one or both extraction engines and reports uniform results.
pub struct ExtractionOrchestrator {
    llm: LlmExtractor,
    pattern: Arc<dyn SyllabusExtractor>,
}

impl ExtractionOrchestrator {
    pub fn new(llm: LlmExtractor, pattern: Arc<dyn SyllabusExtractor>) -> Self {
        Self { llm, pattern }
    }

    /// Completion-backed extraction.
    pub async fn extract_llm(&self, text: &str, hint: &CourseHint) -> ExtractionResult {
        self.llm.extract(text, hint).await
    }

    /// Pattern-based extraction (external collaborator).
    pub async fn extract_pattern(&self, text: &str, hint: &CourseHint) -> ExtractionResult {
        self.pattern.extract(text, hint).await
    }

    /// Run both engines concurrently and report both outcomes.
    ///
    /// The engine futures are awaited independently; each is total, so
    /// completion of one has no ordering dependency on the other and
    /// cannot cancel it. Returns only after both settle. Timeout
    /// enforcement belongs to the caller.
    pub async fn compare(&self, text: &str, hint: &CourseHint) -> ComparisonResult {
        let (llm, pattern) = tokio::join!(
            self.llm.extract(text, hint),
            self.pattern.extract(text, hint),
        );
        ComparisonResult { llm, pattern }
    }

    /// Availability of both engines plus the effective configuration.
    pub fn status(&self) -> ParserStatus {
        let config = self.llm.config();
        ParserStatus {
            llm: self.llm.status(),
            pattern: ServiceStatus {
                available: true,
                model: None,
                error: None,
            },
            environment: EnvironmentInfo {
                enabled: config.enabled,
                model: config.model.clone(),
                max_tokens: config.max_tokens,
                temperature: config.temperature,
            },
        }
    }
}
