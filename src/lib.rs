//! Semestra: syllabus-to-calendar extraction core.
//!
//! Turns unstructured academic documents (free text extracted from a PDF
//! or text file) into dated calendar events with type, priority, and
//! confidence metadata. Two extraction strategies, a deterministic
//! pattern engine (external collaborator) and a completion-service
//! engine, run individually or side by side, with schema validation,
//! date repair, and per-engine failure isolation.
//!
//! Pipeline: raw text → preprocess → prompt → completion → validate →
//! normalize, orchestrated by [`pipeline::ExtractionOrchestrator`].
//! Everything is an in-memory transform; transport, file decoding, and
//! calendar sync live outside this crate.

pub mod config;
pub mod models;
pub mod pipeline;

pub use config::CompletionConfig;
pub use models::{CalendarEvent, EventType, ParsedSyllabus, Priority};
pub use pipeline::{
    CourseHint, ExtractionError, ExtractionMethod, ExtractionOrchestrator, ExtractionResult,
    LlmExtractor, SyllabusExtractor,
};
