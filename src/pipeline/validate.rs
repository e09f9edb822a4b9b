//! Completion-payload validation and date repair.
//!
//! Parses the raw completion payload into an [`ExtractionEnvelope`],
//! then repairs it: any assignment or exam whose date cannot be trusted
//! is reclassified as an undated activity instead of being discarded.
//! The pass is total: every failure mode maps to exactly one
//! [`ExtractionError`], nothing panics, and no extracted item is
//! silently lost over a bad date.

use chrono::NaiveDate;
use serde::Deserialize;
use tracing::info;

use super::types::{ActivityItem, AssignmentItem, CourseInfo, ExamItem, ExtractionEnvelope};
use super::ExtractionError;

/// Tokens extractors emit in a date field when the document gives no
/// real date. Their presence makes the whole field invalid.
const PLACEHOLDER_DATE_TOKENS: &[&str] = &["XX", "TBD", "TBA"];

/// Validate a raw completion payload into an extraction envelope.
pub fn validate_completion(
    payload: &serde_json::Value,
) -> Result<ExtractionEnvelope, ExtractionError> {
    let content = payload
        .get("choices")
        .and_then(|choices| choices.get(0))
        .and_then(|choice| choice.get("message"))
        .and_then(|message| message.get("content"))
        .and_then(|content| content.as_str())
        .ok_or(ExtractionError::NoContent)?;

    let parsed: serde_json::Value = serde_json::from_str(content)
        .map_err(|e| ExtractionError::MalformedJson(e.to_string()))?;

    let assignments_raw = sequence_field(&parsed, "assignments").ok_or(ExtractionError::MissingFields)?;
    let exams_raw = sequence_field(&parsed, "exams").ok_or(ExtractionError::MissingFields)?;
    let activities_raw = sequence_field(&parsed, "activities").ok_or(ExtractionError::MissingFields)?;

    let mut activities: Vec<ActivityItem> = parse_array_lenient(activities_raw);
    let mut repaired = 0usize;

    let mut assignments = Vec::new();
    for item in parse_array_lenient::<AssignmentItem>(assignments_raw) {
        if is_valid_event_date(&item.due_date) {
            assignments.push(item);
        } else {
            repaired += 1;
            let default_details = format!("Due date: {}", item.due_date);
            activities.push(reclassify(item.title, item.details, default_details, item.priority));
        }
    }

    let mut exams = Vec::new();
    for item in parse_array_lenient::<ExamItem>(exams_raw) {
        if is_valid_event_date(&item.date) {
            exams.push(item);
        } else {
            repaired += 1;
            let default_details = format!("Exam date: {}", item.date);
            activities.push(reclassify(item.title, item.details, default_details, item.priority));
        }
    }

    if repaired > 0 {
        info!(repaired, "Reclassified items with unusable dates as undated activities");
    }

    let course_info = parsed
        .get("course_info")
        .and_then(|v| serde_json::from_value::<CourseInfo>(v.clone()).ok());
    let confidence_score = parsed
        .get("confidence_score")
        .and_then(serde_json::Value::as_f64)
        .map(|score| score as f32);

    Ok(ExtractionEnvelope {
        assignments,
        exams,
        activities,
        course_info,
        confidence_score,
    })
}

/// A required top-level sequence, or `None` if absent or not an array.
fn sequence_field<'a>(value: &'a serde_json::Value, key: &str) -> Option<&'a Vec<serde_json::Value>> {
    value.get(key)?.as_array()
}

/// Parse an array leniently: structurally broken entries are skipped.
fn parse_array_lenient<T: for<'de> Deserialize<'de>>(items: &[serde_json::Value]) -> Vec<T> {
    items
        .iter()
        .filter_map(|v| serde_json::from_value(v.clone()).ok())
        .collect()
}

/// Turn a dated item whose date failed validation into an undated
/// activity. Title preserved, details default to the raw date string,
/// priority carried over or defaulted.
fn reclassify(
    title: String,
    details: Option<String>,
    default_details: String,
    priority: Option<String>,
) -> ActivityItem {
    ActivityItem {
        title,
        details: details.or(Some(default_details)),
        activity_type: "other".to_string(),
        priority: priority.or_else(|| Some("medium".to_string())),
    }
}

/// A trustworthy event date: no placeholder tokens and a strict,
/// real-calendar `YYYY-MM-DD`.
pub fn is_valid_event_date(raw: &str) -> bool {
    let trimmed = raw.trim();
    if PLACEHOLDER_DATE_TOKENS.iter().any(|t| trimmed.contains(t)) {
        return false;
    }
    parse_iso_date(trimmed).is_some()
}

/// Parse a strict `YYYY-MM-DD` string into a date.
///
/// The shape is checked structurally first; chrono alone would also
/// accept single-digit months and days, which are ambiguous here.
pub fn parse_iso_date(raw: &str) -> Option<NaiveDate> {
    let bytes = raw.as_bytes();
    if bytes.len() != 10 || bytes[4] != b'-' || bytes[7] != b'-' {
        return None;
    }
    let digits_ok = bytes
        .iter()
        .enumerate()
        .all(|(i, b)| matches!(i, 4 | 7) || b.is_ascii_digit());
    if !digits_ok {
        return None;
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}
