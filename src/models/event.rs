use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::enums::{EventType, Priority};

/// The sentinel "no specific date known" marker.
///
/// Items an extractor could not anchor to a real calendar date carry
/// this fixed far-future date instead of being dropped, so undated work
/// stays visible downstream without ever looking like a real deadline.
pub fn undated_marker() -> NaiveDate {
    NaiveDate::from_ymd_opt(2099, 12, 31).expect("sentinel date is a valid calendar date")
}

/// Canonical calendar event. Immutable once produced by normalization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarEvent {
    /// Deterministic identity: slug of the title + ISO date. The same
    /// logical event always maps to the same id across runs.
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(rename = "type")]
    pub event_type: EventType,
    pub priority: Priority,
    pub completed: bool,
}

impl CalendarEvent {
    /// True when this event carries the undated sentinel rather than a
    /// real calendar date.
    pub fn is_undated(&self) -> bool {
        self.date == undated_marker()
    }

    /// True when the event's date has passed and it is not completed.
    /// Undated events are never overdue.
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        !self.is_undated() && self.date < today && !self.completed
    }
}

/// Result of one extraction run over a single document. Owned by the
/// caller; never mutated by the extraction components after return.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParsedSyllabus {
    pub course_name: String,
    pub course_code: String,
    pub semester: String,
    pub year: i32,
    pub events: Vec<CalendarEvent>,
    pub raw_text: String,
    pub parsed_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(date: NaiveDate, completed: bool) -> CalendarEvent {
        CalendarEvent {
            id: "test-event".to_string(),
            title: "Test Event".to_string(),
            description: None,
            date,
            time: None,
            event_type: EventType::Assignment,
            priority: Priority::Medium,
            completed,
        }
    }

    #[test]
    fn sentinel_is_far_future() {
        assert_eq!(
            undated_marker(),
            NaiveDate::from_ymd_opt(2099, 12, 31).unwrap()
        );
    }

    #[test]
    fn undated_event_detected() {
        let e = event(undated_marker(), false);
        assert!(e.is_undated());

        let dated = event(NaiveDate::from_ymd_opt(2025, 3, 14).unwrap(), false);
        assert!(!dated.is_undated());
    }

    #[test]
    fn past_incomplete_event_is_overdue() {
        let today = NaiveDate::from_ymd_opt(2025, 4, 1).unwrap();
        let e = event(NaiveDate::from_ymd_opt(2025, 3, 14).unwrap(), false);
        assert!(e.is_overdue(today));
    }

    #[test]
    fn completed_event_is_not_overdue() {
        let today = NaiveDate::from_ymd_opt(2025, 4, 1).unwrap();
        let e = event(NaiveDate::from_ymd_opt(2025, 3, 14).unwrap(), true);
        assert!(!e.is_overdue(today));
    }

    #[test]
    fn undated_event_is_never_overdue() {
        let today = NaiveDate::from_ymd_opt(2100, 1, 1).unwrap();
        let e = event(undated_marker(), false);
        assert!(!e.is_overdue(today));
    }

    #[test]
    fn event_serializes_type_field() {
        let e = event(NaiveDate::from_ymd_opt(2025, 3, 14).unwrap(), false);
        let json = serde_json::to_value(&e).unwrap();
        assert_eq!(json["type"], "assignment");
        assert_eq!(json["date"], "2025-03-14");
        assert_eq!(json["completed"], false);
    }
}
