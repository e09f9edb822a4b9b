//! Envelope → canonical calendar events.
//!
//! Maps validated items onto [`CalendarEvent`] records: type and
//! priority assignment, administrative-content filtering, the undated
//! sentinel for activities, deterministic identities, and a stable
//! ascending date sort.

use chrono::NaiveDate;
use tracing::debug;

use super::types::{ActivityItem, ExtractionEnvelope};
use super::validate::parse_iso_date;
use crate::models::{undated_marker, CalendarEvent, EventType, Priority};

/// Administrative phrases that disqualify an activity by title.
const ADMIN_TITLE_KEYWORDS: &[&str] = &[
    "office hours",
    "email",
    "class time",
    "conference",
    "blackboard",
    "twen",
    "absence",
    "policy",
];

/// Administrative phrases checked against activity details.
const ADMIN_DETAIL_KEYWORDS: &[&str] = &["office hours", "email", "class time"];

/// Convert a validated envelope into canonical events, sorted by
/// ascending date. The sort is stable: equal dates keep encounter
/// order (assignments, then exams, then activities).
pub fn normalize_envelope(envelope: &ExtractionEnvelope) -> Vec<CalendarEvent> {
    let mut events = Vec::new();

    for assignment in &envelope.assignments {
        let date = parse_iso_date(assignment.due_date.trim()).unwrap_or_else(undated_marker);
        events.push(CalendarEvent {
            id: event_id(&assignment.title, date),
            title: assignment.title.clone(),
            description: assignment.details.clone(),
            date,
            time: None,
            event_type: EventType::Assignment,
            priority: Priority::from_label(assignment.priority.as_deref()),
            completed: false,
        });
    }

    for exam in &envelope.exams {
        let date = parse_iso_date(exam.date.trim()).unwrap_or_else(undated_marker);
        events.push(CalendarEvent {
            id: event_id(&exam.title, date),
            title: exam.title.clone(),
            description: exam.details.clone(),
            date,
            time: exam.time.clone(),
            event_type: EventType::Exam,
            priority: Priority::from_label(exam.priority.as_deref()),
            completed: false,
        });
    }

    for activity in &envelope.activities {
        if is_administrative(activity) {
            debug!(title = %activity.title, "Dropping administrative activity");
            continue;
        }
        let date = undated_marker();
        events.push(CalendarEvent {
            id: event_id(&activity.title, date),
            title: activity.title.clone(),
            description: activity.details.clone(),
            date,
            time: None,
            event_type: if activity.activity_type.eq_ignore_ascii_case("reading") {
                EventType::Reading
            } else {
                EventType::Other
            },
            priority: Priority::from_label(activity.priority.as_deref()),
            completed: false,
        });
    }

    events.sort_by_key(|event| event.date);
    events
}

/// Rule-table check: administrative/logistical content is not a
/// calendar-worthy item.
pub fn is_administrative(activity: &ActivityItem) -> bool {
    let title = activity.title.to_lowercase();
    if ADMIN_TITLE_KEYWORDS.iter().any(|k| title.contains(k)) {
        return true;
    }
    let details = activity
        .details
        .as_deref()
        .unwrap_or_default()
        .to_lowercase();
    ADMIN_DETAIL_KEYWORDS.iter().any(|k| details.contains(k))
}

/// Deterministic event identity: title slug + ISO date. Re-running
/// extraction over the same text yields identical IDs, enabling
/// de-duplication by identity downstream.
pub fn event_id(title: &str, date: NaiveDate) -> String {
    format!("{}-{}", slug(title), date.format("%Y-%m-%d"))
}

/// Lower-case, whitespace runs to a single hyphen, everything else
/// non-alphanumeric stripped.
fn slug(title: &str) -> String {
    let mut out = String::with_capacity(title.len());
    let mut in_whitespace = false;
    for c in title.to_lowercase().chars() {
        if c.is_whitespace() {
            if !in_whitespace {
                out.push('-');
            }
            in_whitespace = true;
        } else {
            in_whitespace = false;
            if c.is_ascii_alphanumeric() || c == '-' {
                out.push(c);
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::types::{AssignmentItem, ExamItem};

    fn activity(title: &str, details: Option<&str>, activity_type: &str) -> ActivityItem {
        ActivityItem {
            title: title.to_string(),
            details: details.map(str::to_string),
            activity_type: activity_type.to_string(),
            priority: None,
        }
    }

    fn assignment(title: &str, due_date: &str, priority: Option<&str>) -> AssignmentItem {
        AssignmentItem {
            title: title.to_string(),
            due_date: due_date.to_string(),
            details: None,
            priority: priority.map(str::to_string),
        }
    }

    #[test]
    fn assignment_round_trip() {
        let envelope = ExtractionEnvelope {
            assignments: vec![assignment("Brief Due", "2025-03-14", Some("high"))],
            ..ExtractionEnvelope::default()
        };

        let events = normalize_envelope(&envelope);
        assert_eq!(events.len(), 1);

        let event = &events[0];
        assert_eq!(event.event_type, EventType::Assignment);
        assert_eq!(event.date, NaiveDate::from_ymd_opt(2025, 3, 14).unwrap());
        assert_eq!(event.priority, Priority::High);
        assert_eq!(event.id, "brief-due-2025-03-14");
        assert!(!event.completed);

        // Identical logical event, identical identity across runs.
        let again = normalize_envelope(&envelope);
        assert_eq!(again[0].id, event.id);
    }

    #[test]
    fn exam_carries_time_through() {
        let envelope = ExtractionEnvelope {
            exams: vec![ExamItem {
                title: "Midterm Exam".to_string(),
                date: "2025-03-15".to_string(),
                time: Some("9:00 AM".to_string()),
                details: None,
                priority: None,
            }],
            ..ExtractionEnvelope::default()
        };

        let events = normalize_envelope(&envelope);
        assert_eq!(events[0].event_type, EventType::Exam);
        assert_eq!(events[0].time.as_deref(), Some("9:00 AM"));
        assert_eq!(events[0].priority, Priority::Medium);
    }

    #[test]
    fn reading_activity_gets_sentinel_and_reading_type() {
        let envelope = ExtractionEnvelope {
            activities: vec![activity("Week 1: pages 38-54", None, "reading")],
            ..ExtractionEnvelope::default()
        };

        let events = normalize_envelope(&envelope);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event_type, EventType::Reading);
        assert!(events[0].is_undated());
    }

    #[test]
    fn unknown_activity_type_maps_to_other() {
        let envelope = ExtractionEnvelope {
            activities: vec![activity("Moot court signup", None, "workshop")],
            ..ExtractionEnvelope::default()
        };
        assert_eq!(normalize_envelope(&envelope)[0].event_type, EventType::Other);
    }

    #[test]
    fn office_hours_activity_filtered_out() {
        let envelope = ExtractionEnvelope {
            activities: vec![
                activity("Office Hours: Mondays 2-4pm", None, "other"),
                activity("Week 2 reading", None, "reading"),
            ],
            ..ExtractionEnvelope::default()
        };

        let events = normalize_envelope(&envelope);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].title, "Week 2 reading");
    }

    #[test]
    fn administrative_details_also_filter() {
        let a = activity("Weekly logistics", Some("See class time changes"), "other");
        assert!(is_administrative(&a));

        let ok = activity("Week 3 reading", Some("Pages 91-101"), "reading");
        assert!(!is_administrative(&ok));
    }

    #[test]
    fn admin_filter_is_case_insensitive() {
        assert!(is_administrative(&activity("BLACKBOARD setup", None, "other")));
        assert!(is_administrative(&activity("Attendance Policy", None, "other")));
    }

    #[test]
    fn events_sorted_ascending_with_undated_last() {
        let envelope = ExtractionEnvelope {
            assignments: vec![
                assignment("Second", "2025-04-01", None),
                assignment("First", "2025-01-10", None),
            ],
            activities: vec![activity("Undated reading", None, "reading")],
            ..ExtractionEnvelope::default()
        };

        let events = normalize_envelope(&envelope);
        let titles: Vec<&str> = events.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["First", "Second", "Undated reading"]);
        assert!(events.windows(2).all(|w| w[0].date <= w[1].date));
    }

    #[test]
    fn equal_dates_keep_encounter_order() {
        let envelope = ExtractionEnvelope {
            assignments: vec![
                assignment("Alpha", "2025-03-14", None),
                assignment("Beta", "2025-03-14", None),
            ],
            ..ExtractionEnvelope::default()
        };
        let events = normalize_envelope(&envelope);
        assert_eq!(events[0].title, "Alpha");
        assert_eq!(events[1].title, "Beta");
    }

    #[test]
    fn event_ids_distinct_when_title_or_date_differ() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 14).unwrap();
        let other_date = NaiveDate::from_ymd_opt(2025, 3, 15).unwrap();
        assert_ne!(event_id("Brief Due", date), event_id("Brief Due", other_date));
        assert_ne!(event_id("Brief Due", date), event_id("Reply Brief Due", date));
    }

    #[test]
    fn slug_collapses_whitespace_and_strips_punctuation() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 14).unwrap();
        assert_eq!(
            event_id("Hawkins v. McGee  (pages 38-54)", date),
            "hawkins-v-mcgee-pages-38-54-2025-03-14"
        );
    }
}
