use serde::{Deserialize, Serialize};

/// Category of a calendar event produced by extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    Assignment,
    Exam,
    Reading,
    Class,
    Deadline,
    Other,
}

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Assignment => "assignment",
            Self::Exam => "exam",
            Self::Reading => "reading",
            Self::Class => "class",
            Self::Deadline => "deadline",
            Self::Other => "other",
        }
    }
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Event priority. `Medium` when unspecified or unrecognized.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Urgent => "urgent",
        }
    }

    /// Case-insensitive label lookup. Anything outside the closed set
    /// (including a missing label) maps to `Medium`.
    pub fn from_label(label: Option<&str>) -> Self {
        match label.map(|l| l.trim().to_lowercase()).as_deref() {
            Some("urgent") => Self::Urgent,
            Some("high") => Self::High,
            Some("medium") => Self::Medium,
            Some("low") => Self::Low,
            _ => Self::Medium,
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_type_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&EventType::Assignment).unwrap(),
            "\"assignment\""
        );
        assert_eq!(serde_json::to_string(&EventType::Other).unwrap(), "\"other\"");
    }

    #[test]
    fn priority_from_label_known_values() {
        assert_eq!(Priority::from_label(Some("urgent")), Priority::Urgent);
        assert_eq!(Priority::from_label(Some("HIGH")), Priority::High);
        assert_eq!(Priority::from_label(Some("Medium")), Priority::Medium);
        assert_eq!(Priority::from_label(Some(" low ")), Priority::Low);
    }

    #[test]
    fn priority_from_label_defaults_to_medium() {
        assert_eq!(Priority::from_label(None), Priority::Medium);
        assert_eq!(Priority::from_label(Some("")), Priority::Medium);
        assert_eq!(Priority::from_label(Some("critical")), Priority::Medium);
    }

    #[test]
    fn priority_default_is_medium() {
        assert_eq!(Priority::default(), Priority::Medium);
    }
}
