//! Text normalization ahead of any extractor.
//!
//! Pure and total: same input always yields the same output, no I/O,
//! no failure mode. Both engines receive the same cleaned text.

/// Maximum preprocessed length in characters (token-budget margin for
/// the completion path; the pattern engine tolerates the same cap).
pub const MAX_TEXT_CHARS: usize = 8000;

/// Keywords whose presence suggests a document is a syllabus.
const SYLLABUS_KEYWORDS: &[&str] = &[
    "syllabus",
    "course description",
    "assignments",
    "due date",
    "deadline",
    "exam",
    "midterm",
    "final",
    "reading",
    "schedule",
    "calendar",
    "grading",
    "rubric",
    "course outline",
    "learning objectives",
];

/// Distinct keyword hits required by [`looks_like_syllabus`].
const MIN_KEYWORD_HITS: usize = 3;

/// Normalize raw extracted text: unify line endings, strip control
/// characters and page artifacts, collapse whitespace runs and blank
/// lines, truncate to [`MAX_TEXT_CHARS`], trim. Idempotent.
pub fn normalize(text: &str) -> String {
    let unified = text.replace("\r\n", "\n").replace('\r', "\n");

    let mut lines: Vec<String> = Vec::new();
    for raw_line in unified.split('\n') {
        let stripped = strip_page_headers(raw_line);
        let line = collapse_spaces(&stripped);
        if is_page_number_line(&line) {
            lines.push(String::new());
        } else {
            lines.push(line);
        }
    }

    let joined = collapse_blank_runs(&lines);
    truncate_chars(joined.trim(), MAX_TEXT_CHARS)
        .trim()
        .to_string()
}

/// Heuristic: does this text look like a syllabus at all? At least
/// [`MIN_KEYWORD_HITS`] distinct keywords from the table must appear.
pub fn looks_like_syllabus(text: &str) -> bool {
    let lower = text.to_lowercase();
    SYLLABUS_KEYWORDS
        .iter()
        .filter(|keyword| lower.contains(*keyword))
        .count()
        >= MIN_KEYWORD_HITS
}

/// Collapse runs of spaces/tabs to a single space and drop control
/// characters; trims the line.
fn collapse_spaces(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut pending_space = false;
    for c in line.chars() {
        if c == ' ' || c == '\t' {
            pending_space = true;
        } else if c.is_control() {
            // Stray control characters from PDF extraction carry no text.
            continue;
        } else {
            if pending_space && !out.is_empty() {
                out.push(' ');
            }
            pending_space = false;
            out.push(c);
        }
    }
    out
}

/// A line that is nothing but a page number.
fn is_page_number_line(line: &str) -> bool {
    !line.is_empty() && line.chars().all(|c| c.is_ascii_digit())
}

/// Remove every "Page N of M" header (ASCII case-insensitive) from a line.
fn strip_page_headers(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut rest = line;
    while let Some((before, after)) = split_page_header(rest) {
        out.push_str(before);
        rest = after;
    }
    out.push_str(rest);
    out
}

/// Find the first "Page N of M" occurrence, splitting around it.
fn split_page_header(s: &str) -> Option<(&str, &str)> {
    let lower = s.to_ascii_lowercase();
    let mut from = 0;
    while let Some(pos) = lower[from..].find("page ") {
        let start = from + pos;
        let body = start + "page ".len();
        if let Some(len) = match_n_of_m(&lower[body..]) {
            return Some((&s[..start], &s[body + len..]));
        }
        from = body;
    }
    None
}

/// Match `N of M` at the start of `s`, returning the matched length.
fn match_n_of_m(s: &str) -> Option<usize> {
    let first = s.chars().take_while(|c| c.is_ascii_digit()).count();
    if first == 0 {
        return None;
    }
    let rest = &s[first..];
    if !rest.starts_with(" of ") {
        return None;
    }
    let second = rest[4..].chars().take_while(|c| c.is_ascii_digit()).count();
    if second == 0 {
        return None;
    }
    Some(first + 4 + second)
}

/// Join lines, reducing any run of two or more blank lines to one.
fn collapse_blank_runs(lines: &[String]) -> String {
    let mut out = String::new();
    let mut blanks = 0;
    for line in lines {
        if line.is_empty() {
            blanks += 1;
            continue;
        }
        if !out.is_empty() {
            out.push('\n');
            if blanks > 0 {
                out.push('\n');
            }
        }
        blanks = 0;
        out.push_str(line);
    }
    out
}

/// Truncate on a character boundary.
fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapses_whitespace_runs() {
        assert_eq!(normalize("Week 1:\t\tRead   pages 38-54"), "Week 1: Read pages 38-54");
    }

    #[test]
    fn strips_page_headers() {
        let text = "Contracts I\nPage 3 of 12\nWeek 1: Hawkins v. McGee";
        assert_eq!(normalize(text), "Contracts I\n\nWeek 1: Hawkins v. McGee");
    }

    #[test]
    fn strips_inline_page_headers_case_insensitive() {
        assert_eq!(normalize("intro page 2 of 9 outro"), "intro outro");
        assert_eq!(normalize("intro PAGE 2 of 9 outro"), "intro outro");
    }

    #[test]
    fn drops_standalone_page_number_lines() {
        let text = "Week 1\n14\nWeek 2";
        assert_eq!(normalize(text), "Week 1\n\nWeek 2");
    }

    #[test]
    fn keeps_numbers_inside_sentences() {
        assert_eq!(normalize("Read pages 38-54"), "Read pages 38-54");
    }

    #[test]
    fn normalizes_line_endings() {
        assert_eq!(normalize("a\r\nb\rc"), "a\nb\nc");
    }

    #[test]
    fn collapses_blank_line_runs() {
        assert_eq!(normalize("a\n\n\n\n\nb"), "a\n\nb");
    }

    #[test]
    fn strips_control_characters() {
        assert_eq!(normalize("Week\u{0000} 1\u{0007}: Reading"), "Week 1: Reading");
    }

    #[test]
    fn truncates_to_maximum_length() {
        let long = "x".repeat(MAX_TEXT_CHARS * 2);
        assert_eq!(normalize(&long).chars().count(), MAX_TEXT_CHARS);
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        let long = "é".repeat(MAX_TEXT_CHARS + 100);
        let out = normalize(&long);
        assert_eq!(out.chars().count(), MAX_TEXT_CHARS);
    }

    #[test]
    fn empty_input_stays_empty() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   \n\n  "), "");
    }

    #[test]
    fn normalize_is_idempotent() {
        let samples = [
            "Week 1:\t\tRead   pages 38-54\r\n\r\n\r\nPage 3 of 12\nMidterm  Exam",
            "  leading and trailing   \n\n\n\nblank runs \n7\n",
            "plain single line",
        ];
        for sample in samples {
            let once = normalize(sample);
            assert_eq!(normalize(&once), once, "not idempotent for {sample:?}");
        }
    }

    #[test]
    fn syllabus_detection_needs_three_keywords() {
        let positive = "Course Syllabus. Assignments are due weekly. Midterm exam in March.";
        assert!(looks_like_syllabus(positive));

        let negative = "Quarterly earnings report for fiscal year 2024.";
        assert!(!looks_like_syllabus(negative));
    }

    #[test]
    fn syllabus_detection_is_case_insensitive() {
        assert!(looks_like_syllabus("SYLLABUS with a READING SCHEDULE"));
    }
}
