//! Prompt construction for the completion-backed extractor.
//!
//! The builder is deterministic over its inputs and never performs I/O;
//! everything the completion service needs (extraction policy, worked
//! examples, output schema) is assembled here.

use super::types::CourseHint;

/// System role for every extraction call.
pub const EXTRACTION_SYSTEM_PROMPT: &str = "You are an expert at parsing academic syllabi \
and extracting structured information. Always return valid JSON.";

/// Build the user prompt for one extraction call.
///
/// The policy distinguishes specific, dated academic work items
/// (assignments, readings with page ranges, case citations, exam dates)
/// from administrative or general content, which must be excluded. The
/// course hint, when present, is concatenated as context.
pub fn build_extraction_prompt(text: &str, hint: &CourseHint) -> String {
    let course_context = format_course_context(hint);

    format!(
        r#"Analyze the following syllabus text and extract ONLY specific assignments, readings, and exams.

CRITICAL INSTRUCTIONS:
1. IGNORE completely: course descriptions, materials lists, objectives, policies, contact info, general textbook references, "one chapter per week" statements
2. FIND and EXTRACT from: "Weekly Assignments", "Assignment Schedule", "Reading Schedule", "Course Schedule", or any section with specific weekly tasks
3. LOOK FOR patterns like: "Week 1:", "January 17:", "Read:", "Assignment:", "Due:", specific page numbers, case names
4. PRIORITIZE: specific assignments with dates, readings with page numbers, case names, exam dates
5. EXTRACT EXACTLY as written: do not generalize or summarize, capture the specific details
{course_context}
Syllabus Text:
{text}

Return a JSON object with the following structure:
{{
  "assignments": [
    {{
      "title": "Assignment title",
      "due_date": "YYYY-MM-DD",
      "details": "Optional description",
      "priority": "low|medium|high|urgent"
    }}
  ],
  "exams": [
    {{
      "title": "Exam title",
      "date": "YYYY-MM-DD",
      "time": "Optional time",
      "details": "Optional description",
      "priority": "low|medium|high|urgent"
    }}
  ],
  "activities": [
    {{
      "title": "Reading assignment title",
      "details": "Optional description",
      "type": "reading",
      "priority": "low|medium|high|urgent"
    }}
  ],
  "course_info": {{
    "course_name": "Extracted course name",
    "course_code": "Extracted course code",
    "semester": "Extracted semester",
    "year": 2025
  }},
  "confidence_score": 85
}}

EXTRACTION RULES:
1. DATE HANDLING: use ISO format (YYYY-MM-DD) for specific dates; move items with ambiguous or missing dates to activities
2. FORMAT: return valid JSON only, no additional text

WHAT TO EXTRACT (examples):
- "Week 1: Read Hawkins v. McGee, pages 38-54" -> a specific reading
- "Assignment Due: February 14" -> an assignment with a date
- "Midterm Exam: March 15" -> an exam with a date
- "Read: Chapters 25-28, pages 181-206" -> a specific reading

WHAT TO IGNORE (examples):
- "Required textbook: Situations and Contracts"
- "Course objectives: To learn..."
- "Contact: professor@email.com"
- "Attendance policy: Students must..."
- "We will cover approximately one chapter per week"

JSON Response:"#
    )
}

/// One context line when a course name is known, empty otherwise.
fn format_course_context(hint: &CourseHint) -> String {
    let name = match &hint.name {
        Some(name) if !name.trim().is_empty() => name,
        _ => return String::new(),
    };

    let mut line = format!("\nCourse: {name}");
    if let Some(code) = &hint.code {
        line.push_str(&format!(" ({code})"));
    }
    if let Some(semester) = &hint.semester {
        line.push_str(&format!(" - {semester}"));
    }
    if let Some(year) = hint.year {
        line.push_str(&format!(" {year}"));
    }
    line.push('\n');
    line
}
