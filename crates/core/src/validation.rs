//! Payload validation rules for course and lesson material.
//!
//! Validators collect **all** violations for a payload into a
//! `Vec<FieldViolation>` instead of bailing on the first, so a client
//! can fix everything in one round trip. A violated rule aborts the
//! write entirely; there is no partial mutation.
//!
//! Canonical bounds (see DESIGN.md for the variant decisions):
//!
//! - course title 5–200 chars, restricted character class
//! - lesson title 3–200 chars
//! - course description 20–2000 chars, lesson description 10–1000 chars
//! - video URL: absolute http(s) URL with a YouTube host
//! - lesson title must not equal its description (case-insensitive)

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use validator::ValidateEmail;

/// A single field-level rule violation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FieldViolation {
    pub field: String,
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

const COURSE_TITLE_MIN: usize = 5;
const LESSON_TITLE_MIN: usize = 3;
const TITLE_MAX: usize = 200;

const COURSE_DESCRIPTION_MIN: usize = 20;
const COURSE_DESCRIPTION_MAX: usize = 2000;
const LESSON_DESCRIPTION_MIN: usize = 10;
const LESSON_DESCRIPTION_MAX: usize = 1000;

/// Hosts a lesson video link may point at.
const ALLOWED_VIDEO_HOSTS: [&str; 4] = [
    "youtube.com",
    "www.youtube.com",
    "m.youtube.com",
    "youtu.be",
];

/// Character class permitted in course titles: word characters,
/// whitespace, and basic punctuation.
fn title_charset() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[\w\s\-.,:!?()]+$").expect("title charset regex"))
}

/// Extracts the host portion of an absolute http(s) URL.
fn url_host() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)^https?://([^/:?#]+)").expect("url host regex"))
}

/// Validate a course payload. Returns every violated rule.
pub fn validate_course(title: &str, description: &str) -> Result<(), Vec<FieldViolation>> {
    let mut violations = Vec::new();

    check_length(
        &mut violations,
        "title",
        title,
        COURSE_TITLE_MIN,
        TITLE_MAX,
    );
    if !title.is_empty() && !title_charset().is_match(title) {
        violations.push(FieldViolation::new(
            "title",
            "Title contains characters that are not allowed",
        ));
    }
    check_length(
        &mut violations,
        "description",
        description,
        COURSE_DESCRIPTION_MIN,
        COURSE_DESCRIPTION_MAX,
    );

    if violations.is_empty() {
        Ok(())
    } else {
        Err(violations)
    }
}

/// Validate a lesson payload. Returns every violated rule.
pub fn validate_lesson(
    title: &str,
    description: &str,
    video_url: Option<&str>,
) -> Result<(), Vec<FieldViolation>> {
    let mut violations = Vec::new();

    check_length(
        &mut violations,
        "title",
        title,
        LESSON_TITLE_MIN,
        TITLE_MAX,
    );
    check_length(
        &mut violations,
        "description",
        description,
        LESSON_DESCRIPTION_MIN,
        LESSON_DESCRIPTION_MAX,
    );

    if !title.is_empty() && title.to_lowercase() == description.to_lowercase() {
        violations.push(FieldViolation::new(
            "description",
            "Description must not repeat the title",
        ));
    }

    if let Some(url) = video_url {
        if !is_allowed_video_url(url) {
            violations.push(FieldViolation::new(
                "video_url",
                "Only YouTube video links are allowed",
            ));
        }
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(violations)
    }
}

/// Whether `url` is an absolute http(s) URL with an allow-listed host.
///
/// Path and query content are irrelevant: only the host decides.
pub fn is_allowed_video_url(url: &str) -> bool {
    let Some(captures) = url_host().captures(url) else {
        return false;
    };
    let host = captures[1].to_lowercase();
    ALLOWED_VIDEO_HOSTS.iter().any(|h| *h == host)
}

/// Whether `email` is a syntactically valid address.
pub fn is_valid_email(email: &str) -> bool {
    email.validate_email()
}

fn check_length(
    violations: &mut Vec<FieldViolation>,
    field: &str,
    value: &str,
    min: usize,
    max: usize,
) {
    let len = value.chars().count();
    if len < min {
        violations.push(FieldViolation::new(
            field,
            format!("Must be at least {min} characters long"),
        ));
    } else if len > max {
        violations.push(FieldViolation::new(
            field,
            format!("Must be at most {max} characters long"),
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_course_passes() {
        let result = validate_course(
            "Rust for Backend Engineers",
            "A practical course on building web services in Rust.",
        );
        assert!(result.is_ok());
    }

    #[test]
    fn short_course_title_rejected() {
        let err = validate_course("Rust", "A long enough description for a course.").unwrap_err();
        assert_eq!(err.len(), 1);
        assert_eq!(err[0].field, "title");
    }

    #[test]
    fn course_violations_are_collected_together() {
        // Both the title and the description are invalid; both must be reported.
        let err = validate_course("Rust", "too short").unwrap_err();
        let fields: Vec<_> = err.iter().map(|v| v.field.as_str()).collect();
        assert_eq!(fields, vec!["title", "description"]);
    }

    #[test]
    fn course_title_charset_enforced() {
        let err = validate_course(
            "Rust <script>alert(1)</script>",
            "A long enough description for a course.",
        )
        .unwrap_err();
        assert!(err.iter().any(|v| v.field == "title"));
    }

    #[test]
    fn lesson_title_equal_to_description_rejected() {
        let err = validate_lesson(
            "Ownership Basics",
            "ownership basics",
            Some("https://www.youtube.com/watch?v=abc"),
        )
        .unwrap_err();
        assert!(err.iter().any(|v| v.field == "description"));
    }

    #[test]
    fn youtube_hosts_accepted() {
        for url in [
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
            "https://youtube.com/watch?v=x",
            "http://m.youtube.com/watch?v=x",
            "https://youtu.be/dQw4w9WgXcQ",
        ] {
            assert!(is_allowed_video_url(url), "{url} should be allowed");
        }
    }

    #[test]
    fn foreign_hosts_rejected_regardless_of_path() {
        for url in [
            "https://vimeo.com/12345",
            "https://example.com/youtube.com/watch?v=x",
            "https://youtube.com.evil.net/watch?v=x",
            "ftp://youtube.com/video",
            "not a url",
        ] {
            assert!(!is_allowed_video_url(url), "{url} should be rejected");
        }
    }

    #[test]
    fn lesson_video_url_is_optional() {
        let result = validate_lesson("Intro", "What this course covers.", None);
        assert!(result.is_ok());
    }

    #[test]
    fn email_syntax() {
        assert!(is_valid_email("student@example.com"));
        assert!(!is_valid_email("not-an-email"));
    }
}
