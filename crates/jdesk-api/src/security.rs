//! Input validation and sanitization helpers.

use std::sync::LazyLock;

use regex_lite::Regex;

/// Maximum display-name length.
pub const MAX_NAME_LENGTH: usize = 200;

/// Maximum email length (RFC 3696 envelope limit).
pub const MAX_EMAIL_LENGTH: usize = 320;

/// Password length bounds.
pub const MIN_PASSWORD_LENGTH: usize = 8;
pub const MAX_PASSWORD_LENGTH: usize = 128;

/// Maximum job title length.
pub const MAX_TITLE_LENGTH: usize = 200;

/// Maximum free-text length (job/company descriptions).
pub const MAX_TEXT_LENGTH: usize = 20_000;

/// Maximum cover-letter length.
pub const MAX_COVER_LETTER_LENGTH: usize = 10_000;

/// Maximum URL length (resume links, websites).
pub const MAX_URL_LENGTH: usize = 2048;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap());

/// Lightweight shape check for email addresses; the mail system is the
/// real validator.
pub fn is_valid_email(email: &str) -> bool {
    !email.is_empty() && email.len() <= MAX_EMAIL_LENGTH && EMAIL_RE.is_match(email)
}

/// Sanitize a user-provided string for safe logging and storage:
/// strips control characters (keeping newlines and tabs) and caps length.
pub fn sanitize_text(input: &str, max_len: usize) -> String {
    input
        .chars()
        .filter(|c| !c.is_control() || *c == '\n' || *c == '\t')
        .take(max_len)
        .collect()
}

/// Sanitize a single-line field: trimmed, control characters removed,
/// length-capped.
pub fn sanitize_line(input: &str, max_len: usize) -> String {
    input
        .trim()
        .chars()
        .filter(|c| !c.is_control())
        .take(max_len)
        .collect()
}

/// Validate a document ID path segment.
///
/// IDs are uuid-shaped strings; anything with path separators or odd
/// lengths is rejected before it reaches a Firestore path.
pub fn is_valid_doc_id(id: &str) -> bool {
    if id.len() < 8 || id.len() > 64 {
        return false;
    }
    id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
}

/// Validate an optional http(s) URL field.
pub fn is_valid_http_url(url: &str) -> bool {
    url.len() <= MAX_URL_LENGTH && (url.starts_with("http://") || url.starts_with("https://"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_validation() {
        assert!(is_valid_email("ada@example.com"));
        assert!(is_valid_email("a.b+tag@sub.domain.io"));
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("spaces in@mail.com"));
        assert!(!is_valid_email("missing@tld"));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn test_sanitize_text_strips_control_chars() {
        assert_eq!(sanitize_text("a\u{0}b\nc", 100), "ab\nc");
        assert_eq!(sanitize_text("abcdef", 3), "abc");
    }

    #[test]
    fn test_sanitize_line_trims() {
        assert_eq!(sanitize_line("  Ada\tLovelace \r", 100), "AdaLovelace");
    }

    #[test]
    fn test_doc_id_validation() {
        assert!(is_valid_doc_id("550e8400-e29b-41d4-a716-446655440000"));
        assert!(is_valid_doc_id("abcd1234"));
        assert!(!is_valid_doc_id("short"));
        assert!(!is_valid_doc_id("has/slash-in-the-middle"));
        assert!(!is_valid_doc_id("has..dots-and-more"));
    }

    #[test]
    fn test_url_validation() {
        assert!(is_valid_http_url("https://example.com/cv.pdf"));
        assert!(!is_valid_http_url("ftp://example.com"));
        assert!(!is_valid_http_url("javascript:alert(1)"));
    }
}
