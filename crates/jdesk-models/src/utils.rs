//! Small pure helpers shared across the backend.

/// Normalize an email address for storage and comparison.
///
/// Lowercased and trimmed; uniqueness checks always compare this form.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Derive a URL slug from free text.
///
/// Lowercases, maps every non-alphanumeric run to a single hyphen and
/// strips leading/trailing hyphens. Empty input yields an empty slug.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut last_was_hyphen = true; // suppress a leading hyphen

    for c in text.chars() {
        if c.is_alphanumeric() {
            for lower in c.to_lowercase() {
                slug.push(lower);
            }
            last_was_hyphen = false;
        } else if !last_was_hyphen {
            slug.push('-');
            last_was_hyphen = true;
        }
    }

    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email(" Foo@BAR.com "), "foo@bar.com");
        assert_eq!(normalize_email("a@b.c"), "a@b.c");
    }

    #[test]
    fn test_slugify_basic() {
        assert_eq!(slugify("Senior Rust Engineer"), "senior-rust-engineer");
        assert_eq!(slugify("Data & Analytics"), "data-analytics");
    }

    #[test]
    fn test_slugify_collapses_and_trims() {
        assert_eq!(slugify("  --Hello,   World!--  "), "hello-world");
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn test_slugify_unicode_lowercase() {
        assert_eq!(slugify("Güterverkehr"), "güterverkehr");
    }
}
