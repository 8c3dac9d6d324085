//! Waitlist name and slug validation.
//!
//! A slug is the public address of a waitlist (`/waitlist/{slug}`,
//! `/embed/{slug}`). It is validated once on create and never changes.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::CoreError;

/// Lowercase ASCII letters, digits, and hyphens; at least one character.
static SLUG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9-]+$").expect("valid regex"));

/// Maximum length for a waitlist display name.
pub const MAX_WAITLIST_NAME_LEN: usize = 200;

/// Validate a slug against the `[a-z0-9-]+` format.
pub fn validate_slug(slug: &str) -> Result<(), CoreError> {
    if slug.is_empty() {
        return Err(CoreError::Validation("Name and slug are required".into()));
    }
    if !SLUG_RE.is_match(slug) {
        return Err(CoreError::Validation(
            "Slug must contain only lowercase letters, numbers and hyphens".into(),
        ));
    }
    Ok(())
}

/// Validate a waitlist display name: non-blank and within the length limit.
pub fn validate_waitlist_name(name: &str) -> Result<(), CoreError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation("Name and slug are required".into()));
    }
    if trimmed.chars().count() > MAX_WAITLIST_NAME_LEN {
        return Err(CoreError::Validation(format!(
            "Name must be at most {MAX_WAITLIST_NAME_LEN} characters"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn accepts_lowercase_digits_and_hyphens() {
        assert!(validate_slug("launch-2025").is_ok());
        assert!(validate_slug("a").is_ok());
        assert!(validate_slug("---").is_ok());
    }

    #[test]
    fn rejects_uppercase() {
        assert_matches!(validate_slug("Launch"), Err(CoreError::Validation(_)));
    }

    #[test]
    fn rejects_spaces_and_symbols() {
        for slug in ["my list", "my_list", "list!", "caf\u{e9}", "a/b", " lead"] {
            assert!(validate_slug(slug).is_err(), "{slug:?} should be rejected");
        }
    }

    #[test]
    fn rejects_empty_slug() {
        assert_matches!(validate_slug(""), Err(CoreError::Validation(msg)) if msg.contains("required"));
    }

    #[test]
    fn rejects_blank_name() {
        assert!(validate_waitlist_name("   ").is_err());
        assert!(validate_waitlist_name("Acme Beta").is_ok());
    }

    #[test]
    fn rejects_overlong_name() {
        let name = "x".repeat(MAX_WAITLIST_NAME_LEN + 1);
        assert!(validate_waitlist_name(&name).is_err());
    }
}
