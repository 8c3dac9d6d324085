//! Public signup input normalization and the `{success, message}` result shape.
//!
//! The public form and the embeddable widget render `message` inline, so every
//! outcome of a signup attempt (including rejections) is a [`SignupResult`]
//! rather than an error.

use serde::Serialize;
use validator::ValidateEmail;

use crate::error::CoreError;

pub const MSG_JOINED: &str = "Successfully joined the waitlist!";
pub const MSG_WAITLIST_NOT_FOUND: &str = "Waitlist not found";
pub const MSG_INVALID_EMAIL: &str = "Please enter a valid email address";
pub const MSG_ALREADY_JOINED: &str = "This email is already on the waitlist";
pub const MSG_INVALID_FORM: &str = "Invalid form data";
pub const MSG_UNEXPECTED: &str = "An unexpected error occurred. Please try again.";

/// Maximum length accepted for the optional display name.
pub const MAX_SIGNUP_NAME_LEN: usize = 200;

/// Outcome of a public signup attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupResult {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub referral_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<i64>,
}

impl SignupResult {
    pub fn joined(referral_id: String, position: i64) -> Self {
        Self {
            success: true,
            message: MSG_JOINED.to_string(),
            referral_id: Some(referral_id),
            position: Some(position),
        }
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            referral_id: None,
            position: None,
        }
    }
}

/// A validated signup, ready to persist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedSignup {
    pub email: String,
    pub name: Option<String>,
    pub referred_by: Option<String>,
}

impl NormalizedSignup {
    /// Whether the signup arrived through someone's referral link. Every
    /// signup gets its own token, so this is about `referred_by` only.
    pub fn is_referred(&self) -> bool {
        self.referred_by.is_some()
    }
}

/// Trim inputs, drop empty optionals, and validate the email address.
///
/// The error message is user-facing and goes straight into
/// [`SignupResult::rejected`].
pub fn normalize_signup(
    email: &str,
    name: Option<&str>,
    referred_by: Option<&str>,
) -> Result<NormalizedSignup, CoreError> {
    let email = email.trim();
    if !email.validate_email() {
        return Err(CoreError::Validation(MSG_INVALID_EMAIL.into()));
    }

    let name = non_blank(name);
    if name
        .as_ref()
        .is_some_and(|n| n.chars().count() > MAX_SIGNUP_NAME_LEN)
    {
        return Err(CoreError::Validation(format!(
            "Name must be at most {MAX_SIGNUP_NAME_LEN} characters"
        )));
    }

    Ok(NormalizedSignup {
        email: email.to_string(),
        name,
        referred_by: non_blank(referred_by),
    })
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn trims_and_keeps_valid_email() {
        let s = normalize_signup("  ada@example.com ", Some(" Ada "), None).unwrap();
        assert_eq!(s.email, "ada@example.com");
        assert_eq!(s.name.as_deref(), Some("Ada"));
        assert_eq!(s.referred_by, None);
    }

    #[test]
    fn rejects_malformed_email() {
        for email in ["", "not-an-email", "a@", "@b.com", "a b@c.com"] {
            assert_matches!(
                normalize_signup(email, None, None),
                Err(CoreError::Validation(msg)) if msg == MSG_INVALID_EMAIL,
                "{email:?} should be rejected"
            );
        }
    }

    #[test]
    fn empty_optionals_become_none() {
        let s = normalize_signup("a@b.co", Some(""), Some("   ")).unwrap();
        assert_eq!(s.name, None);
        assert_eq!(s.referred_by, None);
    }

    #[test]
    fn keeps_referral_token() {
        let s = normalize_signup("a@b.co", None, Some("Ab3_x-9Z")).unwrap();
        assert_eq!(s.referred_by.as_deref(), Some("Ab3_x-9Z"));
        assert!(s.is_referred());
    }

    #[test]
    fn blank_referral_token_is_not_a_referral() {
        assert!(!normalize_signup("a@b.co", None, None).unwrap().is_referred());
        assert!(!normalize_signup("a@b.co", None, Some("  ")).unwrap().is_referred());
    }

    #[test]
    fn joined_result_serializes_camel_case() {
        let json = serde_json::to_value(SignupResult::joined("abcdefgh".into(), 3)).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["message"], MSG_JOINED);
        assert_eq!(json["referralId"], "abcdefgh");
        assert_eq!(json["position"], 3);
    }

    #[test]
    fn rejected_result_omits_referral_fields() {
        let json = serde_json::to_value(SignupResult::rejected(MSG_ALREADY_JOINED)).unwrap();
        assert_eq!(json["success"], false);
        assert!(json.get("referralId").is_none());
        assert!(json.get("position").is_none());
    }
}
