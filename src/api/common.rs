//! Shared handler helpers

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;

use crate::api::middleware::ApiError;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    // Deliberately loose: one @, no whitespace, a dot in the domain
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex is valid")
});

/// Check an email address against the form-validation pattern
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Unwrap a required string field, rejecting missing or blank values
pub fn required(value: Option<String>, message: &str) -> Result<String, ApiError> {
    match value {
        Some(s) if !s.trim().is_empty() => Ok(s),
        _ => Err(ApiError::validation(message)),
    }
}

/// Normalize a nullable text value: blank clears the field to NULL, so a
/// `PUT` with an empty string can undo an earlier value
pub fn none_if_blank(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

/// `?id=` query parameter used by DELETE endpoints
#[derive(Debug, Deserialize)]
pub struct IdQuery {
    pub id: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_emails() {
        assert!(is_valid_email("maria@example.com"));
        assert!(is_valid_email("ion.popescu@spital.ro"));
        assert!(is_valid_email("a+b@sub.domain.org"));
    }

    #[test]
    fn test_invalid_emails() {
        assert!(!is_valid_email(""));
        assert!(!is_valid_email("no-at-sign.com"));
        assert!(!is_valid_email("two@@example.com"));
        assert!(!is_valid_email("spaces in@example.com"));
        assert!(!is_valid_email("nodot@example"));
    }

    #[test]
    fn test_required_rejects_blank() {
        assert!(required(None, "msg").is_err());
        assert!(required(Some("   ".to_string()), "msg").is_err());
        assert_eq!(required(Some("ok".to_string()), "msg").unwrap(), "ok");
    }

    #[test]
    fn test_none_if_blank() {
        assert_eq!(none_if_blank("".to_string()), None);
        assert_eq!(none_if_blank("   ".to_string()), None);
        assert_eq!(none_if_blank("text".to_string()), Some("text".to_string()));
    }
}
