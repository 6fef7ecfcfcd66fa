//! Common validation utilities.

use chrono::{DateTime, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use validator::ValidationError;

lazy_static! {
    /// Slug charset: letters, numbers, underscores or hyphens.
    static ref SLUG_RE: Regex = Regex::new(r"^[A-Za-z0-9_-]+$").unwrap();
}

/// Maximum length of device and device group names.
pub const MAX_NAME_LEN: usize = 32;

/// Maximum length of a username.
pub const MAX_USERNAME_LEN: usize = 150;

/// Validates a device or device group name.
///
/// Names must be non-empty slugs of at most 32 characters. The message
/// mirrors the one shown for the group field; callers adjust it for the
/// device field where needed.
pub fn validate_slug_name(name: &str) -> Result<(), ValidationError> {
    if name.is_empty() || name.len() > MAX_NAME_LEN || !SLUG_RE.is_match(name) {
        let mut err = ValidationError::new("invalid");
        err.message =
            Some("Enter a valid name consisting of letters, numbers, underscores or hyphens".into());
        return Err(err);
    }
    Ok(())
}

/// Validates a username: slug charset, at most 150 characters.
pub fn validate_username(username: &str) -> Result<(), ValidationError> {
    if username.is_empty() || username.len() > MAX_USERNAME_LEN || !SLUG_RE.is_match(username) {
        let mut err = ValidationError::new("invalid");
        err.message = Some(
            "Enter a valid username consisting of letters, numbers, underscores or hyphens".into(),
        );
        return Err(err);
    }
    Ok(())
}

/// Rejects timestamps that lie strictly in the future.
///
/// Applies to `creation_date`, `date_added` and data `date` fields alike.
pub fn validate_not_future(value: &DateTime<Utc>) -> Result<(), ValidationError> {
    if *value > Utc::now() {
        let mut err = ValidationError::new("future_date");
        err.message = Some("Date cannot be in the future".into());
        return Err(err);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_validate_slug_name_accepts_slugs() {
        assert!(validate_slug_name("sensor-1").is_ok());
        assert!(validate_slug_name("Group_A").is_ok());
        assert!(validate_slug_name("x").is_ok());
        assert!(validate_slug_name(&"a".repeat(32)).is_ok());
    }

    #[test]
    fn test_validate_slug_name_rejects_invalid() {
        assert!(validate_slug_name("").is_err());
        assert!(validate_slug_name("has space").is_err());
        assert!(validate_slug_name("café").is_err());
        assert!(validate_slug_name("a/b").is_err());
        assert!(validate_slug_name(&"a".repeat(33)).is_err());
    }

    #[test]
    fn test_validate_slug_name_error_code() {
        let err = validate_slug_name("bad name").unwrap_err();
        assert_eq!(err.code, "invalid");
    }

    #[test]
    fn test_validate_username() {
        assert!(validate_username("first_member").is_ok());
        assert!(validate_username("member-2").is_ok());
        assert!(validate_username("").is_err());
        assert!(validate_username("no spaces").is_err());
        assert!(validate_username(&"u".repeat(151)).is_err());
    }

    #[test]
    fn test_validate_not_future() {
        assert!(validate_not_future(&Utc::now()).is_ok());
        assert!(validate_not_future(&(Utc::now() - Duration::days(1))).is_ok());

        let err = validate_not_future(&(Utc::now() + Duration::minutes(5))).unwrap_err();
        assert_eq!(err.code, "future_date");
    }
}
