//! Device group model and group CRUD request types.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use validator::{Validate, ValidationError};

/// Code attached to owner-scoped group name collisions.
pub const UNIQUE_NAME_CODE: &str = "unique_name";

/// Message shown for owner-scoped group name collisions.
pub const UNIQUE_NAME_MESSAGE: &str = "A device group with this name already exists.";

/// Validates a group name with the group-specific error message.
///
/// Group names are slug-safe, stored lower-cased, and unique
/// (case-insensitive) only within the owning member's set of groups.
pub fn validate_group_name(name: &str) -> Result<(), ValidationError> {
    shared::validation::validate_slug_name(name).map_err(|mut err| {
        err.message = Some(
            "Enter a valid device group name consisting of letters, numbers, underscores or hyphens."
                .into(),
        );
        err
    })
}

/// Request body for creating or updating a device group.
///
/// Updates reuse the same shape; a name equal to the stored one counts as
/// unchanged and skips the uniqueness check.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct GroupRequest {
    #[validate(custom(function = "crate::models::device_group::validate_group_name"))]
    pub name: String,

    #[serde(default)]
    #[validate(length(max = 256, message = "Description must be at most 256 characters"))]
    pub description: String,

    /// Optional explicit creation date; rejected when in the future.
    pub creation_date: Option<DateTime<Utc>>,
}

impl GroupRequest {
    /// The lower-cased form the name is stored under.
    pub fn normalized_name(&self) -> String {
        self.name.to_lowercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_request_valid() {
        let req = GroupRequest {
            name: "Test_Group-1".to_string(),
            description: String::new(),
            creation_date: None,
        };
        assert!(req.validate().is_ok());
        assert_eq!(req.normalized_name(), "test_group-1");
    }

    #[test]
    fn test_group_request_rejects_bad_name() {
        let req = GroupRequest {
            name: "has spaces".to_string(),
            description: String::new(),
            creation_date: None,
        };
        let err = req.validate().unwrap_err();
        assert!(err.field_errors().contains_key("name"));
    }

    #[test]
    fn test_group_name_error_message() {
        let err = validate_group_name("bad name").unwrap_err();
        assert_eq!(err.code, "invalid");
        assert!(err
            .message
            .as_deref()
            .unwrap()
            .contains("device group name"));
    }

    #[test]
    fn test_group_request_rejects_long_description() {
        let req = GroupRequest {
            name: "group".to_string(),
            description: "d".repeat(257),
            creation_date: None,
        };
        assert!(req.validate().is_err());
    }
}
