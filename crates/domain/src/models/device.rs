//! Device model and device CRUD request types.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use validator::{Validate, ValidationError};

/// Code attached to owner-scoped device name collisions.
pub const UNIQUE_NAME_CODE: &str = "unique_name";

/// Message shown for owner-scoped device name collisions.
pub const UNIQUE_NAME_MESSAGE: &str = "A device with this name already exists.";

/// Validates a device name with the device-specific error message.
///
/// Device names are slug-safe, stored lower-cased, and unique
/// (case-insensitive) across ALL devices transitively owned by the same
/// member, regardless of group.
pub fn validate_device_name(name: &str) -> Result<(), ValidationError> {
    shared::validation::validate_slug_name(name).map_err(|mut err| {
        err.message = Some(
            "Enter a valid device name consisting of letters, numbers, underscores or hyphens."
                .into(),
        );
        err
    })
}

/// Request body for registering a device in a group.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateDeviceRequest {
    #[validate(custom(function = "crate::models::device::validate_device_name"))]
    pub name: String,

    /// Optional explicit registration date; rejected when in the future.
    pub date_added: Option<DateTime<Utc>>,
}

/// Request body for editing a device.
///
/// `group` names another group of the same owner to move the device into.
/// Neither renaming nor moving regenerates the UID.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateDeviceRequest {
    #[validate(custom(function = "crate::models::device::validate_device_name"))]
    pub name: String,

    pub group: Option<String>,

    pub is_active: Option<bool>,
}

impl CreateDeviceRequest {
    /// The lower-cased form the name is stored under.
    pub fn normalized_name(&self) -> String {
        self.name.to_lowercase()
    }
}

impl UpdateDeviceRequest {
    /// The lower-cased form the name is stored under.
    pub fn normalized_name(&self) -> String {
        self.name.to_lowercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_device_request_valid() {
        let req = CreateDeviceRequest {
            name: "Sensor-1".to_string(),
            date_added: None,
        };
        assert!(req.validate().is_ok());
        assert_eq!(req.normalized_name(), "sensor-1");
    }

    #[test]
    fn test_create_device_request_rejects_bad_name() {
        let req = CreateDeviceRequest {
            name: "no spaces allowed".to_string(),
            date_added: None,
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_device_name_error_message() {
        let err = validate_device_name("*").unwrap_err();
        assert_eq!(err.code, "invalid");
        assert!(err.message.as_deref().unwrap().contains("device name"));
    }

    #[test]
    fn test_update_device_request_optional_fields() {
        let req = UpdateDeviceRequest {
            name: "d1".to_string(),
            group: Some("other_group".to_string()),
            is_active: None,
        };
        assert!(req.validate().is_ok());
    }
}
