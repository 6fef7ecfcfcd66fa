//! Device data model and ingestion request types.

use chrono::{DateTime, TimeZone, Utc};
use serde::Deserialize;
use serde_json::Value;
use validator::Validate;

/// Sentinel timestamp for data rows that have never been updated.
///
/// Deliberately NOT the creation time: an omitted `date` marks the payload
/// as "never updated" rather than "received now".
pub fn default_update_datetime() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(1900, 1, 1, 0, 0, 1).unwrap()
}

/// Request body for creating or updating a data row.
///
/// `message` is validated and normalized by [`crate::ingest`], not here;
/// the handler needs the rejection to surface as a field-level error.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct DeviceDataRequest {
    pub message: Value,

    /// Optional update timestamp; rejected when in the future, defaults to
    /// the sentinel when omitted.
    pub date: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    #[test]
    fn test_sentinel_is_1900() {
        let sentinel = default_update_datetime();
        assert_eq!(sentinel.year(), 1900);
        assert_eq!(sentinel.to_rfc3339(), "1900-01-01T00:00:01+00:00");
    }

    #[test]
    fn test_request_deserializes_object_message() {
        let req: DeviceDataRequest =
            serde_json::from_str(r#"{"message": {"foo": "bar"}}"#).unwrap();
        assert!(req.message.is_object());
        assert!(req.date.is_none());
    }

    #[test]
    fn test_request_deserializes_string_message() {
        let req: DeviceDataRequest =
            serde_json::from_str(r#"{"message": "{\"foo\": 1}"}"#).unwrap();
        assert!(req.message.is_string());
    }
}
