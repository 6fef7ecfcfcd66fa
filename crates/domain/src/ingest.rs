//! Data message acceptance.
//!
//! Inbound device data arrives as a `message` field that may be a JSON
//! object or array, a JSON-encoded string, or anything else. The first two
//! shapes are normalized to a parsed JSON value; everything else is
//! rejected with the `invalid_json` code.

use serde_json::Value;
use thiserror::Error;

/// Machine-readable code attached to message rejections.
pub const INVALID_JSON_CODE: &str = "invalid_json";

/// Fixed message attached to message rejections.
pub const INVALID_JSON_MESSAGE: &str =
    "Message must be either a valid JSON object or a UTF-8 encoded JSON string.";

/// Error type for message acceptance.
#[derive(Debug, Error, PartialEq)]
pub enum MessageError {
    #[error("{}", INVALID_JSON_MESSAGE)]
    InvalidJson,
}

/// Validates and normalizes an inbound data message.
///
/// - Objects and arrays are accepted as-is.
/// - Strings must themselves parse as JSON text; the parsed value is
///   stored, not the raw string. The empty string is invalid JSON text.
/// - Bare numbers, booleans and null are rejected.
pub fn normalize_message(value: Value) -> Result<Value, MessageError> {
    match value {
        Value::Object(_) | Value::Array(_) => Ok(value),
        Value::String(text) => serde_json::from_str(&text).map_err(|_| MessageError::InvalidJson),
        _ => Err(MessageError::InvalidJson),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_object_accepted_as_is() {
        let msg = json!({"foo": "bar"});
        assert_eq!(normalize_message(msg.clone()).unwrap(), msg);
    }

    #[test]
    fn test_array_accepted_as_is() {
        let msg = json!([1, 2, {"a": true}]);
        assert_eq!(normalize_message(msg.clone()).unwrap(), msg);
    }

    #[test]
    fn test_json_string_parsed() {
        let msg = Value::String(r#"{"foo":"bar"}"#.to_string());
        assert_eq!(normalize_message(msg).unwrap(), json!({"foo": "bar"}));
    }

    #[test]
    fn test_truncated_json_string_rejected() {
        let msg = Value::String(r#"{"foo":"bar""#.to_string());
        assert_eq!(normalize_message(msg), Err(MessageError::InvalidJson));
    }

    #[test]
    fn test_empty_string_rejected() {
        let msg = Value::String(String::new());
        assert_eq!(normalize_message(msg), Err(MessageError::InvalidJson));
    }

    #[test]
    fn test_bare_scalars_rejected() {
        assert_eq!(normalize_message(json!(42)), Err(MessageError::InvalidJson));
        assert_eq!(
            normalize_message(json!(true)),
            Err(MessageError::InvalidJson)
        );
        assert_eq!(
            normalize_message(Value::Null),
            Err(MessageError::InvalidJson)
        );
    }

    #[test]
    fn test_string_encoding_scalar_is_parsed() {
        // A string containing JSON text parses, whatever it encodes
        let msg = Value::String("42".to_string());
        assert_eq!(normalize_message(msg).unwrap(), json!(42));
    }
}
