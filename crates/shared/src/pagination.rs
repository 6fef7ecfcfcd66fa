//! Cursor-based pagination for device data history.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::{DateTime, Utc};
use thiserror::Error;

/// Error type for cursor operations.
#[derive(Debug, Error)]
pub enum CursorError {
    #[error("Invalid cursor format")]
    InvalidFormat,
    #[error("Invalid cursor encoding")]
    InvalidEncoding,
    #[error("Invalid timestamp in cursor")]
    InvalidTimestamp,
    #[error("Invalid ID in cursor")]
    InvalidId,
}

/// Encodes a cursor from timestamp and ID.
///
/// The cursor format is: base64(RFC3339_timestamp:id). The composite cursor
/// keeps ordering stable for data rows sharing the sentinel timestamp.
pub fn encode_cursor(date: DateTime<Utc>, id: i64) -> String {
    let raw = format!(
        "{}:{}",
        date.to_rfc3339_opts(chrono::SecondsFormat::Micros, true),
        id
    );
    URL_SAFE_NO_PAD.encode(raw.as_bytes())
}

/// Decodes a cursor into timestamp and ID.
pub fn decode_cursor(cursor: &str) -> Result<(DateTime<Utc>, i64), CursorError> {
    let decoded = URL_SAFE_NO_PAD
        .decode(cursor)
        .map_err(|_| CursorError::InvalidEncoding)?;

    let s = String::from_utf8(decoded).map_err(|_| CursorError::InvalidFormat)?;

    // Split on last colon (timestamp contains colons)
    let colon_pos = s.rfind(':').ok_or(CursorError::InvalidFormat)?;

    let timestamp_str = &s[..colon_pos];
    let id_str = &s[colon_pos + 1..];

    let id: i64 = id_str.parse().map_err(|_| CursorError::InvalidId)?;

    let timestamp = DateTime::parse_from_rfc3339(timestamp_str)
        .map_err(|_| CursorError::InvalidTimestamp)?
        .with_timezone(&Utc);

    Ok((timestamp, id))
}
