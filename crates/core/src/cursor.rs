//! Opaque keyset-pagination cursors.
//!
//! A cursor is the standard base64 encoding of `"<timestamp>:<uuid>"`, the
//! `(created_at, id)` watermark of the last row on a page. Clients treat it
//! as an opaque string and hand it back to fetch the next page.
//!
//! Timestamps themselves contain colons, so decoding splits at the *last*
//! colon. Both halves are validated independently and returned verbatim,
//! which makes `decode_cursor(&encode_cursor(t, id))` return `(t, id)`
//! exactly.

use std::sync::LazyLock;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{DateTime, NaiveDateTime};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// RFC 4122 textual form: 8-4-4-4-12 hex digits, either case.
static UUID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$")
        .expect("valid regex")
});

/// Separator between the timestamp and id segments.
const SEPARATOR: char = ':';

/// The watermark carried by a cursor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodedCursor {
    /// ISO 8601 timestamp, exactly as it was encoded.
    pub created_at: String,
    /// Row id, exactly as it was encoded.
    pub id: String,
}

/// Reasons a cursor string is rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CursorError {
    #[error("Invalid cursor: malformed base64 encoding")]
    MalformedBase64,

    #[error("Invalid cursor: missing ':' separator")]
    MissingSeparator,

    #[error("Invalid cursor: timestamp is not a valid ISO 8601 date")]
    InvalidTimestamp,

    #[error("Invalid cursor: id is not a valid UUID")]
    InvalidId,
}

impl From<CursorError> for CoreError {
    fn from(err: CursorError) -> Self {
        CoreError::Validation(err.to_string())
    }
}

/// Encode a `(created_at, id)` watermark as an opaque cursor.
///
/// ```
/// use savor_core::cursor::encode_cursor;
///
/// assert_eq!(
///     encode_cursor("2024-01-15T10:30:00.000Z", "123e4567-e89b-12d3-a456-426614174000"),
///     "MjAyNC0wMS0xNVQxMDozMDowMC4wMDBaOjEyM2U0NTY3LWU4OWItMTJkMy1hNDU2LTQyNjYxNDE3NDAwMA==",
/// );
/// ```
pub fn encode_cursor(created_at: &str, id: &str) -> String {
    STANDARD.encode(format!("{created_at}{SEPARATOR}{id}"))
}

/// Decode and validate a cursor produced by [`encode_cursor`].
pub fn decode_cursor(cursor: &str) -> Result<DecodedCursor, CursorError> {
    let bytes = STANDARD
        .decode(cursor.trim())
        .map_err(|_| CursorError::MalformedBase64)?;
    let decoded = String::from_utf8(bytes).map_err(|_| CursorError::MalformedBase64)?;

    let (created_at, id) = decoded
        .rsplit_once(SEPARATOR)
        .ok_or(CursorError::MissingSeparator)?;

    if !is_iso8601_timestamp(created_at) {
        return Err(CursorError::InvalidTimestamp);
    }
    if !is_uuid(id) {
        return Err(CursorError::InvalidId);
    }

    Ok(DecodedCursor {
        created_at: created_at.to_string(),
        id: id.to_string(),
    })
}

impl DecodedCursor {
    /// Re-encode this watermark.
    pub fn encode(&self) -> String {
        encode_cursor(&self.created_at, &self.id)
    }
}

/// Accepts RFC 3339 date-times (with offset or `Z`) and offset-less
/// `YYYY-MM-DDTHH:MM:SS[.fff]` values.
pub fn is_iso8601_timestamp(value: &str) -> bool {
    DateTime::parse_from_rfc3339(value).is_ok()
        || NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f").is_ok()
}

/// Whether `value` is a UUID in its canonical hyphenated textual form.
pub fn is_uuid(value: &str) -> bool {
    UUID_RE.is_match(value)
}
