//! JSON body codec for the monitoring server endpoints
//!
//! Readings are posted as:
//! ```text
//! { "decibels": <number> }
//! ```
//!
//! and the auth endpoint may answer with `{ "token": "..." }`.

use bytes::{BufMut, Bytes, BytesMut};
use thiserror::Error;

use crate::{AuthBody, LogEntry};

/// Maximum body size accepted from the auth endpoint (64 KB)
pub const MAX_BODY_SIZE: usize = 64 * 1024;

/// Content type sent with every reading
pub const CONTENT_TYPE_JSON: &str = "application/json";

/// Errors that can occur during encoding/decoding
#[derive(Error, Debug)]
pub enum CodecError {
    #[error("Body too large: {0} bytes (max: {MAX_BODY_SIZE})")]
    BodyTooLarge(usize),

    #[error("Empty body")]
    EmptyBody,

    #[error("Reading is not a finite number: {0}")]
    NonFinite(f64),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Encode a reading into a JSON body
pub fn encode_log_entry(entry: &LogEntry) -> Result<Bytes, CodecError> {
    // serde_json would emit `null` for these
    if !entry.decibels.is_finite() {
        return Err(CodecError::NonFinite(entry.decibels));
    }

    let mut writer = BytesMut::with_capacity(32).writer();
    serde_json::to_writer(&mut writer, entry)?;

    Ok(writer.into_inner().freeze())
}

/// Decode a reading body (used by test responders and tooling)
pub fn decode_log_entry(buf: &[u8]) -> Result<LogEntry, CodecError> {
    if buf.is_empty() {
        return Err(CodecError::EmptyBody);
    }
    Ok(serde_json::from_slice(buf)?)
}

/// Decode the auth endpoint body
///
/// Returns:
/// - `Ok(body)` if the body is a JSON object (the token field may be absent)
/// - `Err(...)` if the body is empty, oversized or not valid JSON
pub fn decode_auth_body(buf: &[u8]) -> Result<AuthBody, CodecError> {
    if buf.len() > MAX_BODY_SIZE {
        return Err(CodecError::BodyTooLarge(buf.len()));
    }

    if buf.iter().all(u8::is_ascii_whitespace) {
        return Err(CodecError::EmptyBody);
    }

    Ok(serde_json::from_slice(buf)?)
}
