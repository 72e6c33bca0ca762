//! Decibel Device Shared Types
//!
//! This crate provides the wire types, endpoint constants and payload codec
//! used by the simulated decibel sensor when talking to the monitoring server.

pub mod codec;

use serde::{Deserialize, Serialize, Serializer};
use std::time::{SystemTime, UNIX_EPOCH};

/// Get current timestamp in milliseconds since Unix epoch
pub fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

/// HTTP endpoints and header names exposed by the monitoring server
pub mod endpoints {
    /// Token issuing endpoint (GET)
    pub const AUTH_PATH: &str = "/api/auth";

    /// Reading ingestion endpoint (POST)
    pub const LOGS_PATH: &str = "/api/logs";

    /// Response header carrying a freshly issued device token
    pub const TOKEN_HEADER: &str = "x-device-token";
}

/// Signal parameters for the simulated sensor
pub mod signal {
    /// Lower bound of the uniform variant (inclusive)
    pub const UNIFORM_MIN_DB: i64 = 55;

    /// Upper bound of the uniform variant (inclusive)
    pub const UNIFORM_MAX_DB: i64 = 65;

    /// Centre of the sine-walk signal
    pub const BASE_DB: f64 = 65.0;

    /// Lowest value the sine-walk variant can emit
    pub const MIN_DB: f64 = 50.0;

    /// Highest value the sine-walk variant can emit
    pub const MAX_DB: f64 = 80.0;

    /// Sine parameters are redrawn every this many ticks
    pub const RERANDOMIZE_EVERY: u64 = 200;

    /// Random-walk offset stays within +/- this bound
    pub const OFFSET_BOUND: f64 = 5.0;

    /// Largest single random-walk step (exclusive)
    pub const OFFSET_STEP: f64 = 0.25;
}

/// A single reading posted to the logging endpoint
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    #[serde(serialize_with = "serialize_decibels")]
    pub decibels: f64,
}

/// Whole readings go on the wire as JSON integers (`62`, not `62.0`)
fn serialize_decibels<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
        serializer.serialize_i64(*value as i64)
    } else {
        serializer.serialize_f64(*value)
    }
}

impl LogEntry {
    /// Create a new log entry
    pub fn new(decibels: f64) -> Self {
        Self { decibels }
    }
}

/// JSON body returned by the auth endpoint when the token is not sent as a header
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuthBody {
    #[serde(default)]
    pub token: Option<String>,
}

impl AuthBody {
    /// The token, if present and not blank
    pub fn into_token(self) -> Option<String> {
        self.token
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_now_ms() {
        assert!(now_ms() > 0);
    }

    #[test]
    fn test_auth_body_blank_token() {
        let body = AuthBody {
            token: Some("   ".into()),
        };
        assert_eq!(body.into_token(), None);

        let body = AuthBody {
            token: Some(" abc \n".into()),
        };
        assert_eq!(body.into_token().as_deref(), Some("abc"));
    }

    #[test]
    fn test_log_entry_creation() {
        let entry = LogEntry::new(61.5);
        assert_eq!(entry.decibels, 61.5);
    }
}
