//! Device error types

use decibel_shared::codec::CodecError;
use thiserror::Error;

/// Errors raised while authenticating or submitting readings
#[derive(Debug, Error)]
pub enum DeviceError {
    /// Auth endpoint answered with a non-success status
    #[error("auth request failed ({status})")]
    AuthFailed { status: u16 },

    /// Auth endpoint answered 2xx but carried no token
    #[error("no token in auth response")]
    NoToken,

    /// No usable token in local storage
    #[error("no stored token")]
    NotFound,

    /// HTTP client error (connect, timeout, protocol)
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Endpoint could not be reached
    #[error("endpoint unreachable: {0}")]
    Unreachable(String),

    /// Token file could not be read or written
    #[error("token storage error: {0}")]
    Storage(#[from] std::io::Error),

    /// Reading could not be encoded
    #[error("payload error: {0}")]
    Codec(#[from] CodecError),

    /// Configuration rejected at startup
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl DeviceError {
    /// Whether the error came from talking to the server rather than local state
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            DeviceError::AuthFailed { .. }
                | DeviceError::NoToken
                | DeviceError::Network(_)
                | DeviceError::Unreachable(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, DeviceError>;
