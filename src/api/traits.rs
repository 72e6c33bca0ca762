//! Server API trait abstraction for pluggable HTTP backends

use crate::error::Result;
use async_trait::async_trait;
use bytes::Bytes;

/// Raw answer from the auth endpoint
#[derive(Debug, Clone, Default)]
pub struct AuthReply {
    /// HTTP status code
    pub status: u16,
    /// Value of the token header, when present and valid text
    pub header_token: Option<String>,
    /// Response body as received
    pub body: Bytes,
}

impl AuthReply {
    /// Whether the status is 2xx
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// The monitoring server as seen by the device
#[async_trait]
pub trait DeviceApi: Send + Sync {
    /// Request a fresh device token
    async fn request_token(&self) -> Result<AuthReply>;

    /// Post one reading with the given bearer token, returning the HTTP status
    async fn post_reading(&self, token: &str, decibels: f64) -> Result<u16>;

    /// Human-readable name for this backend
    fn name(&self) -> &'static str;
}
