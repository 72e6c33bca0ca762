//! Token manager - acquires, reuses and invalidates the device token

use super::store::TokenStore;
use crate::api::DeviceApi;
use crate::error::{DeviceError, Result};
use decibel_shared::codec;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Where a fetched token was found in the auth reply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenSource {
    Header,
    Body,
}

/// Owns the single cached credential
pub struct TokenManager {
    store: TokenStore,
    api: Arc<dyn DeviceApi>,
}

impl TokenManager {
    pub fn new(store: TokenStore, api: Arc<dyn DeviceApi>) -> Self {
        Self { store, api }
    }

    /// Read the persisted token
    pub fn load(&self) -> Result<String> {
        self.store.load()
    }

    /// Request a fresh token from the server and persist it
    pub async fn fetch(&self) -> Result<String> {
        let reply = self.api.request_token().await?;

        if !reply.is_success() {
            return Err(DeviceError::AuthFailed {
                status: reply.status,
            });
        }

        let (token, source) = match reply.header_token.filter(|t| !t.trim().is_empty()) {
            Some(token) => (token.trim().to_string(), TokenSource::Header),
            None => {
                // An unreadable body counts the same as a body without a token
                let token = match codec::decode_auth_body(&reply.body) {
                    Ok(body) => body.into_token(),
                    Err(e) => {
                        debug!(error = %e, "Auth body not usable");
                        None
                    }
                };
                (token.ok_or(DeviceError::NoToken)?, TokenSource::Body)
            }
        };

        self.store.save(&token)?;
        info!(source = ?source, via = self.api.name(), "Obtained new token");

        Ok(token)
    }

    /// Stored token if there is one, otherwise a freshly fetched one
    pub async fn get(&self) -> Result<String> {
        match self.load() {
            Ok(token) => {
                debug!(path = %self.store.path().display(), "Using stored token");
                Ok(token)
            }
            Err(DeviceError::NotFound) => self.fetch().await,
            Err(e) => {
                warn!(error = %e, "Stored token unreadable, fetching a new one");
                self.fetch().await
            }
        }
    }

    /// Forget the persisted token
    pub fn invalidate(&self) -> Result<()> {
        self.store.clear()
    }

    pub fn store(&self) -> &TokenStore {
        &self.store
    }
}
