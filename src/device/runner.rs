//! Device runner - owns the credential and drives submission cycles

use super::state::{AuthState, CycleOutcome, SubmitOutcome};
use crate::api::DeviceApi;
use crate::config::DeviceConfig;
use crate::error::Result;
use crate::signal::SignalGenerator;
use crate::token::{TokenManager, TokenStore};
use decibel_shared::now_ms;
use std::sync::Arc;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, error, info, warn};

/// Run-loop context: every piece of mutable device state lives here
pub struct DeviceRunner {
    config: DeviceConfig,
    api: Arc<dyn DeviceApi>,
    tokens: TokenManager,
    signal: Box<dyn SignalGenerator>,
    state: AuthState,
}

impl DeviceRunner {
    /// Create a new runner; no network or file access happens until it runs
    pub fn new(
        config: DeviceConfig,
        api: Arc<dyn DeviceApi>,
        signal: Box<dyn SignalGenerator>,
    ) -> Self {
        let tokens = TokenManager::new(TokenStore::new(config.token_file.clone()), api.clone());
        Self {
            config,
            api,
            tokens,
            signal,
            state: AuthState::Unauthenticated,
        }
    }

    /// Current credential state
    pub fn state(&self) -> &AuthState {
        &self.state
    }

    /// Single attempt to obtain a credential (stored first, then fetched)
    pub async fn authenticate(&mut self) -> Result<()> {
        let token = self.tokens.get().await?;
        self.state = AuthState::Authenticated(token);
        Ok(())
    }

    /// Keep trying to authenticate, backing off exponentially between attempts
    pub async fn authenticate_with_backoff(&mut self) {
        let mut retry_delay = self.config.auth_retry_delay;
        let mut attempt = 0u32;

        loop {
            attempt += 1;
            match self.authenticate().await {
                Ok(()) => {
                    info!(attempt, "Authenticated");
                    return;
                }
                Err(e) => {
                    error!(
                        error = %e,
                        attempt,
                        remote = e.is_remote(),
                        retry_in_ms = retry_delay.as_millis() as u64,
                        "Authentication failed"
                    );
                }
            }

            tokio::time::sleep(retry_delay).await;

            // Exponential backoff
            retry_delay = std::cmp::min(retry_delay * 2, self.config.max_auth_retry_delay);
        }
    }

    /// Post one reading and classify the response; never re-authenticates by itself
    pub async fn submit(&self, token: &str, decibels: f64) -> Result<SubmitOutcome> {
        let status = self.api.post_reading(token, decibels).await?;
        Ok(SubmitOutcome::from_status(status))
    }

    /// One generate-and-submit cycle. Errors are handled here and never escape.
    pub async fn run_cycle(&mut self) -> CycleOutcome {
        let current = self.state.token().map(str::to_string);
        let token = match current {
            Some(token) => token,
            None => match self.tokens.get().await {
                Ok(token) => {
                    self.state = AuthState::Authenticated(token.clone());
                    token
                }
                Err(e) => {
                    error!(error = %e, "No credential available");
                    return CycleOutcome::NoCredential {
                        reason: e.to_string(),
                    };
                }
            },
        };

        let decibels = self.signal.next_reading();

        match self.submit(&token, decibels).await {
            Ok(SubmitOutcome::Accepted) => {
                info!(decibels, sent_at_ms = now_ms(), "Sent reading");
                CycleOutcome::Sent { decibels }
            }
            Ok(SubmitOutcome::Unauthorized) => {
                warn!("Token rejected, refreshing");
                self.reauthenticate().await
            }
            Ok(SubmitOutcome::Rejected { status }) => {
                error!(status, decibels, "Log post failed");
                CycleOutcome::Rejected { status }
            }
            Err(e) => {
                error!(error = %e, "Unexpected error");
                CycleOutcome::Failed {
                    reason: e.to_string(),
                }
            }
        }
    }

    /// Drop the rejected credential and fetch a replacement
    async fn reauthenticate(&mut self) -> CycleOutcome {
        self.state = AuthState::Unauthenticated;

        if let Err(e) = self.tokens.invalidate() {
            warn!(error = %e, "Could not delete stored token");
        }

        match self.tokens.fetch().await {
            Ok(token) => {
                self.state = AuthState::Authenticated(token);
                CycleOutcome::Reauthenticated
            }
            Err(e) => {
                error!(error = %e, "Token refresh failed, retrying next cycle");
                CycleOutcome::ReauthFailed {
                    reason: e.to_string(),
                }
            }
        }
    }

    /// Authenticate, then run cycles forever. Each cycle finishes before the
    /// next tick is awaited, so cycles never overlap.
    pub async fn run(&mut self) {
        info!(
            api = self.api.name(),
            base_url = %self.config.base_url,
            token_file = %self.tokens.store().path().display(),
            signal = %self.signal.kind(),
            "Authenticating"
        );
        self.authenticate_with_backoff().await;

        info!(interval_ms = self.config.interval.as_millis() as u64, "Starting mock device");

        let mut ticker = interval(self.config.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            let outcome = self.run_cycle().await;
            debug!(%outcome, "Cycle complete");
        }
    }
}
