//! Device configuration

use crate::error::DeviceError;
use crate::signal::SignalKind;
use std::path::PathBuf;
use std::time::Duration;

/// Configuration for the simulated device
#[derive(Debug, Clone)]
pub struct DeviceConfig {
    /// Monitoring server base URL (no trailing slash)
    pub base_url: String,
    /// File holding the persisted device token
    pub token_file: PathBuf,
    /// Which signal generator to run
    pub signal: SignalKind,
    /// Time between submission cycles
    pub interval: Duration,
    /// Total time allowed for a single request
    pub request_timeout: Duration,
    /// Time allowed to establish a connection
    pub connect_timeout: Duration,
    /// Startup auth retry delay (initial)
    pub auth_retry_delay: Duration,
    /// Maximum startup auth retry delay
    pub max_auth_retry_delay: Duration,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        let signal = SignalKind::default();
        Self {
            base_url: "http://127.0.0.1:3010".into(),
            token_file: PathBuf::from("token.txt"),
            signal,
            interval: signal.default_interval(),
            request_timeout: Duration::from_secs(5),
            connect_timeout: Duration::from_secs(2),
            auth_retry_delay: Duration::from_secs(1),
            max_auth_retry_delay: Duration::from_secs(30),
        }
    }
}

impl DeviceConfig {
    /// Create configuration from environment variables, falling back to defaults
    ///
    /// Unset variables take their default; a variable that is set but does not
    /// parse is `InvalidConfig`.
    pub fn from_env() -> Result<Self, DeviceError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create configuration from any key/value source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, DeviceError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let signal = parse_var(&lookup, "DEVICE_SIGNAL", |s| s.parse::<SignalKind>().ok())?
            .unwrap_or(defaults.signal);
        let millis = |key: &str| {
            parse_var(&lookup, key, |s| s.trim().parse::<u64>().ok())
                .map(|ms| ms.map(Duration::from_millis))
        };

        Ok(Self {
            base_url: lookup("DEVICE_BASE_URL")
                .map(|s| s.trim().trim_end_matches('/').to_string())
                .unwrap_or(defaults.base_url),
            token_file: lookup("DEVICE_TOKEN_FILE")
                .map(PathBuf::from)
                .unwrap_or(defaults.token_file),
            signal,
            interval: millis("DEVICE_INTERVAL_MS")?.unwrap_or(signal.default_interval()),
            request_timeout: millis("DEVICE_REQUEST_TIMEOUT_MS")?
                .unwrap_or(defaults.request_timeout),
            connect_timeout: millis("DEVICE_CONNECT_TIMEOUT_MS")?
                .unwrap_or(defaults.connect_timeout),
            auth_retry_delay: millis("DEVICE_AUTH_RETRY_MS")?
                .unwrap_or(defaults.auth_retry_delay),
            max_auth_retry_delay: millis("DEVICE_AUTH_RETRY_MAX_MS")?
                .unwrap_or(defaults.max_auth_retry_delay),
        })
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), DeviceError> {
        if self.base_url.is_empty() {
            return Err(DeviceError::InvalidConfig("base_url cannot be empty".into()));
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(DeviceError::InvalidConfig(
                "base_url must start with http:// or https://".into(),
            ));
        }

        if self.token_file.as_os_str().is_empty() {
            return Err(DeviceError::InvalidConfig("token_file cannot be empty".into()));
        }

        if self.interval.is_zero() {
            return Err(DeviceError::InvalidConfig("interval must be greater than 0".into()));
        }

        if self.request_timeout.is_zero() || self.connect_timeout.is_zero() {
            return Err(DeviceError::InvalidConfig("timeouts must be greater than 0".into()));
        }

        if self.auth_retry_delay.is_zero() || self.max_auth_retry_delay < self.auth_retry_delay {
            return Err(DeviceError::InvalidConfig(
                "auth retry delay must be > 0 and <= max auth retry delay".into(),
            ));
        }

        Ok(())
    }

    /// Full URL for an endpoint path
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

fn parse_var<F, T, P>(lookup: &F, key: &str, parse: P) -> Result<Option<T>, DeviceError>
where
    F: Fn(&str) -> Option<String>,
    P: Fn(&str) -> Option<T>,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => parse(&raw)
            .map(Some)
            .ok_or_else(|| DeviceError::InvalidConfig(format!("{}: cannot parse {:?}", key, raw))),
    }
}
