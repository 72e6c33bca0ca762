//! Credential state held by the runner

/// Whether the runner currently holds a credential
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AuthState {
    /// No credential; the next cycle must acquire one
    #[default]
    Unauthenticated,
    /// Credential in use for submissions
    Authenticated(String),
}

impl AuthState {
    /// The credential, if any
    pub fn token(&self) -> Option<&str> {
        match self {
            AuthState::Authenticated(token) => Some(token),
            AuthState::Unauthenticated => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, AuthState::Authenticated(_))
    }
}

/// Result of posting a single reading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// 2xx
    Accepted,
    /// 401, the credential must be replaced
    Unauthorized,
    /// Any other status, logged and ignored
    Rejected { status: u16 },
}

impl SubmitOutcome {
    pub fn from_status(status: u16) -> Self {
        match status {
            200..=299 => SubmitOutcome::Accepted,
            401 => SubmitOutcome::Unauthorized,
            _ => SubmitOutcome::Rejected { status },
        }
    }
}

/// What one cycle did
#[derive(Debug, Clone, PartialEq)]
pub enum CycleOutcome {
    /// Reading accepted by the server
    Sent { decibels: f64 },
    /// Credential rejected and replaced
    Reauthenticated,
    /// Credential rejected and no replacement could be fetched
    ReauthFailed { reason: String },
    /// Server refused the reading with a non-401 status
    Rejected { status: u16 },
    /// No credential available this cycle
    NoCredential { reason: String },
    /// Request failed before a status was received
    Failed { reason: String },
}

impl std::fmt::Display for CycleOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CycleOutcome::Sent { decibels } => write!(f, "sent {} dB", decibels),
            CycleOutcome::Reauthenticated => write!(f, "token replaced"),
            CycleOutcome::ReauthFailed { reason } => write!(f, "token refresh failed: {}", reason),
            CycleOutcome::Rejected { status } => write!(f, "rejected ({})", status),
            CycleOutcome::NoCredential { reason } => write!(f, "no credential: {}", reason),
            CycleOutcome::Failed { reason } => write!(f, "failed: {}", reason),
        }
    }
}
