//! Device token handling
//!
//! This module handles:
//! - Persisting the bearer token to a local file
//! - Reusing a stored token across restarts
//! - Fetching a fresh token from the auth endpoint
//! - Dropping the token when the server rejects it

mod manager;
mod store;

pub use manager::TokenManager;
pub use store::TokenStore;
