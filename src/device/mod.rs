//! Device run loop
//!
//! This module handles:
//! - Holding the current credential state
//! - Generating and submitting one reading per cycle
//! - Replacing the credential when the server answers 401
//! - Startup authentication with exponential backoff

mod runner;
mod state;

pub use runner::DeviceRunner;
