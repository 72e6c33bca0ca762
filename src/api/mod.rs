//! Monitoring server API
//!
//! The device talks to two endpoints: token issuing and reading ingestion.
//! Both sit behind the `DeviceApi` trait so the run loop can be driven by a
//! scripted backend in tests.

#[cfg(test)]
pub mod fake;
pub mod http;
pub mod traits;

pub use http::HttpApi;
pub use traits::DeviceApi;
