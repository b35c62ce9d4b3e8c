//! Gantry Core — configuration, installation identity, and the host object model.

pub mod config;
pub mod error;
pub mod models;
pub mod secret;

/// Gantry server version string, as reported in usage statistics.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
