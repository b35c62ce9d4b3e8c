//! Error types for the Gantry telemetry crate.

use thiserror::Error;

/// Top-level error type for usage-statistics operations.
#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("key decode error: {0}")]
    KeyDecode(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("crypto error: {0}")]
    Crypto(String),

    #[error("encoding error: {0}")]
    Encoding(String),
}

/// A convenience Result alias that defaults to [`TelemetryError`].
pub type Result<T> = std::result::Result<T, TelemetryError>;
