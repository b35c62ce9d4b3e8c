//! Error types for the Gantry core crate.

use thiserror::Error;

/// Top-level error type for Gantry core operations.
#[derive(Debug, Error)]
pub enum GantryError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("secret error: {0}")]
    Secret(String),
}

/// A convenience Result alias that defaults to [`GantryError`].
pub type Result<T> = std::result::Result<T, GantryError>;
