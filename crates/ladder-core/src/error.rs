//! Error types for ladder-core.

use thiserror::Error;

/// Core error types.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Invalid instrument: {0}")]
    InvalidInstrument(String),
}

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
