//! Engine error types.

use ladder_core::CoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid ladder: {0}")]
    InvalidLadder(String),

    #[error("Core error: {0}")]
    Core(#[from] CoreError),
}

pub type EngineResult<T> = Result<T, EngineError>;
