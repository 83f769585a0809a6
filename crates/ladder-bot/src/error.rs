//! Application error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Core error: {0}")]
    Core(#[from] ladder_core::CoreError),

    #[error("Engine error: {0}")]
    Engine(#[from] ladder_engine::EngineError),
}

pub type AppResult<T> = Result<T, AppError>;
