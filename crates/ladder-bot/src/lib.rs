//! OCO breakout ladder bot.
//!
//! Host side of the ladder engine:
//! - Configuration loading (TOML file + `LADDER__` environment overrides)
//! - `LadderRunner`: one reconciliation cycle per market update, commands
//!   applied sequentially to the ledger, teardown on shutdown
//! - `PaperLedger`: in-memory venue for dry runs and integration tests

pub mod config;
pub mod error;
pub mod paper;
pub mod runner;

pub use config::{AppConfig, InstrumentConfig, TelemetryConfig};
pub use error::{AppError, AppResult};
pub use paper::{CloseReason, PaperEvent, PaperLedger, PaperQuote};
pub use runner::{CycleReport, LadderRunner};
