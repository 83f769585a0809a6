//! Prometheus metrics and structured logging for the ladder bot.
//!
//! - Structured logging with tracing (JSON in production, pretty otherwise)
//! - Prometheus counters for cycles, commands, rejections and anomalies

pub mod error;
pub mod logging;
pub mod metrics;

pub use error::{TelemetryError, TelemetryResult};
pub use logging::init_logging;
pub use metrics::Metrics;
