//! Core domain types for the ladder breakout bot.
//!
//! This crate provides the fundamental types shared by the engine and the host:
//! - `Price`, `Size`: Precision-safe numeric types
//! - `Instrument`: Tick size and price precision of the traded symbol
//! - `MarketSnapshot`: Top-of-book quote with availability judgment
//! - `PendingOrder`, `Position`: Ledger views scoped by `OwnerTag`

pub mod decimal;
pub mod error;
pub mod market;
pub mod order;
pub mod types;

pub use decimal::{Price, Size};
pub use error::{CoreError, Result};
pub use market::{Instrument, InstrumentId};
pub use order::{OrderId, OwnerTag, PendingOrder, Position, PositionId, PositionSide, StopSide};
pub use types::{MarketSnapshot, QuoteState};
