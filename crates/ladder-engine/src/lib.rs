//! OCO breakout ladder engine.
//!
//! Provides the reactive core of the ladder bot:
//! - Ladder price calculation around the current quote
//! - Ratcheting break-even / trailing stop policy
//! - The reconciliation state machine deciding, per market update, which
//!   orders to create or cancel and which stops to move
//!
//! # Architecture
//!
//! ```text
//! Market update → LadderController.tick(snapshot, book)
//!                  ├─ LadderState::derive: count owned positions/orders
//!                  ├─ compute_ladder_prices: buy-stop / sell-stop levels
//!                  ├─ next_stop: trailing stop ratchet
//!                  └─ Vec<LedgerCommand>: cancel / create / modify-stop
//!                       ↓
//!                  Ledger (applied sequentially by the host)
//! ```
//!
//! The controller keeps no state between cycles. Everything is re-derived
//! from the ledger view on every call.

pub mod config;
pub mod controller;
pub mod error;
pub mod ledger;
pub mod pricing;
pub mod trailing;

pub use config::{LadderConfig, TrailingConfig};
pub use controller::{CancelReason, LadderController, LadderState, LedgerCommand};
pub use error::{EngineError, EngineResult};
pub use ledger::{Ledger, LedgerError, LedgerResult, OrderRequest, OwnedBook, SnapshotProvider};
pub use pricing::{compute_ladder_prices, LadderPrices};
pub use trailing::next_stop;
