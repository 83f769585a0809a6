//! Pending order and position views.
//!
//! The ledger owns orders and positions. These types are per-cycle copies
//! that the controller inspects and then drops.

use crate::{InstrumentId, Price, Size};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Side of a pending breakout order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StopSide {
    /// Triggers a market buy once ask reaches the trigger price.
    BuyStop,
    /// Triggers a market sell once bid reaches the trigger price.
    SellStop,
}

impl StopSide {
    /// Position side opened when this order fills.
    pub fn position_side(&self) -> PositionSide {
        match self {
            Self::BuyStop => PositionSide::Long,
            Self::SellStop => PositionSide::Short,
        }
    }
}

impl fmt::Display for StopSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BuyStop => write!(f, "buy-stop"),
            Self::SellStop => write!(f, "sell-stop"),
        }
    }
}

/// Side of an open position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PositionSide {
    Long,
    Short,
}

impl PositionSide {
    /// Returns 1 for long, -1 for short (for profit direction).
    pub fn sign(&self) -> i64 {
        match self {
            Self::Long => 1,
            Self::Short => -1,
        }
    }
}

impl fmt::Display for PositionSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Long => write!(f, "long"),
            Self::Short => write!(f, "short"),
        }
    }
}

/// Ledger-assigned pending order identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(pub u64);

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Ledger-assigned position identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PositionId(pub u64);

impl fmt::Display for PositionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Owner tag scoping every read and write of a controller.
///
/// Controllers sharing a ledger and an instrument must use distinct tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OwnerTag(pub u64);

impl fmt::Display for OwnerTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A pending (not yet triggered) order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingOrder {
    pub id: OrderId,
    pub instrument: InstrumentId,
    pub side: StopSide,
    pub trigger_price: Price,
    pub take_profit: Price,
    pub lots: Size,
    pub owner: OwnerTag,
    pub label: String,
    pub created_at: DateTime<Utc>,
}

impl PendingOrder {
    /// Check whether this order belongs to `owner` on `instrument`.
    pub fn is_owned_by(&self, owner: OwnerTag, instrument: &InstrumentId) -> bool {
        self.owner == owner && &self.instrument == instrument
    }
}

/// An open position produced by a filled order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub id: PositionId,
    pub instrument: InstrumentId,
    pub side: PositionSide,
    pub entry_price: Price,
    /// Protective stop; None until the trailing policy sets one.
    pub stop_loss: Option<Price>,
    pub take_profit: Option<Price>,
    pub lots: Size,
    pub owner: OwnerTag,
    pub opened_at: DateTime<Utc>,
}

impl Position {
    /// Check whether this position belongs to `owner` on `instrument`.
    pub fn is_owned_by(&self, owner: OwnerTag, instrument: &InstrumentId) -> bool {
        self.owner == owner && &self.instrument == instrument
    }

    /// Signed profit in whole ticks at `price` (floored).
    pub fn profit_ticks(&self, price: Price, tick_size: Price) -> Option<i64> {
        match self.side {
            PositionSide::Long => price.ticks_from(self.entry_price, tick_size),
            PositionSide::Short => self.entry_price.ticks_from(price, tick_size),
        }
    }
}
