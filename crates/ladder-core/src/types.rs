//! Market snapshot and quote availability.
//!
//! A zero on either side of the quote means "unavailable" and must
//! suppress all ladder activity for the cycle.

use crate::{InstrumentId, Price};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Quote availability state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuoteState {
    /// Both bid and ask are present and bid <= ask.
    Valid,
    /// No bid side (bid price is zero or negative).
    NoBid,
    /// No ask side (ask price is zero or negative).
    NoAsk,
    /// Both sides missing.
    Empty,
    /// Bid above ask.
    Crossed,
}

impl QuoteState {
    /// Check if this state allows trading decisions.
    pub fn is_tradeable(&self) -> bool {
        matches!(self, Self::Valid)
    }
}

impl std::fmt::Display for QuoteState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Valid => write!(f, "VALID"),
            Self::NoBid => write!(f, "NO_BID"),
            Self::NoAsk => write!(f, "NO_ASK"),
            Self::Empty => write!(f, "EMPTY"),
            Self::Crossed => write!(f, "CROSSED"),
        }
    }
}

/// Point-in-time quote for one instrument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketSnapshot {
    /// Instrument this quote belongs to.
    pub instrument: InstrumentId,
    /// Best bid price.
    pub bid: Price,
    /// Best ask price.
    pub ask: Price,
    /// Quote timestamp.
    pub timestamp: DateTime<Utc>,
}

impl MarketSnapshot {
    /// Create a snapshot stamped with the current time.
    pub fn new(instrument: InstrumentId, bid: Price, ask: Price) -> Self {
        Self {
            instrument,
            bid,
            ask,
            timestamp: Utc::now(),
        }
    }

    /// Sentinel returned by providers when no quote exists.
    pub fn unavailable(instrument: InstrumentId) -> Self {
        Self::new(instrument, Price::ZERO, Price::ZERO)
    }

    /// Get the quote state.
    pub fn state(&self) -> QuoteState {
        let has_bid = self.bid.is_positive();
        let has_ask = self.ask.is_positive();

        match (has_bid, has_ask) {
            (false, false) => QuoteState::Empty,
            (true, false) => QuoteState::NoAsk,
            (false, true) => QuoteState::NoBid,
            (true, true) if self.bid <= self.ask => QuoteState::Valid,
            (true, true) => QuoteState::Crossed,
        }
    }

    /// Check if the snapshot can drive trading decisions.
    pub fn is_available(&self) -> bool {
        self.state().is_tradeable()
    }
}
