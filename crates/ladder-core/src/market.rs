//! Instrument identification and specification types.

use crate::error::{CoreError, Result};
use crate::Price;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Instrument identifier (e.g. "EURUSD").
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InstrumentId(String);

impl InstrumentId {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self(symbol.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InstrumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for InstrumentId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Instrument specification.
///
/// Immutable for the lifetime of a session. All ladder distances are
/// expressed in multiples of `tick_size`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instrument {
    /// Instrument identifier.
    pub id: InstrumentId,
    /// Minimum price increment.
    pub tick_size: Price,
    /// Number of decimal places prices are quoted with.
    pub precision: u32,
}

impl Instrument {
    /// Create a validated instrument specification.
    pub fn new(id: InstrumentId, tick_size: Price, precision: u32) -> Result<Self> {
        if id.as_str().is_empty() {
            return Err(CoreError::InvalidInstrument("empty symbol".to_string()));
        }
        if !tick_size.is_positive() {
            return Err(CoreError::InvalidInstrument(format!(
                "{id}: tick size must be positive, got {tick_size}"
            )));
        }
        if tick_size.inner().normalize().scale() > precision {
            return Err(CoreError::InvalidInstrument(format!(
                "{id}: tick size {tick_size} is finer than precision {precision}"
            )));
        }
        Ok(Self {
            id,
            tick_size,
            precision,
        })
    }

    /// Round a price to the instrument precision.
    #[inline]
    pub fn round_price(&self, price: Price) -> Price {
        price.round_dp(self.precision)
    }
}
