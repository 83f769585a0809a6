//! Precision-safe decimal types for trading.
//!
//! Uses `rust_decimal` for exact decimal arithmetic so that tick offsets
//! such as `ask + 400 * 0.0001` land exactly on the venue grid.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};
use std::str::FromStr;

/// Price with exact decimal precision.
///
/// Wraps `Decimal` to provide type safety and prevent mixing
/// prices with lot sizes in calculations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(pub Decimal);

impl Price {
    pub const ZERO: Self = Self(Decimal::ZERO);

    #[inline]
    pub fn new(value: Decimal) -> Self {
        Self(value)
    }

    #[inline]
    pub fn inner(&self) -> Decimal {
        self.0
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    #[inline]
    pub fn is_positive(&self) -> bool {
        self.0.is_sign_positive() && !self.0.is_zero()
    }

    /// Round to `precision` decimal places, half away from zero.
    ///
    /// Matches the venue convention where 1.23455 at 4 places is 1.2346
    /// and -1.23455 is -1.2346.
    #[inline]
    pub fn round_dp(&self, precision: u32) -> Self {
        Self(
            self.0
                .round_dp_with_strategy(precision, RoundingStrategy::MidpointAwayFromZero),
        )
    }

    /// Shift this price by a signed number of ticks.
    ///
    /// Returns None when the result overflows `Decimal`.
    #[inline]
    pub fn offset_ticks(&self, ticks: i64, tick_size: Price) -> Option<Self> {
        Decimal::from(ticks)
            .checked_mul(tick_size.0)
            .and_then(|offset| self.0.checked_add(offset))
            .map(Self)
    }

    /// Whole ticks from `other` to `self`, floored.
    ///
    /// Returns None for a zero tick size or on overflow.
    #[inline]
    pub fn ticks_from(&self, other: Price, tick_size: Price) -> Option<i64> {
        self.0
            .checked_sub(other.0)?
            .checked_div(tick_size.0)?
            .floor()
            .to_i64()
    }

    /// Largest multiple of `tick_size` at or below this price.
    #[inline]
    pub fn floor_to_tick(&self, tick_size: Price) -> Option<Self> {
        self.0
            .checked_div(tick_size.0)?
            .floor()
            .checked_mul(tick_size.0)
            .map(Self)
    }

    /// Smallest multiple of `tick_size` at or above this price.
    #[inline]
    pub fn ceil_to_tick(&self, tick_size: Price) -> Option<Self> {
        self.0
            .checked_div(tick_size.0)?
            .ceil()
            .checked_mul(tick_size.0)
            .map(Self)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Price {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.parse()?))
    }
}

impl From<Decimal> for Price {
    fn from(d: Decimal) -> Self {
        Self(d)
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Price {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

/// Order volume in lots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Size(pub Decimal);

impl Size {
    pub const ZERO: Self = Self(Decimal::ZERO);

    #[inline]
    pub fn new(value: Decimal) -> Self {
        Self(value)
    }

    #[inline]
    pub fn inner(&self) -> Decimal {
        self.0
    }

    #[inline]
    pub fn is_positive(&self) -> bool {
        self.0.is_sign_positive() && !self.0.is_zero()
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Size {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.parse()?))
    }
}

impl From<Decimal> for Size {
    fn from(d: Decimal) -> Self {
        Self(d)
    }
}
