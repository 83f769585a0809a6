//! Ladder price calculation.
//!
//! Computes the breakout trigger and take-profit levels on both sides of
//! the current quote:
//! - buy-stop `gap` ticks above ask, take-profit `tp` ticks above that
//! - sell-stop `gap` ticks below bid, take-profit `tp` ticks below that
//!
//! No stop-loss is attached at creation. The protective stop is applied
//! after the fill by the trailing policy.

use ladder_core::{Instrument, MarketSnapshot, Price};

use crate::error::{EngineError, EngineResult};

/// Trigger and take-profit prices for both ladder legs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LadderPrices {
    pub buy_stop: Price,
    pub buy_take_profit: Price,
    pub sell_stop: Price,
    pub sell_take_profit: Price,
}

/// Calculate ladder prices around `snapshot`.
///
/// # Arguments
/// * `snapshot` - Current quote; must be available
/// * `gap_ticks` - Distance from the quote to each trigger
/// * `take_profit_ticks` - Distance from each trigger to its take-profit
/// * `instrument` - Tick size and precision used for offsets and rounding
///
/// Triggers are strictly outside the quote: a buy-stop that does not
/// round above ask is clamped to `ask + 1 tick`, a sell-stop that does not
/// round below bid is clamped to `bid - 1 tick`.
///
/// # Errors
/// `InvalidLadder` when the sell leg would not be strictly positive or an
/// offset overflows the decimal range.
pub fn compute_ladder_prices(
    snapshot: &MarketSnapshot,
    gap_ticks: u32,
    take_profit_ticks: u32,
    instrument: &Instrument,
) -> EngineResult<LadderPrices> {
    let tick = instrument.tick_size;
    let gap = i64::from(gap_ticks);
    let tp = i64::from(take_profit_ticks);
    let offset = |price: Price, ticks: i64| {
        price
            .offset_ticks(ticks, tick)
            .map(|p| instrument.round_price(p))
            .ok_or_else(|| {
                EngineError::InvalidLadder(format!(
                    "price {price} offset by {ticks} ticks overflows"
                ))
            })
    };

    let mut buy_stop = offset(snapshot.ask, gap)?;
    if buy_stop <= snapshot.ask {
        buy_stop = offset(snapshot.ask, 1)?;
    }

    let mut sell_stop = offset(snapshot.bid, -gap)?;
    if sell_stop >= snapshot.bid {
        sell_stop = offset(snapshot.bid, -1)?;
    }

    // Near the top of the decimal range the clamp can round back onto the quote
    if buy_stop <= snapshot.ask || sell_stop >= snapshot.bid {
        return Err(EngineError::InvalidLadder(format!(
            "triggers not outside quote: bid={} ask={} buy_stop={buy_stop} sell_stop={sell_stop}",
            snapshot.bid, snapshot.ask
        )));
    }

    let buy_take_profit = offset(buy_stop, tp)?;
    let sell_take_profit = offset(sell_stop, -tp)?;

    if !sell_stop.is_positive() || !sell_take_profit.is_positive() {
        return Err(EngineError::InvalidLadder(format!(
            "sell leg below zero: bid={} sell_stop={sell_stop} sell_take_profit={sell_take_profit}",
            snapshot.bid
        )));
    }

    Ok(LadderPrices {
        buy_stop,
        buy_take_profit,
        sell_stop,
        sell_take_profit,
    })
}
