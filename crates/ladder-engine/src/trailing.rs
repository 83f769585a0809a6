//! Break-even and trailing stop policy.
//!
//! Pure ratchet over an open position:
//! 1. Profit below `break_even_ticks`: no stop change.
//! 2. At `break_even_ticks`: stop moves to the entry price.
//! 3. Every further `step_trigger_ticks` of profit: stop advances by
//!    `step_size_ticks`.
//!
//! The stop only ever moves in the direction that locks in more profit,
//! always stays at least one tick away from the current price and always
//! lies on the tick grid (floored for longs, ceiled for shorts).

use ladder_core::{Position, PositionSide, Price};

use crate::config::TrailingConfig;

/// Compute the next protective stop for `position`.
///
/// `current_price` is the price the position would close at (bid for a
/// long, ask for a short).
///
/// Returns `None` when the stop should stay where it is: profit below the
/// break-even trigger, or the candidate is not strictly better than the
/// existing stop.
pub fn next_stop(
    position: &Position,
    current_price: Price,
    params: &TrailingConfig,
    tick_size: Price,
) -> Option<Price> {
    if !current_price.is_positive() {
        return None;
    }

    let profit = position.profit_ticks(current_price, tick_size)?;
    let break_even = i64::from(params.break_even_ticks);
    if profit < break_even {
        return None;
    }

    let steps = match params.step_trigger_ticks {
        0 => 0,
        trigger => (profit - break_even) / i64::from(trigger),
    };
    let sign = position.side.sign();
    let advance = steps.saturating_mul(i64::from(params.step_size_ticks));
    let candidate = position
        .entry_price
        .offset_ticks(sign.saturating_mul(advance), tick_size)?;

    // Never closer than one tick to the market
    let limit = current_price.offset_ticks(-sign, tick_size)?;

    // Snap to the tick grid away from the market
    let candidate = match position.side {
        PositionSide::Long => candidate.min(limit).floor_to_tick(tick_size)?,
        PositionSide::Short => candidate.max(limit).ceil_to_tick(tick_size)?,
    };

    let improves = match (position.side, position.stop_loss) {
        (_, None) => true,
        (PositionSide::Long, Some(stop)) => candidate > stop,
        (PositionSide::Short, Some(stop)) => candidate < stop,
    };

    improves.then_some(candidate)
}
