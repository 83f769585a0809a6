//! Ladder reconciliation state machine.
//!
//! On every market update the controller looks at the owned book and
//! decides what the ledger must do to reach one of two steady states:
//! - no position: exactly two pending stop orders (buy-stop + sell-stop)
//! - position open: no pending orders, stop managed by the trailing policy
//!
//! Any other observation (one leg left, duplicates, more than one
//! position) is repaired by clearing and re-arming, never by erroring.
//!
//! Commands are emitted in execution order. Cancels always come before
//! creates, and the host must apply them sequentially.

use std::fmt;

use ladder_core::{
    Instrument, MarketSnapshot, OrderId, OwnerTag, PositionId, PositionSide, Price, StopSide,
};
use tracing::{debug, info, trace, warn};

use crate::config::LadderConfig;
use crate::error::EngineResult;
use crate::ledger::{OrderRequest, OwnedBook};
use crate::pricing::compute_ladder_prices;
use crate::trailing::next_stop;

/// Ladder state derived from owned position and order counts.
///
/// Never stored. Recomputed from the ledger view every cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LadderState {
    /// No position and no pending orders.
    NoPosition,
    /// No position and a single pending leg.
    OnePendingSide,
    /// No position and both legs pending.
    ArmedPair,
    /// No position and more than two pending orders.
    Overcrowded(usize),
    /// At least one position open.
    PositionOpen,
}

impl LadderState {
    /// Derive the state from an owner-scoped book.
    pub fn derive(owned: &OwnedBook) -> Self {
        if !owned.positions.is_empty() {
            return Self::PositionOpen;
        }
        match owned.orders.len() {
            0 => Self::NoPosition,
            1 => Self::OnePendingSide,
            2 => Self::ArmedPair,
            n => Self::Overcrowded(n),
        }
    }

    /// Short label for logs and metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NoPosition => "no_position",
            Self::OnePendingSide => "one_pending_side",
            Self::ArmedPair => "armed_pair",
            Self::Overcrowded(_) => "overcrowded",
            Self::PositionOpen => "position_open",
        }
    }
}

impl fmt::Display for LadderState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a pending order is being cancelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelReason {
    /// Sibling leg of a filled order.
    Oco,
    /// Clearing a partial or duplicated ladder before re-arming.
    Rearm,
    /// Controller shutdown.
    Teardown,
}

impl fmt::Display for CancelReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Oco => write!(f, "oco"),
            Self::Rearm => write!(f, "rearm"),
            Self::Teardown => write!(f, "teardown"),
        }
    }
}

/// Command for the ledger, in execution order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerCommand {
    /// Cancel a pending order.
    Cancel {
        order_id: OrderId,
        reason: CancelReason,
    },
    /// Create a pending stop order.
    Create(OrderRequest),
    /// Move the protective stop of a position.
    ModifyStop {
        position_id: PositionId,
        stop: Price,
    },
}

impl LedgerCommand {
    /// Short label for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Cancel { .. } => "cancel",
            Self::Create(_) => "create",
            Self::ModifyStop { .. } => "modify_stop",
        }
    }
}

/// OCO breakout ladder controller for one instrument and owner tag.
#[derive(Debug, Clone)]
pub struct LadderController {
    instrument: Instrument,
    config: LadderConfig,
}

impl LadderController {
    /// Create a controller after validating the configuration.
    pub fn new(instrument: Instrument, config: LadderConfig) -> EngineResult<Self> {
        config.validate()?;
        Ok(Self { instrument, config })
    }

    pub fn instrument(&self) -> &Instrument {
        &self.instrument
    }

    pub fn config(&self) -> &LadderConfig {
        &self.config
    }

    pub fn owner(&self) -> OwnerTag {
        self.config.owner_tag
    }

    /// Restrict a ledger view to this controller's owner tag and instrument.
    pub fn scope(&self, book: &OwnedBook) -> OwnedBook {
        book.scoped(self.config.owner_tag, &self.instrument.id)
    }

    /// Current ladder state as seen through `book`.
    pub fn state(&self, book: &OwnedBook) -> LadderState {
        LadderState::derive(&self.scope(book))
    }

    /// Run one reconciliation cycle.
    ///
    /// Returns the commands to apply, in order. An empty vector means the
    /// ledger already matches the target state or the quote is unusable.
    pub fn tick(&self, snapshot: &MarketSnapshot, book: &OwnedBook) -> Vec<LedgerCommand> {
        if snapshot.instrument != self.instrument.id {
            warn!(
                expected = %self.instrument.id,
                received = %snapshot.instrument,
                "Snapshot for another instrument, skipping cycle"
            );
            return Vec::new();
        }
        if !snapshot.is_available() {
            debug!(
                instrument = %self.instrument.id,
                quote_state = %snapshot.state(),
                bid = %snapshot.bid,
                ask = %snapshot.ask,
                "Snapshot unavailable, skipping cycle"
            );
            return Vec::new();
        }

        let owned = self.scope(book);
        match LadderState::derive(&owned) {
            LadderState::PositionOpen => self.manage_position(snapshot, &owned),
            LadderState::ArmedPair => {
                trace!(instrument = %self.instrument.id, "Ladder armed, nothing to do");
                Vec::new()
            }
            state => self.rearm(snapshot, &owned, state),
        }
    }

    /// Cancel every owned pending order. Positions are left alone.
    pub fn teardown(&self, book: &OwnedBook) -> Vec<LedgerCommand> {
        let owned = self.scope(book);
        info!(
            instrument = %self.instrument.id,
            owner = %self.config.owner_tag,
            pending = owned.orders.len(),
            open_positions = owned.positions.len(),
            "Ladder teardown"
        );
        cancel_all(&owned, CancelReason::Teardown)
    }

    fn manage_position(&self, snapshot: &MarketSnapshot, owned: &OwnedBook) -> Vec<LedgerCommand> {
        if owned.positions.len() > 1 {
            warn!(
                instrument = %self.instrument.id,
                positions = owned.positions.len(),
                "Invariant violation: more than one owned position open"
            );
        }

        for order in &owned.orders {
            info!(
                instrument = %self.instrument.id,
                order_id = %order.id,
                side = %order.side,
                "Position open, cancelling sibling leg"
            );
        }
        let mut commands = cancel_all(owned, CancelReason::Oco);

        if !self.config.trailing.enabled {
            return commands;
        }

        for position in &owned.positions {
            let close_price = match position.side {
                PositionSide::Long => snapshot.bid,
                PositionSide::Short => snapshot.ask,
            };
            let Some(stop) = next_stop(
                position,
                close_price,
                &self.config.trailing,
                self.instrument.tick_size,
            ) else {
                continue;
            };
            info!(
                instrument = %self.instrument.id,
                position_id = %position.id,
                side = %position.side,
                entry = %position.entry_price,
                price = %close_price,
                previous_stop = ?position.stop_loss,
                new_stop = %stop,
                "Advancing protective stop"
            );
            commands.push(LedgerCommand::ModifyStop {
                position_id: position.id,
                stop,
            });
        }

        commands
    }

    fn rearm(
        &self,
        snapshot: &MarketSnapshot,
        owned: &OwnedBook,
        state: LadderState,
    ) -> Vec<LedgerCommand> {
        if let LadderState::Overcrowded(count) = state {
            warn!(
                instrument = %self.instrument.id,
                pending = count,
                "Invariant violation: more than two owned pending orders, clearing"
            );
        }

        let mut commands = cancel_all(owned, CancelReason::Rearm);

        let prices = match compute_ladder_prices(
            snapshot,
            self.config.gap_ticks,
            self.config.take_profit_ticks,
            &self.instrument,
        ) {
            Ok(prices) => prices,
            Err(e) => {
                warn!(
                    instrument = %self.instrument.id,
                    error = %e,
                    "Cannot price ladder, leaving book empty this cycle"
                );
                return commands;
            }
        };

        info!(
            instrument = %self.instrument.id,
            state = %state,
            bid = %snapshot.bid,
            ask = %snapshot.ask,
            buy_stop = %prices.buy_stop,
            sell_stop = %prices.sell_stop,
            cancels = commands.len(),
            "Arming ladder"
        );

        commands.push(LedgerCommand::Create(self.order_request(
            StopSide::BuyStop,
            prices.buy_stop,
            prices.buy_take_profit,
        )));
        commands.push(LedgerCommand::Create(self.order_request(
            StopSide::SellStop,
            prices.sell_stop,
            prices.sell_take_profit,
        )));
        commands
    }

    fn order_request(&self, side: StopSide, trigger: Price, take_profit: Price) -> OrderRequest {
        OrderRequest {
            instrument: self.instrument.id.clone(),
            side,
            trigger_price: trigger,
            take_profit,
            lots: self.config.lots,
            owner: self.config.owner_tag,
            label: self.config.order_label(side),
        }
    }
}

fn cancel_all(owned: &OwnedBook, reason: CancelReason) -> Vec<LedgerCommand> {
    owned
        .orders
        .iter()
        .map(|order| LedgerCommand::Cancel {
            order_id: order.id,
            reason,
        })
        .collect()
}
