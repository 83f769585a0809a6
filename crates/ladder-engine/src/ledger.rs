//! Collaborator interfaces consumed by the ladder.
//!
//! The venue session is injected through these traits rather than reached
//! through a global, so hosts can plug in a live venue, a paper ledger, or
//! a scripted test double.

use ladder_core::{
    InstrumentId, MarketSnapshot, OrderId, OwnerTag, PendingOrder, Position, PositionId, Price,
    Size, StopSide,
};
use thiserror::Error;

/// Ledger-side failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// The venue refused the command.
    #[error("Command rejected: {0}")]
    Rejected(String),

    /// The referenced order or position no longer exists.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The ledger could not be reached or queried.
    #[error("Ledger unavailable: {0}")]
    Unavailable(String),
}

pub type LedgerResult<T> = Result<T, LedgerError>;

/// Owned positions and pending orders for one instrument.
///
/// This is the per-cycle ledger view. It is never cached between cycles.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OwnedBook {
    pub positions: Vec<Position>,
    pub orders: Vec<PendingOrder>,
}

impl OwnedBook {
    pub fn new(positions: Vec<Position>, orders: Vec<PendingOrder>) -> Self {
        Self { positions, orders }
    }

    /// Restrict the view to entries tagged `owner` on `instrument`.
    pub fn scoped(&self, owner: OwnerTag, instrument: &InstrumentId) -> Self {
        Self {
            positions: self
                .positions
                .iter()
                .filter(|p| p.is_owned_by(owner, instrument))
                .cloned()
                .collect(),
            orders: self
                .orders
                .iter()
                .filter(|o| o.is_owned_by(owner, instrument))
                .cloned()
                .collect(),
        }
    }
}

/// Arguments of a pending order creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderRequest {
    pub instrument: InstrumentId,
    pub side: StopSide,
    pub trigger_price: Price,
    pub take_profit: Price,
    pub lots: Size,
    pub owner: OwnerTag,
    pub label: String,
}

/// Source of point-in-time quotes.
pub trait SnapshotProvider {
    /// Current quote for `instrument`.
    ///
    /// Returns [`MarketSnapshot::unavailable`] instead of failing when no
    /// quote exists.
    fn snapshot(&self, instrument: &InstrumentId) -> MarketSnapshot;
}

/// Order and position ledger of the venue.
///
/// Implementations must apply commands atomically with respect to
/// `list_owned` for a given owner tag.
pub trait Ledger {
    /// Positions and pending orders tagged `owner` on `instrument`.
    fn list_owned(&self, instrument: &InstrumentId, owner: OwnerTag) -> LedgerResult<OwnedBook>;

    /// Submit a pending stop order.
    fn create_pending_order(&self, request: &OrderRequest) -> LedgerResult<OrderId>;

    /// Cancel a pending order. Must succeed when the order is already gone.
    fn cancel_pending_order(&self, order_id: OrderId) -> LedgerResult<()>;

    /// Move the protective stop of an open position.
    fn modify_stop_loss(&self, position_id: PositionId, stop: Price) -> LedgerResult<()>;
}

impl<T: SnapshotProvider + ?Sized> SnapshotProvider for &T {
    fn snapshot(&self, instrument: &InstrumentId) -> MarketSnapshot {
        (**self).snapshot(instrument)
    }
}

impl<T: Ledger + ?Sized> Ledger for &T {
    fn list_owned(&self, instrument: &InstrumentId, owner: OwnerTag) -> LedgerResult<OwnedBook> {
        (**self).list_owned(instrument, owner)
    }

    fn create_pending_order(&self, request: &OrderRequest) -> LedgerResult<OrderId> {
        (**self).create_pending_order(request)
    }

    fn cancel_pending_order(&self, order_id: OrderId) -> LedgerResult<()> {
        (**self).cancel_pending_order(order_id)
    }

    fn modify_stop_loss(&self, position_id: PositionId, stop: Price) -> LedgerResult<()> {
        (**self).modify_stop_loss(position_id, stop)
    }
}
