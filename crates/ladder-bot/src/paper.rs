//! In-memory paper venue.
//!
//! Implements both collaborator traits so the runner can be driven without
//! a live venue. Fill model:
//! - buy-stop fills at ask once ask >= trigger, sell-stop at bid once
//!   bid <= trigger
//! - a long closes at bid on take-profit (bid >= tp) or stop (bid <= stop),
//!   a short at ask on take-profit (ask <= tp) or stop (ask >= stop)
//!
//! Exits are evaluated before fills, so a freshly opened position is first
//! checked against the next quote.

use std::collections::HashMap;

use chrono::Utc;
use ladder_core::{
    InstrumentId, MarketSnapshot, OrderId, OwnerTag, PendingOrder, Position, PositionId,
    PositionSide, Price, StopSide,
};
use ladder_engine::{Ledger, LedgerError, LedgerResult, OrderRequest, OwnedBook, SnapshotProvider};
use parking_lot::Mutex;
use serde::Deserialize;
use tracing::debug;

/// One line of the quote stream fed to the paper venue.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PaperQuote {
    pub bid: Price,
    pub ask: Price,
}

/// Why a paper position was closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseReason {
    TakeProfit,
    StopLoss,
}

/// Venue-side events produced by a quote update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaperEvent {
    Filled {
        order_id: OrderId,
        position_id: PositionId,
        side: PositionSide,
        price: Price,
    },
    Closed {
        position_id: PositionId,
        reason: CloseReason,
        price: Price,
    },
}

#[derive(Debug, Default)]
struct PaperState {
    quotes: HashMap<InstrumentId, (Price, Price)>,
    orders: Vec<PendingOrder>,
    positions: Vec<Position>,
    next_id: u64,
    reject_creates: usize,
}

impl PaperState {
    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

/// In-memory order and position ledger with a last-quote cache.
#[derive(Debug, Default)]
pub struct PaperLedger {
    state: Mutex<PaperState>,
}

impl PaperLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish a quote and run the fill model against it.
    pub fn set_quote(&self, instrument: &InstrumentId, bid: Price, ask: Price) -> Vec<PaperEvent> {
        let mut state = self.state.lock();
        state.quotes.insert(instrument.clone(), (bid, ask));

        if !bid.is_positive() || !ask.is_positive() {
            return Vec::new();
        }

        let mut events = Vec::new();

        let mut kept = Vec::with_capacity(state.positions.len());
        for position in std::mem::take(&mut state.positions) {
            match exit_for(&position, instrument, bid, ask) {
                Some((reason, price)) => events.push(PaperEvent::Closed {
                    position_id: position.id,
                    reason,
                    price,
                }),
                None => kept.push(position),
            }
        }
        state.positions = kept;

        let mut resting = Vec::with_capacity(state.orders.len());
        for order in std::mem::take(&mut state.orders) {
            let fill = if &order.instrument != instrument {
                None
            } else {
                match order.side {
                    StopSide::BuyStop if ask >= order.trigger_price => Some(ask),
                    StopSide::SellStop if bid <= order.trigger_price => Some(bid),
                    _ => None,
                }
            };
            let Some(price) = fill else {
                resting.push(order);
                continue;
            };

            let position_id = PositionId(state.next_id());
            let side = order.side.position_side();
            state.positions.push(Position {
                id: position_id,
                instrument: order.instrument.clone(),
                side,
                entry_price: price,
                stop_loss: None,
                take_profit: Some(order.take_profit),
                lots: order.lots,
                owner: order.owner,
                opened_at: Utc::now(),
            });
            events.push(PaperEvent::Filled {
                order_id: order.id,
                position_id,
                side,
                price,
            });
        }
        state.orders = resting;

        for event in &events {
            debug!(instrument = %instrument, ?event, "Paper venue event");
        }
        events
    }

    /// Seed a pending order, e.g. one owned by another controller.
    pub fn insert_order(&self, order: PendingOrder) {
        let mut state = self.state.lock();
        state.next_id = state.next_id.max(order.id.0);
        state.orders.push(order);
    }

    /// Seed an open position.
    pub fn insert_position(&self, position: Position) {
        let mut state = self.state.lock();
        state.next_id = state.next_id.max(position.id.0);
        state.positions.push(position);
    }

    /// Reject the next `count` order creations.
    pub fn reject_next_creates(&self, count: usize) {
        self.state.lock().reject_creates = count;
    }

    /// All pending orders, regardless of owner.
    pub fn pending_orders(&self) -> Vec<PendingOrder> {
        self.state.lock().orders.clone()
    }

    /// All open positions, regardless of owner.
    pub fn positions(&self) -> Vec<Position> {
        self.state.lock().positions.clone()
    }
}

fn exit_for(
    position: &Position,
    instrument: &InstrumentId,
    bid: Price,
    ask: Price,
) -> Option<(CloseReason, Price)> {
    if &position.instrument != instrument {
        return None;
    }
    match position.side {
        PositionSide::Long => {
            if position.stop_loss.is_some_and(|stop| bid <= stop) {
                Some((CloseReason::StopLoss, bid))
            } else if position.take_profit.is_some_and(|tp| bid >= tp) {
                Some((CloseReason::TakeProfit, bid))
            } else {
                None
            }
        }
        PositionSide::Short => {
            if position.stop_loss.is_some_and(|stop| ask >= stop) {
                Some((CloseReason::StopLoss, ask))
            } else if position.take_profit.is_some_and(|tp| ask <= tp) {
                Some((CloseReason::TakeProfit, ask))
            } else {
                None
            }
        }
    }
}

impl SnapshotProvider for PaperLedger {
    fn snapshot(&self, instrument: &InstrumentId) -> MarketSnapshot {
        match self.state.lock().quotes.get(instrument) {
            Some(&(bid, ask)) => MarketSnapshot::new(instrument.clone(), bid, ask),
            None => MarketSnapshot::unavailable(instrument.clone()),
        }
    }
}

impl Ledger for PaperLedger {
    fn list_owned(&self, instrument: &InstrumentId, owner: OwnerTag) -> LedgerResult<OwnedBook> {
        let state = self.state.lock();
        Ok(OwnedBook::new(state.positions.clone(), state.orders.clone()).scoped(owner, instrument))
    }

    fn create_pending_order(&self, request: &OrderRequest) -> LedgerResult<OrderId> {
        let mut state = self.state.lock();
        if state.reject_creates > 0 {
            state.reject_creates -= 1;
            return Err(LedgerError::Rejected("scripted rejection".to_string()));
        }

        // Stop orders must rest on the far side of the market
        if let Some(&(bid, ask)) = state.quotes.get(&request.instrument) {
            let valid = match request.side {
                StopSide::BuyStop => request.trigger_price > ask,
                StopSide::SellStop => request.trigger_price < bid,
            };
            if !valid {
                return Err(LedgerError::Rejected(format!(
                    "invalid stop: {} at {} with bid={bid} ask={ask}",
                    request.side, request.trigger_price
                )));
            }
        }

        let id = OrderId(state.next_id());
        state.orders.push(PendingOrder {
            id,
            instrument: request.instrument.clone(),
            side: request.side,
            trigger_price: request.trigger_price,
            take_profit: request.take_profit,
            lots: request.lots,
            owner: request.owner,
            label: request.label.clone(),
            created_at: Utc::now(),
        });
        Ok(id)
    }

    fn cancel_pending_order(&self, order_id: OrderId) -> LedgerResult<()> {
        self.state.lock().orders.retain(|o| o.id != order_id);
        Ok(())
    }

    fn modify_stop_loss(&self, position_id: PositionId, stop: Price) -> LedgerResult<()> {
        let mut guard = self.state.lock();
        let state = &mut *guard;
        let Some(position) = state.positions.iter_mut().find(|p| p.id == position_id) else {
            return Err(LedgerError::NotFound(format!("position {position_id}")));
        };
        let (bid, ask) = state
            .quotes
            .get(&position.instrument)
            .copied()
            .unwrap_or((Price::ZERO, Price::ZERO));

        let valid = match position.side {
            PositionSide::Long => stop < bid,
            PositionSide::Short => stop > ask,
        };
        if !valid {
            return Err(LedgerError::Rejected(format!(
                "invalid stop {stop} for {} position with bid={bid} ask={ask}",
                position.side
            )));
        }
        position.stop_loss = Some(stop);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ladder_core::Size;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn eurusd() -> InstrumentId {
        "EURUSD".into()
    }

    fn px(value: Decimal) -> Price {
        Price::new(value)
    }

    fn request(side: StopSide, trigger: Decimal, take_profit: Decimal) -> OrderRequest {
        OrderRequest {
            instrument: eurusd(),
            side,
            trigger_price: px(trigger),
            take_profit: px(take_profit),
            lots: Size::new(dec!(0.1)),
            owner: OwnerTag(1),
            label: "ladder".to_string(),
        }
    }

    #[test]
    fn test_snapshot_unavailable_without_quote() {
        let venue = PaperLedger::new();
        assert!(!venue.snapshot(&eurusd()).is_available());

        venue.set_quote(&eurusd(), px(dec!(1.1998)), px(dec!(1.2000)));
        let snap = venue.snapshot(&eurusd());
        assert_eq!(snap.bid, px(dec!(1.1998)));
        assert_eq!(snap.ask, px(dec!(1.2000)));
    }

    #[test]
    fn test_buy_stop_fills_at_ask() {
        let venue = PaperLedger::new();
        venue.set_quote(&eurusd(), px(dec!(1.1998)), px(dec!(1.2000)));
        let id = venue
            .create_pending_order(&request(StopSide::BuyStop, dec!(1.2010), dec!(1.2050)))
            .unwrap();

        assert!(venue
            .set_quote(&eurusd(), px(dec!(1.2007)), px(dec!(1.2009)))
            .is_empty());

        let events = venue.set_quote(&eurusd(), px(dec!(1.2010)), px(dec!(1.2012)));
        assert_eq!(events.len(), 1);
        assert!(matches!(
            events[0],
            PaperEvent::Filled { order_id, side: PositionSide::Long, price, .. }
                if order_id == id && price == px(dec!(1.2012))
        ));
        assert!(venue.pending_orders().is_empty());
        assert_eq!(venue.positions()[0].take_profit, Some(px(dec!(1.2050))));
    }

    #[test]
    fn test_long_closes_on_take_profit_and_stop() {
        let venue = PaperLedger::new();
        venue.set_quote(&eurusd(), px(dec!(1.1998)), px(dec!(1.2000)));
        venue
            .create_pending_order(&request(StopSide::BuyStop, dec!(1.2010), dec!(1.2050)))
            .unwrap();
        venue.set_quote(&eurusd(), px(dec!(1.2010)), px(dec!(1.2012)));
        let position_id = venue.positions()[0].id;

        venue.modify_stop_loss(position_id, px(dec!(1.2005))).unwrap();
        let events = venue.set_quote(&eurusd(), px(dec!(1.2004)), px(dec!(1.2006)));
        assert_eq!(
            events,
            vec![PaperEvent::Closed {
                position_id,
                reason: CloseReason::StopLoss,
                price: px(dec!(1.2004)),
            }]
        );
        assert!(venue.positions().is_empty());
    }

    #[test]
    fn test_short_closes_on_take_profit() {
        let venue = PaperLedger::new();
        venue.set_quote(&eurusd(), px(dec!(1.1998)), px(dec!(1.2000)));
        venue
            .create_pending_order(&request(StopSide::SellStop, dec!(1.1990), dec!(1.1950)))
            .unwrap();
        venue.set_quote(&eurusd(), px(dec!(1.1989)), px(dec!(1.1991)));
        assert_eq!(venue.positions()[0].side, PositionSide::Short);

        let events = venue.set_quote(&eurusd(), px(dec!(1.1948)), px(dec!(1.1950)));
        assert!(matches!(
            events[0],
            PaperEvent::Closed { reason: CloseReason::TakeProfit, .. }
        ));
    }

    #[test]
    fn test_create_rejects_stop_on_wrong_side() {
        let venue = PaperLedger::new();
        venue.set_quote(&eurusd(), px(dec!(1.1998)), px(dec!(1.2000)));

        let err = venue
            .create_pending_order(&request(StopSide::BuyStop, dec!(1.2000), dec!(1.2050)))
            .unwrap_err();
        assert!(matches!(err, LedgerError::Rejected(_)));
    }

    #[test]
    fn test_scripted_rejections() {
        let venue = PaperLedger::new();
        venue.reject_next_creates(1);

        let req = request(StopSide::BuyStop, dec!(1.2010), dec!(1.2050));
        assert!(venue.create_pending_order(&req).is_err());
        assert!(venue.create_pending_order(&req).is_ok());
    }

    #[test]
    fn test_cancel_absent_order_succeeds() {
        let venue = PaperLedger::new();
        assert!(venue.cancel_pending_order(OrderId(404)).is_ok());
    }

    #[test]
    fn test_modify_unknown_position_not_found() {
        let venue = PaperLedger::new();
        let err = venue
            .modify_stop_loss(PositionId(404), px(dec!(1.2)))
            .unwrap_err();
        assert!(matches!(err, LedgerError::NotFound(_)));
    }

    #[test]
    fn test_list_owned_scopes_by_owner() {
        let venue = PaperLedger::new();
        venue
            .create_pending_order(&request(StopSide::BuyStop, dec!(1.2010), dec!(1.2050)))
            .unwrap();
        let mut foreign = request(StopSide::SellStop, dec!(1.1990), dec!(1.1950));
        foreign.owner = OwnerTag(2);
        venue.create_pending_order(&foreign).unwrap();

        let book = venue.list_owned(&eurusd(), OwnerTag(1)).unwrap();
        assert_eq!(book.orders.len(), 1);
        assert_eq!(book.orders[0].owner, OwnerTag(1));
    }

    #[test]
    fn test_quote_line_parsing() {
        let quote: PaperQuote =
            serde_json::from_str(r#"{"bid": "1.1998", "ask": "1.2000"}"#).unwrap();
        assert_eq!(quote.bid, px(dec!(1.1998)));
        assert_eq!(quote.ask, px(dec!(1.2000)));
    }
}
