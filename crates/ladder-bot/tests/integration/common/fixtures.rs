//! Instrument, config and venue fixtures.

use chrono::Utc;
use ladder_bot::{LadderRunner, PaperEvent, PaperLedger};
use ladder_core::{
    Instrument, InstrumentId, OrderId, OwnerTag, PendingOrder, Position, PositionId,
    PositionSide, Price, Size, StopSide,
};
use ladder_engine::{LadderConfig, LadderController, Ledger, OwnedBook, TrailingConfig};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

pub const OWNER: OwnerTag = OwnerTag(1001);
pub const OTHER_OWNER: OwnerTag = OwnerTag(2002);

pub fn eurusd() -> InstrumentId {
    InstrumentId::new("EURUSD")
}

pub fn instrument() -> Instrument {
    Instrument::new(eurusd(), Price::new(dec!(0.0001)), 4).expect("valid instrument")
}

pub fn px(value: Decimal) -> Price {
    Price::new(value)
}

/// gap 400, take-profit 400, trailing 50/50/50.
pub fn ladder_config(owner: OwnerTag, trailing: bool) -> LadderConfig {
    LadderConfig {
        owner_tag: owner,
        trailing: TrailingConfig {
            enabled: trailing,
            ..Default::default()
        },
        ..Default::default()
    }
}

pub fn runner(
    venue: &PaperLedger,
    owner: OwnerTag,
    trailing: bool,
) -> LadderRunner<&PaperLedger, &PaperLedger> {
    let controller =
        LadderController::new(instrument(), ladder_config(owner, trailing)).expect("valid config");
    LadderRunner::new(controller, venue, venue)
}

/// Publish a quote on EURUSD.
pub fn quote(venue: &PaperLedger, bid: Decimal, ask: Decimal) -> Vec<PaperEvent> {
    venue.set_quote(&eurusd(), px(bid), px(ask))
}

/// The venue's view of what `owner` holds on EURUSD.
pub fn owned(venue: &PaperLedger, owner: OwnerTag) -> OwnedBook {
    venue.list_owned(&eurusd(), owner).expect("paper ledger query")
}

pub fn pending_order(id: u64, owner: OwnerTag, side: StopSide, trigger: Decimal) -> PendingOrder {
    PendingOrder {
        id: OrderId(id),
        instrument: eurusd(),
        side,
        trigger_price: px(trigger),
        take_profit: px(trigger),
        lots: Size::new(dec!(0.1)),
        owner,
        label: "manual".to_string(),
        created_at: Utc::now(),
    }
}

pub fn long_position(id: u64, owner: OwnerTag, entry: Decimal) -> Position {
    Position {
        id: PositionId(id),
        instrument: eurusd(),
        side: PositionSide::Long,
        entry_price: px(entry),
        stop_loss: None,
        take_profit: None,
        lots: Size::new(dec!(0.1)),
        owner,
        opened_at: Utc::now(),
    }
}
