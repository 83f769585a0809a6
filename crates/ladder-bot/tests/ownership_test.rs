//! Ownership and recovery integration tests.
//!
//! Two controllers share one paper venue:
//! - Each arms and manages only its own orders
//! - Teardown of one leaves the other's book intact
//! - Rejected creations heal on the next cycle

mod integration;
use integration::common::fixtures::{
    long_position, owned, pending_order, quote, runner, OTHER_OWNER, OWNER,
};

use ladder_bot::PaperLedger;
use ladder_core::StopSide;
use ladder_engine::LadderState;
use rust_decimal_macros::dec;

#[test]
fn test_controllers_sharing_venue_stay_isolated() {
    let venue = PaperLedger::new();
    let first = runner(&venue, OWNER, false);
    let second = runner(&venue, OTHER_OWNER, false);

    quote(&venue, dec!(1.1998), dec!(1.2000));
    assert_eq!(first.on_market_update().issued, 2);
    assert_eq!(second.on_market_update().issued, 2);
    assert_eq!(venue.pending_orders().len(), 4);

    // Each sees only its own pair as armed
    assert_eq!(first.on_market_update().state, Some(LadderState::ArmedPair));
    assert_eq!(second.on_market_update().state, Some(LadderState::ArmedPair));

    // Both buy-stops fill; each controller cancels only its own sell leg
    quote(&venue, dec!(1.2399), dec!(1.2400));
    assert_eq!(venue.positions().len(), 2);

    first.on_market_update();
    assert!(owned(&venue, OWNER).orders.is_empty());
    assert_eq!(owned(&venue, OTHER_OWNER).orders.len(), 1);

    second.on_market_update();
    assert!(venue.pending_orders().is_empty());
    assert_eq!(venue.positions().len(), 2);
}

#[test]
fn test_foreign_orders_and_positions_ignored() {
    let venue = PaperLedger::new();
    venue.insert_order(pending_order(90, OTHER_OWNER, StopSide::BuyStop, dec!(1.2100)));
    venue.insert_order(pending_order(91, OTHER_OWNER, StopSide::SellStop, dec!(1.1900)));
    venue.insert_order(pending_order(92, OTHER_OWNER, StopSide::SellStop, dec!(1.1800)));
    venue.insert_position(long_position(93, OTHER_OWNER, dec!(1.1900)));
    let runner = runner(&venue, OWNER, true);

    quote(&venue, dec!(1.1998), dec!(1.2000));
    let report = runner.on_market_update();
    assert_eq!(report.state, Some(LadderState::NoPosition));
    assert_eq!(report.issued, 2);

    let foreign = owned(&venue, OTHER_OWNER);
    assert_eq!(foreign.orders.len(), 3);
    assert_eq!(foreign.positions.len(), 1);
    assert_eq!(foreign.positions[0].stop_loss, None);

    runner.shutdown();
    assert!(owned(&venue, OWNER).orders.is_empty());
    assert_eq!(owned(&venue, OTHER_OWNER).orders.len(), 3);
}

#[test]
fn test_rejected_create_heals_next_cycle() {
    let venue = PaperLedger::new();
    let runner = runner(&venue, OWNER, false);
    quote(&venue, dec!(1.1998), dec!(1.2000));

    venue.reject_next_creates(1);
    let report = runner.on_market_update();
    assert_eq!(report.issued, 2);
    assert_eq!(report.rejected, 1);
    assert_eq!(owned(&venue, OWNER).orders.len(), 1);

    let report = runner.on_market_update();
    assert_eq!(report.state, Some(LadderState::OnePendingSide));
    assert_eq!(report.issued, 3);
    assert_eq!(report.rejected, 0);

    let book = owned(&venue, OWNER);
    assert_eq!(book.orders.len(), 2);
    assert!(book.orders.iter().any(|o| o.side == StopSide::BuyStop));
    assert!(book.orders.iter().any(|o| o.side == StopSide::SellStop));
}

#[test]
fn test_total_rejection_leaves_empty_book() {
    let venue = PaperLedger::new();
    let runner = runner(&venue, OWNER, false);
    quote(&venue, dec!(1.1998), dec!(1.2000));

    venue.reject_next_creates(2);
    let report = runner.on_market_update();
    assert_eq!(report.rejected, 2);
    assert!(owned(&venue, OWNER).orders.is_empty());

    let report = runner.on_market_update();
    assert_eq!(report.state, Some(LadderState::NoPosition));
    assert_eq!(report.rejected, 0);
    assert_eq!(owned(&venue, OWNER).orders.len(), 2);
}
