//! Cycle driver.
//!
//! Bridges the pure controller and the venue collaborators. One call to
//! [`LadderRunner::on_market_update`] is one reconciliation cycle:
//! snapshot → owned book → `tick` → commands applied in order.
//!
//! Rejections are logged and counted but never retried within the cycle.
//! The next cycle re-derives the target state from the ledger.

use ladder_core::MarketSnapshot;
use ladder_engine::{
    LadderController, LadderState, Ledger, LedgerCommand, LedgerError, OwnedBook,
    SnapshotProvider,
};
use ladder_telemetry::Metrics;
use tracing::{debug, info, info_span, warn};
use uuid::Uuid;

/// Outcome of a single cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CycleReport {
    /// Ladder state observed at the start of the cycle; None when skipped.
    pub state: Option<LadderState>,
    /// Commands sent to the ledger.
    pub issued: usize,
    /// Commands the ledger refused.
    pub rejected: usize,
}

impl CycleReport {
    /// The cycle did not reach the controller.
    pub fn is_skipped(&self) -> bool {
        self.state.is_none()
    }
}

/// Runs the ladder controller against injected collaborators.
pub struct LadderRunner<S, L> {
    controller: LadderController,
    snapshots: S,
    ledger: L,
    session_id: Uuid,
}

impl<S: SnapshotProvider, L: Ledger> LadderRunner<S, L> {
    pub fn new(controller: LadderController, snapshots: S, ledger: L) -> Self {
        Self {
            controller,
            snapshots,
            ledger,
            session_id: Uuid::new_v4(),
        }
    }

    pub fn controller(&self) -> &LadderController {
        &self.controller
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    /// Run one reconciliation cycle.
    pub fn on_market_update(&self) -> CycleReport {
        let instrument = &self.controller.instrument().id;
        let _span = info_span!("cycle", session = %self.session_id, instrument = %instrument)
            .entered();

        let snapshot = self.snapshots.snapshot(instrument);
        if !snapshot.is_available() {
            debug!(quote_state = %snapshot.state(), "No usable quote, cycle skipped");
            Metrics::cycle(instrument.as_str(), "skipped");
            return CycleReport::default();
        }

        let Some(book) = self.fetch_book() else {
            Metrics::cycle(instrument.as_str(), "skipped");
            return CycleReport::default();
        };

        let report = self.reconcile(&snapshot, &book);
        if let Some(state) = report.state {
            Metrics::cycle(instrument.as_str(), state.as_str());
        }
        report
    }

    /// Cancel every owned pending order. Open positions are left alone.
    pub fn shutdown(&self) -> CycleReport {
        let instrument = &self.controller.instrument().id;
        let _span = info_span!("teardown", session = %self.session_id, instrument = %instrument)
            .entered();

        let Some(book) = self.fetch_book() else {
            return CycleReport::default();
        };
        let state = self.controller.state(&book);
        let commands = self.controller.teardown(&book);
        let rejected = self.apply(&commands);

        info!(
            cancelled = commands.len() - rejected,
            rejected,
            "Teardown complete"
        );
        CycleReport {
            state: Some(state),
            issued: commands.len(),
            rejected,
        }
    }

    fn fetch_book(&self) -> Option<OwnedBook> {
        let instrument = &self.controller.instrument().id;
        match self.ledger.list_owned(instrument, self.controller.owner()) {
            Ok(book) => Some(book),
            Err(e) => {
                warn!(error = %e, "Ledger query failed, cycle skipped");
                Metrics::anomaly(instrument.as_str(), "ledger_unavailable");
                None
            }
        }
    }

    fn reconcile(&self, snapshot: &MarketSnapshot, book: &OwnedBook) -> CycleReport {
        let symbol = self.controller.instrument().id.as_str();
        let owned = self.controller.scope(book);
        Metrics::book(symbol, owned.orders.len(), owned.positions.len());
        if owned.orders.len() > 2 {
            Metrics::anomaly(symbol, "excess_orders");
        }
        if owned.positions.len() > 1 {
            Metrics::anomaly(symbol, "multiple_positions");
        }

        let state = LadderState::derive(&owned);
        let commands = self.controller.tick(snapshot, &owned);
        let rejected = self.apply(&commands);

        CycleReport {
            state: Some(state),
            issued: commands.len(),
            rejected,
        }
    }

    /// Apply commands sequentially. Returns the number rejected.
    fn apply(&self, commands: &[LedgerCommand]) -> usize {
        let symbol = self.controller.instrument().id.as_str();
        let mut rejected = 0;

        for command in commands {
            Metrics::command_issued(symbol, command.kind());
            let result = match command {
                LedgerCommand::Cancel { order_id, reason } => {
                    match self.ledger.cancel_pending_order(*order_id) {
                        Err(LedgerError::NotFound(_)) => {
                            debug!(order_id = %order_id, %reason, "Order already gone");
                            Ok(())
                        }
                        other => other,
                    }
                }
                LedgerCommand::Create(request) => self
                    .ledger
                    .create_pending_order(request)
                    .map(|order_id| {
                        info!(
                            order_id = %order_id,
                            side = %request.side,
                            trigger = %request.trigger_price,
                            take_profit = %request.take_profit,
                            lots = %request.lots,
                            "Pending order placed"
                        );
                    }),
                LedgerCommand::ModifyStop { position_id, stop } => {
                    self.ledger.modify_stop_loss(*position_id, *stop)
                }
            };

            if let Err(e) = result {
                rejected += 1;
                Metrics::command_rejected(symbol, command.kind());
                warn!(
                    command = command.kind(),
                    error = %e,
                    "Ledger command rejected, next cycle will reconcile"
                );
            }
        }

        rejected
    }
}
