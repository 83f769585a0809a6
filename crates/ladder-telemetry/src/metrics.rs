//! Prometheus metrics for the ladder bot.
//!
//! # Panics
//!
//! Metric registration uses `unwrap()`. Registration only fails on
//! duplicate metric names.

use once_cell::sync::Lazy;
use prometheus::{
    register_counter_vec, register_int_gauge_vec, CounterVec, Encoder, IntGaugeVec, TextEncoder,
};

use crate::error::TelemetryResult;

/// Reconciliation cycles by outcome.
/// Labels: instrument, outcome (skipped/ladder state)
pub static CYCLES_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "ladder_cycles_total",
        "Total reconciliation cycles by outcome",
        &["instrument", "outcome"]
    )
    .unwrap()
});

/// Ledger commands issued.
/// Labels: instrument, command (cancel/create/modify_stop)
pub static COMMANDS_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "ladder_commands_total",
        "Total ledger commands issued",
        &["instrument", "command"]
    )
    .unwrap()
});

/// Ledger commands rejected by the venue.
pub static REJECTIONS_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "ladder_rejections_total",
        "Total ledger commands rejected",
        &["instrument", "command"]
    )
    .unwrap()
});

/// Invariant violations observed in the owned book.
/// Labels: instrument, kind (excess_orders/multiple_positions/ledger_unavailable)
pub static ANOMALIES_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "ladder_anomalies_total",
        "Total anomalies observed in ledger state",
        &["instrument", "kind"]
    )
    .unwrap()
});

/// Owned pending orders at the start of the last cycle.
pub static PENDING_ORDERS: Lazy<IntGaugeVec> = Lazy::new(|| {
    register_int_gauge_vec!(
        "ladder_pending_orders",
        "Owned pending orders observed in the last cycle",
        &["instrument"]
    )
    .unwrap()
});

/// Owned open positions at the start of the last cycle.
pub static OPEN_POSITIONS: Lazy<IntGaugeVec> = Lazy::new(|| {
    register_int_gauge_vec!(
        "ladder_open_positions",
        "Owned open positions observed in the last cycle",
        &["instrument"]
    )
    .unwrap()
});

/// Metrics facade.
pub struct Metrics;

impl Metrics {
    /// Record a completed cycle.
    pub fn cycle(instrument: &str, outcome: &str) {
        CYCLES_TOTAL.with_label_values(&[instrument, outcome]).inc();
    }

    /// Record an issued command.
    pub fn command_issued(instrument: &str, command: &str) {
        COMMANDS_TOTAL.with_label_values(&[instrument, command]).inc();
    }

    /// Record a rejected command.
    pub fn command_rejected(instrument: &str, command: &str) {
        REJECTIONS_TOTAL.with_label_values(&[instrument, command]).inc();
    }

    /// Record an anomaly.
    pub fn anomaly(instrument: &str, kind: &str) {
        ANOMALIES_TOTAL.with_label_values(&[instrument, kind]).inc();
    }

    /// Record the owned book size.
    pub fn book(instrument: &str, pending_orders: usize, open_positions: usize) {
        PENDING_ORDERS
            .with_label_values(&[instrument])
            .set(i64::try_from(pending_orders).unwrap_or(i64::MAX));
        OPEN_POSITIONS
            .with_label_values(&[instrument])
            .set(i64::try_from(open_positions).unwrap_or(i64::MAX));
    }

    /// Render the default registry in Prometheus text format.
    pub fn render() -> TelemetryResult<String> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&prometheus::gather(), &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }
}
