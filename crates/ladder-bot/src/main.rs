//! OCO Breakout Ladder Bot - Entry Point
//!
//! Runs the ladder against the in-memory paper venue. Quotes are read from
//! stdin, one JSON object per line: `{"bid": "1.1998", "ask": "1.2000"}`.
//! Each quote drives one reconciliation cycle. On EOF or Ctrl-C all owned
//! pending orders are cancelled before exit.

use anyhow::Result;
use clap::Parser;
use ladder_bot::{AppConfig, LadderRunner, PaperEvent, PaperLedger, PaperQuote};
use ladder_engine::LadderController;
use ladder_telemetry::Metrics;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info, warn};

/// OCO Breakout Ladder Bot
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Configuration file path (can also be set via LADDER_CONFIG env var)
    #[arg(short, long)]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Determine config path: CLI arg > LADDER_CONFIG env var > default
    let config_path = args
        .config
        .or_else(|| std::env::var("LADDER_CONFIG").ok())
        .unwrap_or_else(|| "config/default.toml".to_string());

    let config = AppConfig::load(&config_path)?;
    ladder_telemetry::init_logging(&config.telemetry.log_filter)?;

    info!("Starting ladder bot v{}", env!("CARGO_PKG_VERSION"));
    info!(
        config_path = %config_path,
        symbol = %config.instrument.symbol,
        gap_ticks = config.ladder.gap_ticks,
        take_profit_ticks = config.ladder.take_profit_ticks,
        owner = %config.ladder.owner_tag,
        trailing = config.ladder.trailing.enabled,
        "Configuration loaded"
    );

    let instrument = config.instrument.to_instrument()?;
    let controller = LadderController::new(instrument.clone(), config.ladder.clone())?;
    let venue = PaperLedger::new();
    let runner = LadderRunner::new(controller, &venue, &venue);
    info!(session = %runner.session_id(), "Paper session started");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    info!("Quote stream closed");
                    break;
                };
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                let quote: PaperQuote = match serde_json::from_str(line) {
                    Ok(quote) => quote,
                    Err(e) => {
                        warn!(error = %e, line, "Malformed quote ignored");
                        continue;
                    }
                };

                for event in venue.set_quote(&instrument.id, quote.bid, quote.ask) {
                    match event {
                        PaperEvent::Filled { position_id, side, price, .. } => {
                            info!(position_id = %position_id, %side, %price, "Position opened");
                        }
                        PaperEvent::Closed { position_id, reason, price } => {
                            info!(position_id = %position_id, ?reason, %price, "Position closed");
                        }
                    }
                }

                let report = runner.on_market_update();
                debug!(
                    state = ?report.state,
                    issued = report.issued,
                    rejected = report.rejected,
                    "Cycle complete"
                );
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Shutdown signal received");
                break;
            }
        }
    }

    let report = runner.shutdown();
    info!(
        state = ?report.state,
        issued = report.issued,
        rejected = report.rejected,
        "Shutdown complete"
    );
    debug!(metrics = %Metrics::render()?, "Final metrics");

    Ok(())
}
