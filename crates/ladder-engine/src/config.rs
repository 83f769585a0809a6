//! Ladder configuration.
//!
//! Loaded once at startup and immutable for the session. Every distance is
//! counted in instrument ticks.

use ladder_core::{OwnerTag, Size};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Break-even and trailing stop parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrailingConfig {
    /// Manage the protective stop of open positions.
    #[serde(default)]
    pub enabled: bool,

    /// Profit (ticks) at which the stop moves to the entry price.
    #[serde(default = "default_break_even_ticks")]
    pub break_even_ticks: u32,

    /// Additional profit (ticks) beyond break-even per trailing step.
    #[serde(default = "default_step_trigger_ticks")]
    pub step_trigger_ticks: u32,

    /// Distance (ticks) the stop advances per trailing step.
    #[serde(default = "default_step_size_ticks")]
    pub step_size_ticks: u32,
}

impl Default for TrailingConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            break_even_ticks: default_break_even_ticks(),
            step_trigger_ticks: default_step_trigger_ticks(),
            step_size_ticks: default_step_size_ticks(),
        }
    }
}

/// Ladder configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LadderConfig {
    /// Distance (ticks) from the quote to each stop order trigger.
    /// Buy-stop is placed above ask, sell-stop below bid.
    #[serde(default = "default_gap_ticks")]
    pub gap_ticks: u32,

    /// Distance (ticks) from trigger to take-profit.
    #[serde(default = "default_take_profit_ticks")]
    pub take_profit_ticks: u32,

    /// Fixed volume per order in lots.
    #[serde(default = "default_lots")]
    pub lots: Size,

    /// Owner tag stamped on every order this controller creates.
    #[serde(default = "default_owner_tag")]
    pub owner_tag: OwnerTag,

    /// Order label prefix, suffixed with the order side.
    #[serde(default = "default_label")]
    pub label: String,

    /// Trailing stop parameters.
    #[serde(default)]
    pub trailing: TrailingConfig,
}

impl Default for LadderConfig {
    fn default() -> Self {
        Self {
            gap_ticks: default_gap_ticks(),
            take_profit_ticks: default_take_profit_ticks(),
            lots: default_lots(),
            owner_tag: default_owner_tag(),
            label: default_label(),
            trailing: TrailingConfig::default(),
        }
    }
}

impl LadderConfig {
    /// Validate parameter ranges.
    pub fn validate(&self) -> EngineResult<()> {
        if !self.lots.is_positive() {
            return Err(EngineError::InvalidConfig(format!(
                "lots must be positive, got {}",
                self.lots
            )));
        }
        if self.label.trim().is_empty() {
            return Err(EngineError::InvalidConfig("label must not be empty".to_string()));
        }
        if self.trailing.enabled {
            if self.trailing.step_trigger_ticks == 0 {
                return Err(EngineError::InvalidConfig(
                    "trailing.step_trigger_ticks must be > 0 when trailing is enabled".to_string(),
                ));
            }
            if self.trailing.step_size_ticks == 0 {
                return Err(EngineError::InvalidConfig(
                    "trailing.step_size_ticks must be > 0 when trailing is enabled".to_string(),
                ));
            }
        }
        Ok(())
    }

    /// Label for an order on `side`, e.g. `ladder:buy-stop`.
    pub fn order_label(&self, side: ladder_core::StopSide) -> String {
        format!("{}:{side}", self.label)
    }
}

fn default_gap_ticks() -> u32 {
    400
}
fn default_take_profit_ticks() -> u32 {
    400
}
fn default_lots() -> Size {
    Size::new(Decimal::new(1, 1)) // 0.1 lot
}
fn default_owner_tag() -> OwnerTag {
    OwnerTag(1001)
}
fn default_label() -> String {
    "ladder".to_string()
}
fn default_break_even_ticks() -> u32 {
    50
}
fn default_step_trigger_ticks() -> u32 {
    50
}
fn default_step_size_ticks() -> u32 {
    50
}
