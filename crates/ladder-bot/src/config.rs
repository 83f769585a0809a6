//! Application configuration.

use crate::error::{AppError, AppResult};
use ladder_core::{Instrument, InstrumentId, Price};
use ladder_engine::LadderConfig;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Traded instrument specification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstrumentConfig {
    /// Instrument symbol (e.g. "EURUSD").
    #[serde(default = "default_symbol")]
    pub symbol: String,
    /// Minimum price increment.
    #[serde(default = "default_tick_size")]
    pub tick_size: Price,
    /// Decimal places of quoted prices.
    #[serde(default = "default_precision")]
    pub precision: u32,
}

impl Default for InstrumentConfig {
    fn default() -> Self {
        Self {
            symbol: default_symbol(),
            tick_size: default_tick_size(),
            precision: default_precision(),
        }
    }
}

impl InstrumentConfig {
    /// Build the validated instrument specification.
    pub fn to_instrument(&self) -> AppResult<Instrument> {
        Ok(Instrument::new(
            InstrumentId::new(self.symbol.clone()),
            self.tick_size,
            self.precision,
        )?)
    }
}

fn default_symbol() -> String {
    "EURUSD".to_string()
}

fn default_tick_size() -> Price {
    Price::new(Decimal::new(1, 4)) // 0.0001
}

fn default_precision() -> u32 {
    4
}

/// Telemetry configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// Log filter used when `RUST_LOG` is not set.
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_filter: default_log_filter(),
        }
    }
}

fn default_log_filter() -> String {
    "info,ladder=debug".to_string()
}

/// Application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub instrument: InstrumentConfig,
    #[serde(default)]
    pub ladder: LadderConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    /// Load configuration from `path` (optional) layered with environment
    /// overrides such as `LADDER__LADDER__GAP_TICKS=150`.
    pub fn load(path: &str) -> AppResult<Self> {
        let config: Self = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(
                config::Environment::with_prefix("LADDER")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .and_then(|c| c.try_deserialize())
            .map_err(|e| AppError::Config(format!("Failed to load config: {e}")))?;

        config.validate()?;
        Ok(config)
    }

    /// Parse and validate a TOML document.
    pub fn from_toml(content: &str) -> AppResult<Self> {
        let config: Self = toml::from_str(content)
            .map_err(|e| AppError::Config(format!("Failed to parse config: {e}")))?;

        config.validate()?;
        Ok(config)
    }

    /// Check instrument and ladder parameters.
    pub fn validate(&self) -> AppResult<()> {
        self.instrument.to_instrument()?;
        self.ladder.validate()?;
        Ok(())
    }
}
