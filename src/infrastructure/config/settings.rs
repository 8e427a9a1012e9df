//! Application configuration loading and validation.
//!
//! Provides the main [`Config`] struct that aggregates all service settings.
//! Configuration is loaded from a TOML file; the store URL and bind address
//! can be overridden from the environment (`SPREADWATCH_STORE_URL`,
//! `SPREADWATCH_BIND`), including values loaded from `.env`.
//!
//! # Example
//!
//! ```no_run
//! use spreadwatch::infrastructure::config::Config;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load("config.toml")?;
//!     config.init_logging();
//!     Ok(())
//! }
//! ```

use std::net::SocketAddr;
use std::path::Path;

use serde::Deserialize;

use super::engine::EngineConfig;
use super::gateway::GatewayConfig;
use super::logging::LoggingConfig;
use super::scheduler::SchedulerConfig;
use super::store::StoreConfig;
use crate::error::{ConfigError, Result};

pub const STORE_URL_ENV: &str = "SPREADWATCH_STORE_URL";
pub const BIND_ENV: &str = "SPREADWATCH_BIND";

/// Main application configuration.
///
/// Every section is optional; an empty file yields the defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Logging and tracing configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Backing store connection and key names.
    #[serde(default)]
    pub store: StoreConfig,

    /// Leg markets, threshold and fee defaults.
    #[serde(default)]
    pub engine: EngineConfig,

    /// Tick cadence and job intervals.
    #[serde(default)]
    pub scheduler: SchedulerConfig,

    /// Listen address and broadcast periods.
    #[serde(default)]
    pub gateway: GatewayConfig,
}

impl Config {
    /// Parse configuration from TOML content, applying environment overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML content is malformed or validation fails.
    #[allow(clippy::result_large_err)]
    pub fn parse_toml(content: &str) -> Result<Self> {
        Self::parse_with_env(content, |name| std::env::var(name).ok())
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read
    /// - The TOML content is malformed
    /// - Validation fails
    #[allow(clippy::result_large_err)]
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Self::parse_toml(&content)
    }

    #[allow(clippy::result_large_err)]
    pub(crate) fn parse_with_env(
        content: &str,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let mut config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;

        if let Some(url) = env(STORE_URL_ENV).filter(|v| !v.is_empty()) {
            config.store.url = url;
        }
        if let Some(bind) = env(BIND_ENV).filter(|v| !v.is_empty()) {
            config.gateway.bind = bind;
        }

        config.validate()?;
        Ok(config)
    }

    /// Initialize the global tracing subscriber.
    pub fn init_logging(&self) {
        self.logging.init();
    }

    #[allow(clippy::result_large_err)]
    fn validate(&self) -> Result<()> {
        if self.store.url.trim().is_empty() {
            return Err(ConfigError::MissingField { field: "store.url" }.into());
        }
        for (field, key) in [
            ("store.keys.quotes", &self.store.keys.quotes),
            ("store.keys.fees", &self.store.keys.fees),
            ("store.keys.opportunities", &self.store.keys.opportunities),
            ("store.keys.symbols", &self.store.keys.symbols),
        ] {
            if key.is_empty() {
                return Err(ConfigError::MissingField { field }.into());
            }
        }

        if !self.engine.spread_threshold.is_finite() {
            return Err(ConfigError::InvalidValue {
                field: "engine.spread_threshold",
                reason: "must be a finite number".to_string(),
            }
            .into());
        }
        let mut rates: Vec<_> = self.engine.exchange_fees.values().collect();
        rates.push(&self.engine.default_fee);
        if rates
            .iter()
            .any(|r| !(0.0..=1.0).contains(&r.maker) || !(0.0..=1.0).contains(&r.taker))
        {
            return Err(ConfigError::InvalidValue {
                field: "engine.fees",
                reason: "maker and taker must be between 0 and 1".to_string(),
            }
            .into());
        }

        if self.scheduler.tick_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "scheduler.tick_ms",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        self.scheduler.jobs.monitor.cadence("scheduler.jobs.monitor.interval_ms")?;
        self.scheduler
            .jobs
            .fee_warmup
            .cadence("scheduler.jobs.fee_warmup.interval_ms")?;

        if self.gateway.bind.parse::<SocketAddr>().is_err() {
            return Err(ConfigError::InvalidValue {
                field: "gateway.bind",
                reason: format!("'{}' is not a socket address", self.gateway.bind),
            }
            .into());
        }
        if self.gateway.outbound_capacity == 0 {
            return Err(ConfigError::InvalidValue {
                field: "gateway.outbound_capacity",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        let broadcast = &self.gateway.broadcast;
        if broadcast.arbitrage_pairs_ms == 0 || broadcast.monitor_pairs_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "gateway.broadcast",
                reason: "periods must be greater than 0".to_string(),
            }
            .into());
        }
        Ok(())
    }
}
