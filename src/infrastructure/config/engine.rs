//! Arbitrage engine configuration.

use std::collections::HashMap;

use serde::Deserialize;

use crate::application::{ArbitrageEngine, FeeDefaults, DEFAULT_SPREAD_THRESHOLD};
use crate::domain::{FeeRate, MarketType};

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Segment bought at its lowest ask.
    pub buy_market: MarketType,
    /// Segment sold at its highest bid.
    pub sell_market: MarketType,
    /// Gross profit, in percent, above which an opportunity is actionable.
    pub spread_threshold: f64,
    /// Rate used when neither the pair nor the exchange has an entry.
    pub default_fee: FeeRate,
    /// Per-exchange rates used when a pair has no stored entry.
    pub exchange_fees: HashMap<String, FeeRate>,
    /// Identifier attached to symbols missing from the symbol-info hash.
    pub default_symbol_id: Option<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            buy_market: MarketType::Spot,
            sell_market: MarketType::Future,
            spread_threshold: DEFAULT_SPREAD_THRESHOLD,
            default_fee: FeeRate::ZERO,
            exchange_fees: HashMap::new(),
            default_symbol_id: None,
        }
    }
}

impl EngineConfig {
    #[must_use]
    pub fn engine(&self) -> ArbitrageEngine {
        ArbitrageEngine::new(self.spread_threshold)
    }

    #[must_use]
    pub fn fee_defaults(&self) -> FeeDefaults {
        FeeDefaults {
            per_exchange: self.exchange_fees.clone(),
            fallback: self.default_fee,
        }
    }
}
