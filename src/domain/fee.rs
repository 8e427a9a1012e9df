//! Trading fee rates and the lookup table the engine reads them from.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::money::{lenient_number, nan};

/// Maker/taker rates as fractions (0.001 = 0.1%).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FeeRate {
    #[serde(default)]
    pub maker: f64,
    #[serde(default)]
    pub taker: f64,
}

impl FeeRate {
    pub const ZERO: Self = Self {
        maker: 0.0,
        taker: 0.0,
    };

    #[must_use]
    pub const fn new(maker: f64, taker: f64) -> Self {
        Self { maker, taker }
    }

    /// Both rates are usable numbers.
    #[must_use]
    pub fn is_numeric(&self) -> bool {
        self.maker.is_finite() && self.taker.is_finite()
    }
}

/// One exchange's rates for a pair, as stored under `exchanges_fees[<pair>]`.
///
/// The ingestion side occasionally writes `null` or string rates; those decode
/// to NaN so the engine can reject the pair instead of the whole list failing
/// to parse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeeEntry {
    pub exchange: String,
    #[serde(default = "nan", deserialize_with = "lenient_number")]
    pub maker: f64,
    #[serde(default = "nan", deserialize_with = "lenient_number")]
    pub taker: f64,
}

impl FeeEntry {
    pub fn new(exchange: impl Into<String>, maker: f64, taker: f64) -> Self {
        Self {
            exchange: exchange.into(),
            maker,
            taker,
        }
    }

    #[must_use]
    pub fn rate(&self) -> FeeRate {
        FeeRate::new(self.maker, self.taker)
    }
}

/// Source of fee rates for the engine.
pub trait FeeLookup {
    /// Rates charged by `exchange` on `symbol`. Never fails: unknown pairs fall
    /// back to a default.
    fn fee_for(&self, symbol: &str, exchange: &str) -> FeeRate;
}

/// In-memory snapshot of `(pair, exchange) → rates`.
///
/// Lookup order: the pair's own entry for the exchange, then the exchange-wide
/// default, then the global fallback.
#[derive(Debug, Clone, Default)]
pub struct FeeTable {
    pairs: HashMap<String, Vec<FeeEntry>>,
    exchange_defaults: HashMap<String, FeeRate>,
    fallback: FeeRate,
}

impl FeeTable {
    #[must_use]
    pub fn new(
        pairs: HashMap<String, Vec<FeeEntry>>,
        exchange_defaults: HashMap<String, FeeRate>,
        fallback: FeeRate,
    ) -> Self {
        Self {
            pairs,
            exchange_defaults,
            fallback,
        }
    }

    /// Empty table that answers every lookup with `fallback`.
    #[must_use]
    pub fn with_fallback(fallback: FeeRate) -> Self {
        Self {
            fallback,
            ..Self::default()
        }
    }

    /// Number of pairs with explicit entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

impl FeeLookup for FeeTable {
    fn fee_for(&self, symbol: &str, exchange: &str) -> FeeRate {
        self.pairs
            .get(symbol)
            .and_then(|entries| entries.iter().find(|e| e.exchange == exchange))
            .map(FeeEntry::rate)
            .or_else(|| self.exchange_defaults.get(exchange).copied())
            .unwrap_or(self.fallback)
    }
}
