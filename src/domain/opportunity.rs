//! Computed spread record persisted per symbol.
//!
//! An [`Opportunity`] is rebuilt from scratch on every engine run and written
//! over the previous value for the same symbol. Field names follow the
//! camelCase JSON readers of the result store expect.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::market::MarketType;
use super::money::{Price, Volume};
use super::quote::Quote;

/// The quote chosen for one side of the comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegQuote {
    pub market: MarketType,
    pub exchange: String,
    pub bid: Price,
    pub ask: Price,
    pub volume: Volume,
}

impl LegQuote {
    #[must_use]
    pub fn from_quote(market: MarketType, quote: &Quote) -> Self {
        Self {
            market,
            exchange: quote.exchange.clone(),
            bid: quote.bid,
            ask: quote.ask,
            volume: quote.volume,
        }
    }
}

/// Fee amounts in quote currency per unit traded.
///
/// Exit fees are computed and reported but are not part of `total`: the
/// reported figure assumes positions are held to settlement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeBreakdown {
    pub entry_a: f64,
    pub entry_b: f64,
    pub exit_a: f64,
    pub exit_b: f64,
    /// `entry_a + entry_b`.
    pub total: f64,
}

/// Spread and profit figures for one symbol across two legs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Opportunity {
    pub symbol: String,
    /// External instrument identifier, when the symbol is known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol_id: Option<String>,
    /// Buy leg (lowest ask).
    pub leg_a: LegQuote,
    /// Sell leg (highest bid).
    pub leg_b: LegQuote,
    pub spread: Price,
    pub profit_gross_pct: f64,
    pub profit_net_pct: f64,
    pub total_fees_pct: f64,
    pub fees: FeeBreakdown,
    pub volume: Volume,
    /// Gross profit cleared the configured threshold.
    pub actionable: bool,
    pub computed_at: DateTime<Utc>,
}

impl Opportunity {
    /// Attach the external instrument identifier.
    #[must_use]
    pub fn with_symbol_id(mut self, symbol_id: Option<String>) -> Self {
        self.symbol_id = symbol_id;
        self
    }

    /// Gross profit lies within `[min, max]`.
    #[must_use]
    pub fn profit_within(&self, min: f64, max: f64) -> bool {
        self.profit_gross_pct >= min && self.profit_gross_pct <= max
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Opportunity {
        Opportunity {
            symbol: "BTC_USDT".into(),
            symbol_id: None,
            leg_a: LegQuote::from_quote(MarketType::Spot, &Quote::new("gate", 99.0, 100.0, 10.0)),
            leg_b: LegQuote::from_quote(MarketType::Future, &Quote::new("mexc", 103.0, 104.0, 5.0)),
            spread: 3.0,
            profit_gross_pct: 3.0,
            profit_net_pct: 2.797,
            total_fees_pct: 0.203,
            fees: FeeBreakdown {
                entry_a: 0.1,
                entry_b: 0.103,
                exit_a: 0.099,
                exit_b: 0.104,
                total: 0.203,
            },
            volume: 5.0,
            actionable: true,
            computed_at: Utc::now(),
        }
    }

    #[test]
    fn serializes_camel_case_and_skips_missing_id() {
        let value = serde_json::to_value(sample()).unwrap();
        assert!(value.get("profitGrossPct").is_some());
        assert!(value.get("legA").is_some());
        assert_eq!(value["legB"]["market"], "future");
        assert!(value.get("symbolId").is_none());
    }

    #[test]
    fn profit_window_is_inclusive() {
        let opp = sample();
        assert!(opp.profit_within(3.0, 3.0));
        assert!(opp.profit_within(0.0, 100.0));
        assert!(!opp.profit_within(3.5, 100.0));
    }

    #[test]
    fn symbol_id_is_attached() {
        let opp = sample().with_symbol_id(Some("F123".into()));
        let value = serde_json::to_value(&opp).unwrap();
        assert_eq!(value["symbolId"], "F123");
    }
}
