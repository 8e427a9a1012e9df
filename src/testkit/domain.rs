//! Builders for domain values used across tests.

use chrono::Utc;

use crate::domain::{FeeBreakdown, LegQuote, MarketType, Opportunity, Quote};

/// Quote with the given prices and volume.
pub fn quote(exchange: &str, bid: f64, ask: f64, volume: f64) -> Quote {
    Quote::new(exchange, bid, ask, volume)
}

/// Spot/futures opportunity with the given gross profit and no fees.
///
/// The buy leg asks 100, so the sell leg bids `100 + profit`.
pub fn opportunity(symbol: &str, profit_gross_pct: f64, actionable: bool) -> Opportunity {
    let sell_bid = 100.0 + profit_gross_pct;
    Opportunity {
        symbol: symbol.to_string(),
        symbol_id: None,
        leg_a: LegQuote::from_quote(MarketType::Spot, &quote("gate", 99.0, 100.0, 1.0)),
        leg_b: LegQuote::from_quote(MarketType::Future, &quote("mexc", sell_bid, sell_bid + 1.0, 1.0)),
        spread: profit_gross_pct,
        profit_gross_pct,
        profit_net_pct: profit_gross_pct,
        total_fees_pct: 0.0,
        fees: FeeBreakdown {
            entry_a: 0.0,
            entry_b: 0.0,
            exit_a: 0.0,
            exit_b: 0.0,
            total: 0.0,
        },
        volume: 1.0,
        actionable,
        computed_at: Utc::now(),
    }
}
