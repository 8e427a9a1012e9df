//! Spread and fee computation between two market legs.
//!
//! The same [`ArbitrageEngine::evaluate`] backs the scheduled batch run and
//! the gateway's on-demand pair monitor.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::debug;

use crate::domain::{
    best_ask, best_bid, FeeBreakdown, FeeLookup, LegQuote, MarketType, Opportunity, Quote,
};

/// Default actionable threshold, in percent units.
pub const DEFAULT_SPREAD_THRESHOLD: f64 = 0.03;

/// Why a symbol produced no opportunity.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Rejection {
    #[error("no valid quotes on the {market} leg")]
    NoValidQuotes { market: MarketType },

    #[error("non-numeric fee rates for {exchange}")]
    InvalidFees { exchange: String },

    #[error("non-numeric fee percentage")]
    NonNumericFees,
}

/// One side of the comparison: the segment and its per-exchange quotes.
#[derive(Debug, Clone, Copy)]
pub struct Leg<'a> {
    pub market: MarketType,
    pub quotes: &'a [Quote],
}

impl<'a> Leg<'a> {
    pub fn new(market: MarketType, quotes: &'a [Quote]) -> Self {
        Self { market, quotes }
    }
}

/// Stateless calculator parameterized by the actionable threshold.
#[derive(Debug, Clone, Copy)]
pub struct ArbitrageEngine {
    spread_threshold: f64,
}

impl Default for ArbitrageEngine {
    fn default() -> Self {
        Self::new(DEFAULT_SPREAD_THRESHOLD)
    }
}

impl ArbitrageEngine {
    #[must_use]
    pub const fn new(spread_threshold: f64) -> Self {
        Self { spread_threshold }
    }

    /// Compare buying on `leg_a` at its lowest ask against selling on `leg_b`
    /// at its highest bid.
    pub fn evaluate(
        &self,
        symbol: &str,
        leg_a: Leg<'_>,
        leg_b: Leg<'_>,
        fees: &impl FeeLookup,
        computed_at: DateTime<Utc>,
    ) -> Result<Opportunity, Rejection> {
        let buy = best_ask(leg_a.quotes).ok_or(Rejection::NoValidQuotes {
            market: leg_a.market,
        })?;
        let sell = best_bid(leg_b.quotes).ok_or(Rejection::NoValidQuotes {
            market: leg_b.market,
        })?;

        let fee_a = fees.fee_for(symbol, &buy.exchange);
        let fee_b = fees.fee_for(symbol, &sell.exchange);
        if !fee_a.is_numeric() {
            return Err(Rejection::InvalidFees {
                exchange: buy.exchange.clone(),
            });
        }
        if !fee_b.is_numeric() {
            return Err(Rejection::InvalidFees {
                exchange: sell.exchange.clone(),
            });
        }

        let volume = buy.volume.min(sell.volume);

        let entry_a = buy.ask * fee_a.taker;
        let entry_b = sell.bid * fee_b.taker;
        let exit_a = buy.bid * fee_a.maker;
        let exit_b = sell.ask * fee_b.maker;
        // Exit fees stay out of the total.
        let total_fees_value = entry_a + entry_b;
        let total_fees_pct = total_fees_value / buy.ask * 100.0;
        if !total_fees_pct.is_finite() {
            return Err(Rejection::NonNumericFees);
        }

        let spread = sell.bid - buy.ask;
        let profit_gross_pct = (sell.bid / buy.ask - 1.0) * 100.0;
        let profit_net_pct = profit_gross_pct - total_fees_pct;

        Ok(Opportunity {
            symbol: symbol.to_string(),
            symbol_id: None,
            leg_a: LegQuote::from_quote(leg_a.market, buy),
            leg_b: LegQuote::from_quote(leg_b.market, sell),
            spread,
            profit_gross_pct,
            profit_net_pct,
            total_fees_pct,
            fees: FeeBreakdown {
                entry_a,
                entry_b,
                exit_a,
                exit_b,
                total: total_fees_value,
            },
            volume,
            actionable: profit_gross_pct > self.spread_threshold,
            computed_at,
        })
    }

    /// Evaluate every symbol quoted on both legs.
    ///
    /// Symbols are visited in `sell` order; a rejected symbol is logged and
    /// skipped without affecting the rest of the batch.
    pub fn run_batch(
        &self,
        buy_market: MarketType,
        buy: &BTreeMap<String, Vec<Quote>>,
        sell_market: MarketType,
        sell: &BTreeMap<String, Vec<Quote>>,
        fees: &impl FeeLookup,
        computed_at: DateTime<Utc>,
    ) -> Vec<Opportunity> {
        sell.iter()
            .filter_map(|(symbol, sell_quotes)| {
                let buy_quotes = buy.get(symbol)?;
                match self.evaluate(
                    symbol,
                    Leg::new(buy_market, buy_quotes),
                    Leg::new(sell_market, sell_quotes),
                    fees,
                    computed_at,
                ) {
                    Ok(opportunity) => Some(opportunity),
                    Err(reason) => {
                        debug!(symbol = %symbol, %reason, "Symbol skipped");
                        None
                    }
                }
            })
            .collect()
    }
}
