//! Read-side queries answered for gateway clients.

use std::collections::HashMap;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use super::engine::{ArbitrageEngine, Leg, Rejection};
use super::fees::FeeDefaults;
use super::market_data::MarketData;
use crate::domain::{MarketType, Opportunity};

/// Which stored opportunities a discovery request wants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiscoveryKind {
    #[default]
    All,
    Actionable,
}

impl DiscoveryKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Actionable => "actionable",
        }
    }
}

fn default_max_profit() -> f64 {
    100.0
}

/// Ranked listing of stored opportunities.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscoveryQuery {
    #[serde(rename = "type", default)]
    pub kind: DiscoveryKind,
    #[serde(default)]
    pub min_profit: f64,
    #[serde(default = "default_max_profit")]
    pub max_profit: f64,
}

impl Default for DiscoveryQuery {
    fn default() -> Self {
        Self {
            kind: DiscoveryKind::All,
            min_profit: 0.0,
            max_profit: default_max_profit(),
        }
    }
}

/// Live comparison of one symbol between two named exchanges.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PairQuery {
    pub symbol: String,
    #[serde(rename = "exchangeA")]
    pub exchange_a: String,
    #[serde(rename = "exchangeA_type")]
    pub market_a: MarketType,
    #[serde(rename = "exchangeB")]
    pub exchange_b: String,
    #[serde(rename = "exchangeB_type")]
    pub market_b: MarketType,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum QueryError {
    #[error("insufficient data for {symbol}")]
    InsufficientData { symbol: String },

    #[error(transparent)]
    Rejected(#[from] Rejection),

    #[error("store unavailable")]
    Unavailable,
}

/// Answers discovery and pair-monitor requests.
#[derive(Clone)]
pub struct QueryService {
    data: MarketData,
    engine: ArbitrageEngine,
    fee_defaults: FeeDefaults,
}

impl QueryService {
    pub fn new(data: MarketData, engine: ArbitrageEngine, fee_defaults: FeeDefaults) -> Self {
        Self {
            data,
            engine,
            fee_defaults,
        }
    }

    /// Stored opportunities within the query's bounds, best first.
    ///
    /// A store failure yields an empty listing.
    pub async fn discover(&self, query: &DiscoveryQuery) -> Vec<Opportunity> {
        let ranked = match self
            .data
            .ranked_opportunities(query.min_profit, query.max_profit)
            .await
        {
            Ok(ranked) => ranked,
            Err(e) => {
                warn!(error = %e, "Discovery read failed");
                return Vec::new();
            }
        };
        match query.kind {
            DiscoveryKind::All => ranked,
            DiscoveryKind::Actionable => ranked.into_iter().filter(|o| o.actionable).collect(),
        }
    }

    /// Compute the opportunity for one exchange pair from live quotes and
    /// the pair's current fees.
    pub async fn monitor_pair(&self, query: &PairQuery) -> Result<Opportunity, QueryError> {
        let (quotes_a, quotes_b, entries) = match tokio::try_join!(
            self.data.quotes(query.market_a, &query.symbol),
            self.data.quotes(query.market_b, &query.symbol),
            self.data.fees(&query.symbol),
        ) {
            Ok(loaded) => loaded,
            Err(e) => {
                warn!(symbol = %query.symbol, error = %e, "Pair read failed");
                return Err(QueryError::Unavailable);
            }
        };

        let quotes_a: Vec<_> = quotes_a
            .into_iter()
            .filter(|q| q.exchange == query.exchange_a)
            .collect();
        let quotes_b: Vec<_> = quotes_b
            .into_iter()
            .filter(|q| q.exchange == query.exchange_b)
            .collect();
        if quotes_a.is_empty() || quotes_b.is_empty() {
            return Err(QueryError::InsufficientData {
                symbol: query.symbol.clone(),
            });
        }

        let table = self
            .fee_defaults
            .table(HashMap::from([(query.symbol.clone(), entries)]));
        let opportunity = self.engine.evaluate(
            &query.symbol,
            Leg::new(query.market_a, &quotes_a),
            Leg::new(query.market_b, &quotes_b),
            &table,
            Utc::now(),
        )?;
        Ok(opportunity)
    }
}
