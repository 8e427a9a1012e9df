//! Typed access to quotes, fees and results over a [`HashStore`].
//!
//! Every stored value is a JSON string. A value that fails to decode is
//! skipped with a warning so one bad entry never hides its siblings.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::warn;

use crate::domain::{FeeEntry, MarketType, Opportunity, Quote};
use crate::error::{Result, StoreError};
use crate::infrastructure::config::StoreKeys;
use crate::port::outbound::store::HashStore;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SymbolInfo {
    symbol_id: String,
}

/// Repository over the backing store's well-known hashes.
#[derive(Clone)]
pub struct MarketData {
    store: Arc<dyn HashStore>,
    keys: StoreKeys,
}

impl MarketData {
    pub fn new(store: Arc<dyn HashStore>, keys: StoreKeys) -> Self {
        Self { store, keys }
    }

    /// Backend name for logs.
    #[must_use]
    pub fn backend(&self) -> &'static str {
        self.store.name()
    }

    pub async fn ping(&self) -> std::result::Result<(), StoreError> {
        self.store.ping().await
    }

    /// Quotes for one symbol in one segment. Missing or malformed → empty.
    pub async fn quotes(&self, market: MarketType, symbol: &str) -> Result<Vec<Quote>> {
        let field = market.field(symbol);
        let raw = self.store.hget(&self.keys.quotes, &field).await?;
        Ok(raw
            .and_then(|value| decode(&self.keys.quotes, &field, &value))
            .unwrap_or_default())
    }

    /// Every symbol quoted in `market`, keyed by bare symbol.
    pub async fn quotes_for_market(
        &self,
        market: MarketType,
    ) -> Result<BTreeMap<String, Vec<Quote>>> {
        let prefix = format!("{}:", market.as_str());
        let all = self.store.hgetall(&self.keys.quotes).await?;
        Ok(all
            .into_iter()
            .filter_map(|(field, value)| {
                let symbol = field.strip_prefix(&prefix)?.to_string();
                let quotes = decode::<Vec<Quote>>(&self.keys.quotes, &field, &value)?;
                Some((symbol, quotes))
            })
            .collect())
    }

    /// Fee entries for one pair.
    pub async fn fees(&self, symbol: &str) -> Result<Vec<FeeEntry>> {
        let raw = self.store.hget(&self.keys.fees, symbol).await?;
        Ok(raw
            .and_then(|value| decode(&self.keys.fees, symbol, &value))
            .unwrap_or_default())
    }

    /// Every pair's fee entries.
    pub async fn fee_entries(&self) -> Result<HashMap<String, Vec<FeeEntry>>> {
        let all = self.store.hgetall(&self.keys.fees).await?;
        Ok(decode_all(&self.keys.fees, all))
    }

    /// Symbol → external instrument identifier.
    pub async fn symbol_ids(&self) -> Result<HashMap<String, String>> {
        let all = self.store.hgetall(&self.keys.symbols).await?;
        Ok(decode_all::<SymbolInfo>(&self.keys.symbols, all)
            .into_iter()
            .map(|(symbol, info)| (symbol, info.symbol_id))
            .collect())
    }

    /// Overwrite the stored opportunity for its symbol.
    pub async fn save_opportunity(&self, opportunity: &Opportunity) -> Result<()> {
        let json = serde_json::to_string(opportunity)?;
        self.store
            .hset(&self.keys.opportunities, &opportunity.symbol, &json)
            .await?;
        Ok(())
    }

    /// Latest opportunity for every symbol.
    pub async fn opportunities(&self) -> Result<Vec<Opportunity>> {
        let all = self.store.hgetall(&self.keys.opportunities).await?;
        Ok(decode_all(&self.keys.opportunities, all)
            .into_values()
            .collect())
    }

    /// Opportunities whose gross profit lies in `[min, max]`, best first.
    pub async fn ranked_opportunities(&self, min: f64, max: f64) -> Result<Vec<Opportunity>> {
        let mut ranked: Vec<_> = self
            .opportunities()
            .await?
            .into_iter()
            .filter(|o| o.profit_within(min, max))
            .collect();
        ranked.sort_by(|a, b| {
            b.profit_gross_pct
                .total_cmp(&a.profit_gross_pct)
                .then_with(|| a.symbol.cmp(&b.symbol))
        });
        Ok(ranked)
    }
}

fn decode<T: DeserializeOwned>(key: &str, field: &str, value: &str) -> Option<T> {
    match serde_json::from_str(value) {
        Ok(decoded) => Some(decoded),
        Err(e) => {
            warn!(key, field, error = %e, "Skipping malformed stored value");
            None
        }
    }
}

fn decode_all<T: DeserializeOwned>(key: &str, raw: HashMap<String, String>) -> HashMap<String, T> {
    raw.into_iter()
        .filter_map(|(field, value)| {
            let decoded = decode(key, &field, &value)?;
            Some((field, decoded))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::outbound::store::MemoryStore;

    fn setup() -> (Arc<MemoryStore>, MarketData) {
        let store = Arc::new(MemoryStore::new());
        let data = MarketData::new(store.clone(), StoreKeys::default());
        (store, data)
    }

    #[tokio::test]
    async fn quotes_for_market_strips_prefix_and_skips_malformed() {
        let (store, data) = setup();
        store.insert(
            "pairs_markets",
            "spot:BTC_USDT",
            r#"[{"exchange":"gate","bid":99,"ask":100,"volume":1,"timestamp":0}]"#,
        );
        store.insert("pairs_markets", "spot:ETH_USDT", "not json");
        store.insert(
            "pairs_markets",
            "future:BTC_USDT",
            r#"[{"exchange":"mexc","bid":101,"ask":102,"volume":1,"timestamp":0}]"#,
        );

        let spot = data.quotes_for_market(MarketType::Spot).await.unwrap();
        assert_eq!(spot.len(), 1);
        assert_eq!(spot["BTC_USDT"][0].exchange, "gate");

        let future = data.quotes(MarketType::Future, "BTC_USDT").await.unwrap();
        assert_eq!(future[0].bid, 101.0);
        assert!(data
            .quotes(MarketType::Future, "ETH_USDT")
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn fee_entries_skip_bad_pairs() {
        let (store, data) = setup();
        store.insert(
            "exchanges_fees",
            "BTC_USDT",
            r#"[{"exchange":"binance","taker":0.001,"maker":0.001}]"#,
        );
        store.insert("exchanges_fees", "ETH_USDT", "{oops");

        let fees = data.fee_entries().await.unwrap();
        assert_eq!(fees.len(), 1);
        assert_eq!(data.fees("BTC_USDT").await.unwrap()[0].taker, 0.001);
        assert!(data.fees("ETH_USDT").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn symbol_ids_decode_info_records() {
        let (store, data) = setup();
        store.insert("pairs_info", "BTC_USDT", r#"{"symbolId":"F1"}"#);
        store.insert("pairs_info", "ETH_USDT", r#"{"other":1}"#);

        let ids = data.symbol_ids().await.unwrap();
        assert_eq!(ids.len(), 1);
        assert_eq!(ids["BTC_USDT"], "F1");
    }

    #[tokio::test]
    async fn store_errors_propagate() {
        let (store, data) = setup();
        store.set_available(false);
        assert!(data.opportunities().await.is_err());
    }
}
