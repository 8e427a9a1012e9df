//! Seeding helpers for [`MemoryStore`].

use std::sync::Arc;

use crate::adapter::outbound::store::MemoryStore;
use crate::application::MarketData;
use crate::domain::{FeeEntry, MarketType, Opportunity, Quote};
use crate::infrastructure::config::StoreKeys;

/// Empty store plus a repository over the default keys.
pub fn memory() -> (Arc<MemoryStore>, MarketData) {
    let store = Arc::new(MemoryStore::new());
    let data = MarketData::new(store.clone(), StoreKeys::default());
    (store, data)
}

/// Store `quotes` for `symbol` in `market`.
pub fn put_quotes(store: &MemoryStore, market: MarketType, symbol: &str, quotes: &[Quote]) {
    let json = serde_json::to_string(quotes).unwrap_or_default();
    store.insert(&StoreKeys::default().quotes, &market.field(symbol), json);
}

/// Store the fee entries for `symbol`.
pub fn put_fees(store: &MemoryStore, symbol: &str, entries: &[FeeEntry]) {
    let json = serde_json::to_string(entries).unwrap_or_default();
    store.insert(&StoreKeys::default().fees, symbol, json);
}

/// Store a computed opportunity as the monitor would.
pub fn put_opportunity(store: &MemoryStore, opportunity: &Opportunity) {
    let json = serde_json::to_string(opportunity).unwrap_or_default();
    store.insert(&StoreKeys::default().opportunities, &opportunity.symbol, json);
}
