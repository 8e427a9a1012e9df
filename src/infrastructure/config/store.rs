//! Key-value store connection and key layout.

use serde::Deserialize;

/// Which [`HashStore`](crate::port::outbound::store::HashStore) adapter to build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    Redis,
    /// Process-local store; nothing is shared with the ingestion pipeline.
    Memory,
}

/// Names of the hashes read and written.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StoreKeys {
    /// `<market>:<symbol>` → JSON array of quotes.
    pub quotes: String,
    /// `<symbol>` → JSON array of per-exchange fee entries.
    pub fees: String,
    /// `<symbol>` → JSON opportunity, written by the monitor.
    pub opportunities: String,
    /// `<symbol>` → `{"symbolId": ...}`.
    pub symbols: String,
}

impl Default for StoreKeys {
    fn default() -> Self {
        Self {
            quotes: "pairs_markets".into(),
            fees: "exchanges_fees".into(),
            opportunities: "arbitrage_pairs".into(),
            symbols: "pairs_info".into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    /// Connection URL, overridden by `SPREADWATCH_STORE_URL`.
    pub url: String,
    pub keys: StoreKeys,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::Redis,
            url: "redis://127.0.0.1:6379".into(),
            keys: StoreKeys::default(),
        }
    }
}
