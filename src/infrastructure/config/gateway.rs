//! Subscription gateway configuration.

use serde::Deserialize;

/// Broadcast period per subscribable method, in milliseconds.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BroadcastConfig {
    pub arbitrage_pairs_ms: u64,
    pub monitor_pairs_ms: u64,
}

impl Default for BroadcastConfig {
    fn default() -> Self {
        Self {
            arbitrage_pairs_ms: 1000,
            monitor_pairs_ms: 1000,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listen address, overridden by `SPREADWATCH_BIND`.
    pub bind: String,
    /// Frames buffered per connection before broadcasts skip it.
    pub outbound_capacity: usize,
    pub broadcast: BroadcastConfig,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:8080".into(),
            outbound_capacity: 64,
            broadcast: BroadcastConfig::default(),
        }
    }
}
