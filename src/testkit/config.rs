//! Canonical test configurations.
//!
//! Single source of truth for config structs used across tests.

use crate::infrastructure::config::{Config, GatewayConfig, StoreBackend};

/// In-memory backend, ephemeral port and fast broadcasts.
pub fn local() -> Config {
    let mut config = Config::default();
    config.store.backend = StoreBackend::Memory;
    config.gateway = gateway(50);
    config.scheduler.tick_ms = 20;
    config
}

/// Gateway on `127.0.0.1:0` broadcasting every `period_ms`.
pub fn gateway(period_ms: u64) -> GatewayConfig {
    let mut gateway = GatewayConfig {
        bind: "127.0.0.1:0".into(),
        ..GatewayConfig::default()
    };
    gateway.broadcast.arbitrage_pairs_ms = period_ms;
    gateway.broadcast.monitor_pairs_ms = period_ms;
    gateway
}
