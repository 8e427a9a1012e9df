use std::io::Write;
use std::time::Duration;

use spreadwatch::application::Cadence;
use spreadwatch::domain::{FeeRate, MarketType};
use spreadwatch::error::{ConfigError, Error};
use spreadwatch::infrastructure::config::{Config, StoreBackend};
use tempfile::NamedTempFile;

fn write_temp_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("create temp config");
    file.write_all(contents.as_bytes()).expect("write temp config");
    file
}

#[test]
fn loads_a_full_file() {
    let file = write_temp_config(
        r#"
[logging]
level = "debug"
format = "json"

[store]
backend = "memory"

[store.keys]
opportunities = "spreads"

[engine]
buy_market = "future"
sell_market = "spot"
spread_threshold = 0.5
default_symbol_id = "bitcoin"

[engine.default_fee]
maker = 0.0
taker = 0.002

[engine.exchange_fees.gate]
maker = 0.0
taker = 0.001

[scheduler]
tick_ms = 250

[scheduler.jobs.monitor]
interval_ms = 5000

[scheduler.jobs.fee_warmup]
enabled = false
interval_ms = -1

[gateway]
bind = "127.0.0.1:9001"
outbound_capacity = 8

[gateway.broadcast]
arbitrage_pairs_ms = 2000
monitor_pairs_ms = 500
"#,
    );

    let config = Config::load(file.path()).unwrap();
    assert_eq!(config.logging.format, "json");
    assert_eq!(config.store.backend, StoreBackend::Memory);
    assert_eq!(config.store.keys.opportunities, "spreads");
    assert_eq!(config.store.keys.quotes, "pairs_markets");
    assert_eq!(config.engine.buy_market, MarketType::Future);
    assert_eq!(config.engine.sell_market, MarketType::Spot);
    assert_eq!(config.engine.default_fee, FeeRate::new(0.0, 0.002));
    assert_eq!(config.engine.exchange_fees["gate"], FeeRate::new(0.0, 0.001));
    assert_eq!(config.engine.default_symbol_id.as_deref(), Some("bitcoin"));
    assert_eq!(
        config.scheduler.jobs.monitor.cadence("monitor").unwrap(),
        Cadence::Every(Duration::from_secs(5))
    );
    assert!(!config.scheduler.jobs.fee_warmup.enabled);
    assert_eq!(config.gateway.outbound_capacity, 8);
    assert_eq!(config.gateway.broadcast.monitor_pairs_ms, 500);
}

#[test]
fn missing_file_is_a_read_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = Config::load(dir.path().join("absent.toml"));
    assert!(matches!(result, Err(Error::Config(ConfigError::ReadFile(_)))));
}

#[test]
fn zero_interval_is_rejected_at_load() {
    let file = write_temp_config(
        r#"
[scheduler.jobs.monitor]
interval_ms = 0
"#,
    );
    let result = Config::load(file.path());
    assert!(matches!(
        result,
        Err(Error::Config(ConfigError::InvalidValue { .. }))
    ));
}

#[test]
fn unknown_market_is_a_parse_error() {
    let file = write_temp_config(
        r#"
[engine]
buy_market = "options"
"#,
    );
    let result = Config::load(file.path());
    assert!(matches!(result, Err(Error::Config(ConfigError::Parse(_)))));
}
