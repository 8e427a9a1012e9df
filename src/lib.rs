//! Spreadwatch - spot/futures spread monitoring with live fan-out.
//!
//! This crate compares bid/ask quotes for the same symbol across exchanges and
//! market segments, nets out trading fees, and pushes the resulting
//! opportunities to WebSocket subscribers.
//!
//! # Architecture
//!
//! The crate follows a hexagonal layout:
//!
//! - **`domain`** - Quotes, fee tables, opportunities, identifiers
//! - **`application`** - The arbitrage engine, fee cache, scheduled monitor,
//!   the overlap-free job scheduler and client queries
//! - **`port`** - The `HashStore` trait the application reads and writes through
//! - **`adapter`** - Redis and in-memory stores, the WebSocket gateway
//! - **`infrastructure`** - Configuration, wiring and runtime lifecycle
//!
//! # Modules
//!
//! - [`domain`] - Exchange-agnostic types
//! - [`application`] - Use cases and the scheduler
//! - [`port`] - Store port
//! - [`adapter`] - Store adapters and the subscription gateway
//! - [`infrastructure`] - Config loading and orchestration
//! - [`cli`] - Command-line interface
//! - [`error`] - Error types for the crate
//!
//! # Features
//!
//! - `redis` (default) - Redis-backed store
//! - `testkit` - Builders shared with integration tests
//!
//! # Example
//!
//! ```no_run
//! use spreadwatch::infrastructure::config::Config;
//! use spreadwatch::infrastructure::orchestration::orchestrator::Orchestrator;
//!
//! # async fn demo() -> spreadwatch::error::Result<()> {
//! let config = Config::load("config.toml")?;
//! config.init_logging();
//! Orchestrator::run(config).await
//! # }
//! ```

pub mod adapter;
pub mod application;
pub mod cli;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod port;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
