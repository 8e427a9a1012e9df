//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).
//!
//! # Modules
//!
//! - [`domain`] - Builders for quotes and opportunities.
//! - [`store`] - In-memory store seeding in the backing-hash wire format.
//! - [`config`] - Canonical test configurations.

pub mod config;
pub mod domain;
pub mod store;
