//! Persistence port for the hash-of-hashes key-value backend.
//!
//! Quotes, fees, symbol info and computed opportunities all live in named
//! hashes (`pairs_markets`, `exchanges_fees`, `pairs_info`,
//! `arbitrage_pairs`), each mapping a field to a JSON string.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::error::StoreError;

/// Minimal hash command set the service needs.
///
/// Implementations must tolerate concurrent writes to disjoint fields without
/// extra locking on the caller's side.
#[async_trait]
pub trait HashStore: Send + Sync {
    /// Round-trip to the backend.
    async fn ping(&self) -> Result<(), StoreError>;

    /// Read one field of a hash.
    async fn hget(&self, key: &str, field: &str) -> Result<Option<String>, StoreError>;

    /// Read every field of a hash. A missing hash is empty.
    async fn hgetall(&self, key: &str) -> Result<HashMap<String, String>, StoreError>;

    /// Write one field of a hash, replacing any previous value.
    async fn hset(&self, key: &str, field: &str, value: &str) -> Result<(), StoreError>;

    /// Backend name for logs.
    fn name(&self) -> &'static str;
}
