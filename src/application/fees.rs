//! Shared fee table snapshot.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;

use super::market_data::MarketData;
use crate::domain::{FeeEntry, FeeRate, FeeTable};
use crate::error::Result;

/// Fallback rates used when a pair has no stored entry.
#[derive(Debug, Clone, Default)]
pub struct FeeDefaults {
    pub per_exchange: HashMap<String, FeeRate>,
    pub fallback: FeeRate,
}

impl FeeDefaults {
    /// Build a table from stored entries plus these defaults.
    #[must_use]
    pub fn table(&self, pairs: HashMap<String, Vec<FeeEntry>>) -> FeeTable {
        FeeTable::new(pairs, self.per_exchange.clone(), self.fallback)
    }
}

/// In-memory fee table, swapped wholesale on refresh.
///
/// Readers take an `Arc` snapshot and never block a refresh for longer than
/// the pointer swap.
pub struct FeeCache {
    table: RwLock<Arc<FeeTable>>,
    defaults: FeeDefaults,
}

impl FeeCache {
    #[must_use]
    pub fn new(defaults: FeeDefaults) -> Self {
        let table = defaults.table(HashMap::new());
        Self {
            table: RwLock::new(Arc::new(table)),
            defaults,
        }
    }

    /// Reload every pair's entries. On error the previous snapshot stays.
    ///
    /// Returns the number of pairs loaded.
    pub async fn refresh(&self, data: &MarketData) -> Result<usize> {
        let entries = data.fee_entries().await?;
        let table = self.defaults.table(entries);
        let pairs = table.len();
        *self.table.write() = Arc::new(table);
        debug!(pairs, "Fee table refreshed");
        Ok(pairs)
    }

    /// Current table.
    #[must_use]
    pub fn snapshot(&self) -> Arc<FeeTable> {
        Arc::clone(&self.table.read())
    }
}
