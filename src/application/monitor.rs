//! Scheduled recomputation of every spot/futures opportunity.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use futures_util::future::join_all;
use tracing::{debug, info, warn};

use super::engine::ArbitrageEngine;
use super::fees::FeeCache;
use super::market_data::MarketData;
use super::scheduler::Task;
use crate::domain::{MarketType, Opportunity};
use crate::error::Result;

/// Recomputes opportunities for every symbol quoted on both legs and writes
/// them back to the store.
pub struct OpportunityMonitor {
    data: MarketData,
    fees: Arc<FeeCache>,
    engine: ArbitrageEngine,
    buy_market: MarketType,
    sell_market: MarketType,
    default_symbol_id: Option<String>,
}

impl OpportunityMonitor {
    pub fn new(
        data: MarketData,
        fees: Arc<FeeCache>,
        engine: ArbitrageEngine,
        buy_market: MarketType,
        sell_market: MarketType,
    ) -> Self {
        Self {
            data,
            fees,
            engine,
            buy_market,
            sell_market,
            default_symbol_id: None,
        }
    }

    /// Identifier attached to symbols missing from the info hash.
    #[must_use]
    pub fn with_default_symbol_id(mut self, id: Option<String>) -> Self {
        self.default_symbol_id = id;
        self
    }

    /// Compute the current batch without writing it.
    ///
    /// # Errors
    ///
    /// Returns the store error if quotes or symbol info cannot be read.
    pub async fn evaluate(&self) -> Result<Vec<Opportunity>> {
        if let Err(e) = self.fees.refresh(&self.data).await {
            warn!(error = %e, "Fee refresh failed, using previous table");
        }

        let symbol_ids = self.data.symbol_ids().await?;
        let buy = self.data.quotes_for_market(self.buy_market).await?;
        let sell = self.data.quotes_for_market(self.sell_market).await?;
        debug!(
            buy_symbols = buy.len(),
            sell_symbols = sell.len(),
            "Quotes loaded"
        );

        let table = self.fees.snapshot();
        let engine = self.engine;
        let (buy_market, sell_market) = (self.buy_market, self.sell_market);
        let batch = tokio::task::spawn_blocking(move || {
            engine.run_batch(buy_market, &buy, sell_market, &sell, table.as_ref(), Utc::now())
        })
        .await?;

        Ok(self.attach_ids(batch, &symbol_ids))
    }

    fn attach_ids(
        &self,
        batch: Vec<Opportunity>,
        ids: &HashMap<String, String>,
    ) -> Vec<Opportunity> {
        batch
            .into_iter()
            .map(|o| {
                let id = ids
                    .get(&o.symbol)
                    .cloned()
                    .or_else(|| self.default_symbol_id.clone());
                o.with_symbol_id(id)
            })
            .collect()
    }

    async fn persist(&self, batch: &[Opportunity]) -> usize {
        let writes = batch.iter().map(|o| self.data.save_opportunity(o));
        let failed = join_all(writes)
            .await
            .into_iter()
            .zip(batch)
            .filter_map(|(result, o)| result.err().map(|e| (o, e)))
            .inspect(|(o, e)| warn!(symbol = %o.symbol, error = %e, "Failed to store opportunity"))
            .count();
        batch.len() - failed
    }
}

#[async_trait]
impl Task for OpportunityMonitor {
    async fn run(&self) -> Result<String> {
        let evaluated = match self.data.ping().await {
            Ok(()) => self.evaluate().await,
            Err(e) => Err(e.into()),
        };
        let batch = match evaluated {
            Ok(batch) => batch,
            Err(e) if e.is_transient() => {
                warn!(error = %e, "Store unavailable, skipping run");
                return Ok("store unavailable, 0 symbols".to_string());
            }
            Err(e) => return Err(e),
        };

        let actionable = batch.iter().filter(|o| o.actionable).count();
        let stored = self.persist(&batch).await;
        Ok(format!(
            "{} symbols, {actionable} actionable, {stored} stored",
            batch.len()
        ))
    }
}

/// One-shot task loading the fee table before the first recomputation.
pub struct FeeWarmup {
    data: MarketData,
    fees: Arc<FeeCache>,
}

impl FeeWarmup {
    pub fn new(data: MarketData, fees: Arc<FeeCache>) -> Self {
        Self { data, fees }
    }
}

#[async_trait]
impl Task for FeeWarmup {
    async fn run(&self) -> Result<String> {
        let pairs = self.fees.refresh(&self.data).await?;
        info!(pairs, backend = self.data.backend(), "Fee table loaded");
        Ok(format!("{pairs} pairs"))
    }
}
