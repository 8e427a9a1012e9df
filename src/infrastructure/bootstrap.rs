//! Infrastructure bootstrap helpers for runtime wiring.

use std::sync::Arc;

use tracing::{info, warn};

use crate::adapter::outbound::store::MemoryStore;
use crate::application::{
    FeeCache, FeeWarmup, MarketData, OpportunityMonitor, QueryService, Scheduler,
};
use crate::error::Result;
use crate::infrastructure::config::{Config, SchedulerConfig, StoreBackend, StoreConfig};
use crate::port::outbound::store::HashStore;

pub(crate) const MONITOR_JOB: &str = "monitor";
pub(crate) const FEE_WARMUP_JOB: &str = "fee_warmup";

/// Application services sharing one store connection.
pub(crate) struct Services {
    pub data: MarketData,
    pub fees: Arc<FeeCache>,
    pub queries: QueryService,
    pub monitor: Arc<OpportunityMonitor>,
}

/// Build the configured store adapter.
pub(crate) async fn connect_store(config: &StoreConfig) -> Result<Arc<dyn HashStore>> {
    match config.backend {
        StoreBackend::Memory => {
            warn!("Using in-memory store - quotes are not shared with any ingestion process");
            Ok(Arc::new(MemoryStore::new()))
        }
        StoreBackend::Redis => connect_redis(&config.url).await,
    }
}

#[cfg(feature = "redis")]
async fn connect_redis(url: &str) -> Result<Arc<dyn HashStore>> {
    use crate::adapter::outbound::store::RedisStore;
    Ok(Arc::new(RedisStore::connect(url).await?))
}

#[cfg(not(feature = "redis"))]
async fn connect_redis(_url: &str) -> Result<Arc<dyn HashStore>> {
    Err(crate::error::StoreError::BackendDisabled("redis").into())
}

/// Wire repository, fee cache, query service and monitor.
pub(crate) fn build_services(config: &Config, store: Arc<dyn HashStore>) -> Services {
    let data = MarketData::new(store, config.store.keys.clone());
    let engine = config.engine.engine();
    let fee_defaults = config.engine.fee_defaults();
    let fees = Arc::new(FeeCache::new(fee_defaults.clone()));

    let monitor = OpportunityMonitor::new(
        data.clone(),
        Arc::clone(&fees),
        engine,
        config.engine.buy_market,
        config.engine.sell_market,
    )
    .with_default_symbol_id(config.engine.default_symbol_id.clone());

    Services {
        queries: QueryService::new(data.clone(), engine, fee_defaults),
        data,
        fees,
        monitor: Arc::new(monitor),
    }
}

/// Register enabled jobs. Returns how many were added.
pub(crate) fn register_jobs(
    config: &SchedulerConfig,
    scheduler: &Scheduler,
    services: &Services,
) -> Result<usize> {
    let mut added = 0;

    let warmup = &config.jobs.fee_warmup;
    if warmup.enabled {
        let cadence = warmup.cadence("scheduler.jobs.fee_warmup.interval_ms")?;
        let task = FeeWarmup::new(services.data.clone(), Arc::clone(&services.fees));
        added += usize::from(scheduler.add_job(FEE_WARMUP_JOB, cadence, Arc::new(task)));
    }

    let monitor = &config.jobs.monitor;
    if monitor.enabled {
        let cadence = monitor.cadence("scheduler.jobs.monitor.interval_ms")?;
        added += usize::from(scheduler.add_job(MONITOR_JOB, cadence, services.monitor.clone()));
    }

    info!(jobs = added, "Jobs registered");
    Ok(added)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::Cadence;
    use crate::testkit;

    #[tokio::test]
    async fn memory_backend_needs_no_server() {
        let store = connect_store(&testkit::config::local().store).await.unwrap();
        assert_eq!(store.name(), "memory");
        assert!(store.ping().await.is_ok());
    }

    #[tokio::test]
    async fn registers_enabled_jobs() {
        let mut config = testkit::config::local();
        let store = connect_store(&config.store).await.unwrap();
        let services = build_services(&config, store);

        let scheduler = Scheduler::new();
        assert_eq!(register_jobs(&config.scheduler, &scheduler, &services).unwrap(), 2);
        assert_eq!(scheduler.job(FEE_WARMUP_JOB).unwrap().cadence, Cadence::Once);

        config.scheduler.jobs.fee_warmup.enabled = false;
        let scheduler = Scheduler::new();
        assert_eq!(register_jobs(&config.scheduler, &scheduler, &services).unwrap(), 1);
        assert!(scheduler.job(FEE_WARMUP_JOB).is_none());
    }
}
