//! Infrastructure orchestration façade.

use std::sync::Arc;

use tokio::sync::watch;

use crate::domain::Opportunity;
use crate::error::Result;
use crate::infrastructure::config::Config;
use crate::port::outbound::store::HashStore;

pub use super::runtime::run_with_shutdown;

/// Main application orchestrator.
pub struct Orchestrator;

impl Orchestrator {
    /// Run the service until the process is stopped.
    pub async fn run(config: Config) -> Result<()> {
        let (_shutdown_tx, shutdown_rx) = watch::channel(false);
        run_with_shutdown(config, shutdown_rx).await
    }

    /// Run with externally controlled shutdown signal.
    pub async fn run_with_shutdown(config: Config, shutdown: watch::Receiver<bool>) -> Result<()> {
        run_with_shutdown(config, shutdown).await
    }

    /// Run against an already-built store instead of the configured backend.
    pub async fn run_with_store(
        config: Config,
        store: Arc<dyn HashStore>,
        shutdown: watch::Receiver<bool>,
    ) -> Result<()> {
        super::runtime::run_with_store(config, store, shutdown).await
    }

    /// One recomputation pass without writing results, best first.
    pub async fn scan(config: &Config) -> Result<Vec<Opportunity>> {
        super::scan::scan(config).await
    }
}
