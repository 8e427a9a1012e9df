//! Orchestrator runtime lifecycle.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::adapter::inbound::gateway::Gateway;
use crate::application::{JobOutcome, Scheduler};
use crate::error::Result;
use crate::infrastructure::bootstrap::{build_services, connect_store, register_jobs};
use crate::infrastructure::config::Config;
use crate::port::outbound::store::HashStore;

/// Runtime loop entrypoint used by [`Orchestrator`](super::orchestrator::Orchestrator).
pub async fn run_with_shutdown(config: Config, shutdown: watch::Receiver<bool>) -> Result<()> {
    let store = connect_store(&config.store).await?;
    run_with_store(config, store, shutdown).await
}

pub(super) async fn run_with_store(
    config: Config,
    store: Arc<dyn HashStore>,
    mut shutdown: watch::Receiver<bool>,
) -> Result<()> {
    info!(
        backend = store.name(),
        bind = %config.gateway.bind,
        buy = %config.engine.buy_market,
        sell = %config.engine.sell_market,
        "Starting spreadwatch"
    );

    // Unreachable store or unusable address is fatal before any client connects.
    store.ping().await?;
    let services = build_services(&config, store);
    let gateway = Gateway::new(config.gateway.clone(), services.queries.clone());
    let listener = gateway.bind().await?;

    let (scheduler, outcomes) = Scheduler::with_outcomes();
    register_jobs(&config.scheduler, &scheduler, &services)?;

    let gateway_handle = tokio::spawn(gateway.serve(listener, shutdown.clone()));
    let outcome_handle = tokio::spawn(log_outcomes(outcomes));

    let mut ticker = tokio::time::interval(Duration::from_millis(config.scheduler.tick_ms));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            result = shutdown.changed() => {
                match result {
                    Ok(()) => {
                        if *shutdown.borrow() {
                            info!("Shutdown signal received");
                            break;
                        }
                    }
                    Err(_) => {
                        info!("Shutdown channel closed");
                        break;
                    }
                }
            }
            _ = ticker.tick() => {
                let dispatched = scheduler.tick();
                if !dispatched.is_empty() {
                    debug!(jobs = ?dispatched, "Jobs dispatched");
                }
            }
        }
    }

    let gateway_result = gateway_handle.await;
    outcome_handle.abort();
    gateway_result??;

    info!("spreadwatch stopped");
    Ok(())
}

async fn log_outcomes(mut outcomes: mpsc::UnboundedReceiver<JobOutcome>) {
    while let Some(outcome) = outcomes.recv().await {
        match outcome {
            JobOutcome::Completed {
                job,
                summary,
                elapsed,
            } => info!(%job, elapsed_ms = elapsed.as_millis() as u64, %summary, "Job completed"),
            JobOutcome::Failed {
                job,
                message,
                elapsed,
            } => warn!(%job, elapsed_ms = elapsed.as_millis() as u64, %message, "Job failed"),
        }
    }
}
