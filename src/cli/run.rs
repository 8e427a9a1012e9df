//! Handler for the `run` command.

use tokio::signal;
use tokio::sync::watch;
use tracing::{error, info};

use crate::cli::{Cli, RunArgs};
use crate::error::Result;
use crate::infrastructure::orchestration::orchestrator::Orchestrator;

/// Execute the run command.
pub async fn execute(cli: &Cli, args: &RunArgs) -> Result<()> {
    let mut config = cli.load_config()?;
    if let Some(ref bind) = args.bind {
        config.gateway.bind = bind.clone();
    }
    if let Some(ref url) = args.store_url {
        config.store.url = url.clone();
    }

    config.init_logging();
    info!(version = env!("CARGO_PKG_VERSION"), "spreadwatch starting");

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        if signal::ctrl_c().await.is_ok() {
            let _ = shutdown_tx.send(true);
        }
    });

    if let Err(e) = Orchestrator::run_with_shutdown(config, shutdown_rx).await {
        error!(error = %e, "Fatal error");
        return Err(e);
    }
    Ok(())
}
