//! Handler for the `scan` command.

use crate::cli::{Cli, ScanArgs};
use crate::error::Result;
use crate::infrastructure::orchestration::orchestrator::Orchestrator;

/// Execute the scan command, printing the ranked batch to stdout.
pub async fn execute(cli: &Cli, args: &ScanArgs) -> Result<()> {
    let config = cli.load_config()?;
    config.init_logging();

    let mut batch = Orchestrator::scan(&config).await?;
    if args.actionable {
        batch.retain(|o| o.actionable);
    }
    println!("{}", serde_json::to_string_pretty(&batch)?);
    Ok(())
}
