//! Single recomputation pass for the `scan` command.

use tracing::info;

use crate::domain::Opportunity;
use crate::error::Result;
use crate::infrastructure::bootstrap::{build_services, connect_store};
use crate::infrastructure::config::Config;

pub(super) async fn scan(config: &Config) -> Result<Vec<Opportunity>> {
    let store = connect_store(&config.store).await?;
    store.ping().await?;
    let services = build_services(config, store);

    let mut batch = services.monitor.evaluate().await?;
    batch.sort_by(|a, b| {
        b.profit_gross_pct
            .total_cmp(&a.profit_gross_pct)
            .then_with(|| a.symbol.cmp(&b.symbol))
    });
    info!(
        symbols = batch.len(),
        actionable = batch.iter().filter(|o| o.actionable).count(),
        "Scan complete"
    );
    Ok(batch)
}
