//! Periodic push of fresh data to subscribed groups.

use std::sync::Arc;
use std::time::Duration;

use futures_util::future::join_all;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, trace};

use super::handler::respond;
use super::protocol::Method;
use super::registry::{Delivery, SubscriptionRegistry};
use crate::application::QueryService;

/// Counts from one broadcast tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BroadcastReport {
    pub groups: usize,
    pub delivered: usize,
    /// Clients whose queue was full or closed.
    pub skipped: usize,
}

/// Compute once per group and push the same frame to every member.
pub async fn broadcast_once(
    method: Method,
    registry: &SubscriptionRegistry,
    queries: &QueryService,
) -> BroadcastReport {
    let groups = registry.groups(method);
    let responses = join_all(groups.iter().map(|g| respond(queries, &g.request))).await;

    let mut report = BroadcastReport {
        groups: groups.len(),
        ..BroadcastReport::default()
    };
    for (group, response) in groups.iter().zip(responses) {
        let frame = response.encode();
        for client in &group.clients {
            match client.try_deliver(Arc::clone(&frame)) {
                Delivery::Sent => report.delivered += 1,
                outcome => {
                    trace!(connection = %client.id(), ?outcome, group = %group.key, "Broadcast skipped client");
                    report.skipped += 1;
                }
            }
        }
    }
    report
}

/// Run [`broadcast_once`] for `method` every `period` until shutdown.
pub fn spawn_broadcaster(
    method: Method,
    period: Duration,
    registry: Arc<SubscriptionRegistry>,
    queries: QueryService,
    mut shutdown: watch::Receiver<bool>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        info!(%method, period_ms = period.as_millis() as u64, "Broadcaster started");

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if registry.groups(method).is_empty() {
                        continue;
                    }
                    let report = broadcast_once(method, &registry, &queries).await;
                    debug!(%method, groups = report.groups, delivered = report.delivered, skipped = report.skipped, "Broadcast");
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }
        info!(%method, "Broadcaster stopped");
    })
}
