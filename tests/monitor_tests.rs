use std::sync::Arc;
use std::time::Duration;

use spreadwatch::application::{
    ArbitrageEngine, Cadence, DiscoveryKind, DiscoveryQuery, FeeCache, FeeDefaults, FeeWarmup,
    JobOutcome, OpportunityMonitor, QueryService, Scheduler,
};
use spreadwatch::domain::{approx_eq, FeeEntry, MarketType};
use spreadwatch::testkit::domain::quote;
use spreadwatch::testkit::store::{memory, put_fees, put_quotes};

async fn next_outcome(
    outcomes: &mut tokio::sync::mpsc::UnboundedReceiver<JobOutcome>,
) -> JobOutcome {
    tokio::time::timeout(Duration::from_secs(2), outcomes.recv())
        .await
        .expect("no outcome in time")
        .expect("outcome channel closed")
}

#[tokio::test]
async fn scheduled_run_feeds_discovery() {
    let (store, data) = memory();
    put_quotes(&store, MarketType::Spot, "BTC_USDT", &[
        quote("gate", 99.0, 100.0, 10.0),
        quote("binance", 99.5, 100.5, 10.0),
    ]);
    put_quotes(&store, MarketType::Future, "BTC_USDT", &[quote("mexc", 103.0, 104.0, 5.0)]);
    put_quotes(&store, MarketType::Spot, "ETH_USDT", &[quote("gate", 1999.0, 2000.0, 3.0)]);
    put_quotes(&store, MarketType::Future, "ETH_USDT", &[quote("mexc", 2000.2, 2001.0, 3.0)]);
    put_quotes(&store, MarketType::Spot, "SOL_USDT", &[quote("gate", 9.0, 10.0, 3.0)]);
    put_fees(&store, "BTC_USDT", &[
        FeeEntry::new("gate", 0.0, 0.001),
        FeeEntry::new("mexc", 0.0, 0.001),
    ]);

    let engine = ArbitrageEngine::default();
    let fees = Arc::new(FeeCache::new(FeeDefaults::default()));
    let monitor = OpportunityMonitor::new(
        data.clone(),
        Arc::clone(&fees),
        engine,
        MarketType::Spot,
        MarketType::Future,
    );

    let (scheduler, mut outcomes) = Scheduler::with_outcomes();
    scheduler.add_job("fee_warmup", Cadence::Once, Arc::new(FeeWarmup::new(data.clone(), fees)));
    scheduler.add_job("monitor", Cadence::Every(Duration::from_secs(60)), Arc::new(monitor));
    assert_eq!(scheduler.tick(), vec!["fee_warmup".to_string(), "monitor".to_string()]);

    let mut summaries = Vec::new();
    for _ in 0..2 {
        match next_outcome(&mut outcomes).await {
            JobOutcome::Completed { job, summary, .. } => summaries.push((job, summary)),
            failed => panic!("unexpected failure: {failed:?}"),
        }
    }
    summaries.sort();
    assert_eq!(summaries[0], ("fee_warmup".to_string(), "1 pairs".to_string()));
    assert_eq!(summaries[1].0, "monitor");
    assert!(summaries[1].1.starts_with("2 symbols"), "{}", summaries[1].1);

    let queries = QueryService::new(data, engine, FeeDefaults::default());
    let ranked = queries.discover(&DiscoveryQuery::default()).await;
    let symbols: Vec<_> = ranked.iter().map(|o| o.symbol.as_str()).collect();
    assert_eq!(symbols, ["BTC_USDT", "ETH_USDT"]);

    let btc = &ranked[0];
    assert_eq!(btc.leg_a.exchange, "gate");
    assert_eq!(btc.leg_b.exchange, "mexc");
    assert!(approx_eq(btc.profit_gross_pct, 3.0, 1e-9));
    assert!(btc.actionable);
    assert!(approx_eq(btc.volume, 5.0, 1e-9));

    let eth = &ranked[1];
    assert!(approx_eq(eth.profit_gross_pct, 0.01, 1e-9));
    assert!(!eth.actionable);

    let actionable = queries
        .discover(&DiscoveryQuery {
            kind: DiscoveryKind::Actionable,
            ..DiscoveryQuery::default()
        })
        .await;
    assert_eq!(actionable.len(), 1);

    let bounded = queries
        .discover(&DiscoveryQuery {
            min_profit: 0.5,
            max_profit: 2.0,
            ..DiscoveryQuery::default()
        })
        .await;
    assert!(bounded.is_empty());
}

#[tokio::test]
async fn unavailable_store_completes_an_empty_run() {
    let (store, data) = memory();
    put_quotes(&store, MarketType::Spot, "BTC_USDT", &[quote("gate", 99.0, 100.0, 1.0)]);
    put_quotes(&store, MarketType::Future, "BTC_USDT", &[quote("mexc", 103.0, 104.0, 1.0)]);
    let fees = Arc::new(FeeCache::new(FeeDefaults::default()));
    let monitor = OpportunityMonitor::new(
        data.clone(),
        fees,
        ArbitrageEngine::default(),
        MarketType::Spot,
        MarketType::Future,
    );
    store.set_available(false);

    let (scheduler, mut outcomes) = Scheduler::with_outcomes();
    scheduler.add_job("monitor", Cadence::Every(Duration::from_millis(1)), Arc::new(monitor));
    scheduler.tick();

    match next_outcome(&mut outcomes).await {
        JobOutcome::Completed { summary, .. } => assert_eq!(summary, "store unavailable, 0 symbols"),
        failed => panic!("outage must not fail the job: {failed:?}"),
    }
    let snapshot = scheduler.job("monitor").unwrap();
    assert_eq!(snapshot.failures, 0);
    assert!(snapshot.last_error.is_none());

    store.set_available(true);
    tokio::time::sleep(Duration::from_millis(5)).await;
    scheduler.tick();
    match next_outcome(&mut outcomes).await {
        JobOutcome::Completed { summary, .. } => assert!(summary.starts_with("1 symbols"), "{summary}"),
        failed => panic!("unexpected failure: {failed:?}"),
    }
    assert_eq!(data.opportunities().await.unwrap().len(), 1);
}
