//! Shared fixtures for integration tests.
#![allow(dead_code)]

pub mod architecture;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use serde_json::Value;
use spreadwatch::adapter::inbound::gateway::{Gateway, SubscriptionRegistry};
use spreadwatch::adapter::outbound::store::MemoryStore;
use spreadwatch::application::{ArbitrageEngine, FeeDefaults, QueryService};
use spreadwatch::error::Result;
use spreadwatch::testkit;
use tokio::net::TcpStream;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

pub type Client = WebSocketStream<MaybeTlsStream<TcpStream>>;

const RECV_TIMEOUT: Duration = Duration::from_secs(2);

/// Gateway on an ephemeral port over an in-memory store.
pub struct TestGateway {
    pub addr: SocketAddr,
    pub store: Arc<MemoryStore>,
    pub registry: Arc<SubscriptionRegistry>,
    shutdown: watch::Sender<bool>,
    handle: JoinHandle<Result<()>>,
}

impl TestGateway {
    pub async fn start(period_ms: u64) -> Self {
        let (store, data) = testkit::store::memory();
        let queries = QueryService::new(data, ArbitrageEngine::default(), FeeDefaults::default());
        let gateway = Gateway::new(testkit::config::gateway(period_ms), queries);
        let registry = gateway.registry();
        let listener = gateway.bind().await.unwrap();
        let addr = listener.local_addr().unwrap();

        let (shutdown, rx) = watch::channel(false);
        let handle = tokio::spawn(gateway.serve(listener, rx));
        Self {
            addr,
            store,
            registry,
            shutdown,
            handle,
        }
    }

    pub async fn connect(&self) -> Client {
        let (client, _) = connect_async(format!("ws://{}", self.addr)).await.unwrap();
        client
    }

    pub async fn stop(self) {
        self.shutdown.send(true).unwrap();
        tokio::time::timeout(RECV_TIMEOUT, self.handle)
            .await
            .unwrap()
            .unwrap()
            .unwrap();
    }
}

pub async fn send(client: &mut Client, text: &str) {
    client.send(Message::Text(text.to_string())).await.unwrap();
}

/// Next text frame as JSON, failing after a timeout.
pub async fn recv(client: &mut Client) -> Value {
    tokio::time::timeout(RECV_TIMEOUT, next_text(client))
        .await
        .expect("timed out waiting for a frame")
}

/// Whether any text frame arrives within `window`.
pub async fn receives_within(client: &mut Client, window: Duration) -> bool {
    tokio::time::timeout(window, next_text(client)).await.is_ok()
}

async fn next_text(client: &mut Client) -> Value {
    loop {
        match client.next().await {
            Some(Ok(Message::Text(text))) => return serde_json::from_str(&text).unwrap(),
            Some(Ok(_)) => continue,
            other => panic!("connection ended: {other:?}"),
        }
    }
}

/// Poll `condition` until it holds or the timeout elapses.
pub async fn eventually(mut condition: impl FnMut() -> bool) {
    let deadline = tokio::time::Instant::now() + RECV_TIMEOUT;
    while !condition() {
        assert!(tokio::time::Instant::now() < deadline, "condition not met in time");
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}
