//! WebSocket listener and per-connection tasks.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{mpsc, watch};
use tokio_tungstenite::{accept_async, tungstenite::Message};
use tracing::{debug, info, warn};

use super::broadcast::spawn_broadcaster;
use super::handler::handle_message;
use super::protocol::{Method, Response};
use super::registry::{ClientHandle, SubscriptionRegistry};
use crate::application::QueryService;
use crate::domain::ConnectionId;
use crate::error::Result;
use crate::infrastructure::config::GatewayConfig;

/// Subscription fan-out server.
pub struct Gateway {
    config: GatewayConfig,
    registry: Arc<SubscriptionRegistry>,
    queries: QueryService,
}

impl Gateway {
    pub fn new(config: GatewayConfig, queries: QueryService) -> Self {
        Self {
            config,
            registry: Arc::new(SubscriptionRegistry::new()),
            queries,
        }
    }

    pub fn registry(&self) -> Arc<SubscriptionRegistry> {
        Arc::clone(&self.registry)
    }

    /// Bind the configured address.
    ///
    /// # Errors
    ///
    /// Returns an IO error if the address is in use or not permitted.
    pub async fn bind(&self) -> Result<TcpListener> {
        let listener = TcpListener::bind(&self.config.bind).await?;
        info!(addr = %listener.local_addr()?, "Gateway listening");
        Ok(listener)
    }

    fn period(&self, method: Method) -> Duration {
        let broadcast = &self.config.broadcast;
        Duration::from_millis(match method {
            Method::Discovery => broadcast.arbitrage_pairs_ms,
            Method::Monitor | Method::Stop => broadcast.monitor_pairs_ms,
        })
    }

    /// Accept connections and run the broadcasters until `shutdown` flips.
    pub async fn serve(self, listener: TcpListener, mut shutdown: watch::Receiver<bool>) -> Result<()> {
        let broadcasters: Vec<_> = Method::SUBSCRIBABLE
            .into_iter()
            .map(|method| {
                spawn_broadcaster(
                    method,
                    self.period(method),
                    self.registry(),
                    self.queries.clone(),
                    shutdown.clone(),
                )
            })
            .collect();

        loop {
            tokio::select! {
                accepted = listener.accept() => match accepted {
                    Ok((stream, peer)) => {
                        let registry = self.registry();
                        let queries = self.queries.clone();
                        let capacity = self.config.outbound_capacity;
                        tokio::spawn(handle_connection(stream, peer, registry, queries, capacity));
                    }
                    Err(e) => warn!(error = %e, "Accept failed"),
                },
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }

        for handle in broadcasters {
            let _ = handle.await;
        }
        info!("Gateway stopped");
        Ok(())
    }
}

async fn handle_connection(
    stream: TcpStream,
    peer: SocketAddr,
    registry: Arc<SubscriptionRegistry>,
    queries: QueryService,
    capacity: usize,
) {
    let ws = match accept_async(stream).await {
        Ok(ws) => ws,
        Err(e) => {
            debug!(%peer, error = %e, "WebSocket handshake failed");
            return;
        }
    };

    let id = ConnectionId::new();
    let (mut sink, mut source) = ws.split();
    let (tx, mut rx) = mpsc::channel::<Arc<str>>(capacity);
    let client = ClientHandle::new(id, tx);
    info!(connection = %id, %peer, "Client connected");

    let writer = tokio::spawn(async move {
        while let Some(frame) = rx.recv().await {
            if let Err(e) = sink.send(Message::Text(frame.to_string())).await {
                debug!(connection = %id, error = %e, "Write failed");
                break;
            }
        }
        let _ = sink.close().await;
    });

    while let Some(frame) = source.next().await {
        let text = match frame {
            Ok(Message::Text(text)) => text,
            Ok(Message::Binary(bytes)) => match String::from_utf8(bytes) {
                Ok(text) => text,
                Err(_) => {
                    let reply = Response::failure(None, "binary frames must be UTF-8 JSON");
                    client.deliver(reply.encode()).await;
                    continue;
                }
            },
            Ok(Message::Close(_)) => break,
            Ok(_) => continue,
            Err(e) => {
                debug!(connection = %id, error = %e, "Read failed");
                break;
            }
        };

        if let Some(reply) = handle_message(&text, &client, &registry, &queries).await {
            if !client.deliver(reply.encode()).await {
                break;
            }
        }
    }

    registry.unsubscribe(id);
    drop(client);
    let _ = writer.await;
    info!(connection = %id, "Client disconnected");
}
