//! Live connections and what each one subscribed to.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use parking_lot::RwLock;
use tokio::sync::mpsc::{self, error::TrySendError};

use super::protocol::{Method, Request};
use crate::domain::ConnectionId;

/// Result of a non-blocking delivery attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Sent,
    /// Outbound queue is at capacity; the frame was dropped for this client.
    Full,
    /// Writer task is gone.
    Closed,
}

/// Sending half of one connection's outbound queue.
#[derive(Debug, Clone)]
pub struct ClientHandle {
    id: ConnectionId,
    tx: mpsc::Sender<Arc<str>>,
}

impl ClientHandle {
    pub fn new(id: ConnectionId, tx: mpsc::Sender<Arc<str>>) -> Self {
        Self { id, tx }
    }

    pub fn id(&self) -> ConnectionId {
        self.id
    }

    pub fn is_open(&self) -> bool {
        !self.tx.is_closed()
    }

    /// Queue a frame without waiting.
    pub fn try_deliver(&self, frame: Arc<str>) -> Delivery {
        match self.tx.try_send(frame) {
            Ok(()) => Delivery::Sent,
            Err(TrySendError::Full(_)) => Delivery::Full,
            Err(TrySendError::Closed(_)) => Delivery::Closed,
        }
    }

    /// Queue a frame, waiting for room. Returns false if the writer is gone.
    pub async fn deliver(&self, frame: Arc<str>) -> bool {
        self.tx.send(frame).await.is_ok()
    }
}

struct Subscription {
    request: Request,
    client: ClientHandle,
}

/// Connections sharing one group key under a method.
#[derive(Debug, Clone)]
pub struct Group {
    pub key: String,
    /// Representative request; every member's request has the same key.
    pub request: Request,
    pub clients: Vec<ClientHandle>,
}

/// Per-method subscription table. A connection is registered under at most
/// one method at a time.
#[derive(Default)]
pub struct SubscriptionRegistry {
    by_method: RwLock<HashMap<Method, HashMap<ConnectionId, Subscription>>>,
}

impl SubscriptionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `client` for recurring delivery of `request`, replacing any
    /// earlier registration of the same connection.
    pub fn subscribe(&self, client: &ClientHandle, request: Request) {
        let method = request.method();
        let mut by_method = self.by_method.write();
        for subs in by_method.values_mut() {
            subs.remove(&client.id);
        }
        if method == Method::Stop {
            return;
        }
        by_method.entry(method).or_default().insert(
            client.id,
            Subscription {
                request,
                client: client.clone(),
            },
        );
    }

    /// Remove a connection everywhere. Returns whether it was registered.
    pub fn unsubscribe(&self, id: ConnectionId) -> bool {
        let mut by_method = self.by_method.write();
        let mut removed = false;
        for subs in by_method.values_mut() {
            removed |= subs.remove(&id).is_some();
        }
        removed
    }

    /// Subscribers of `method` partitioned by group key, in key order.
    pub fn groups(&self, method: Method) -> Vec<Group> {
        let by_method = self.by_method.read();
        let Some(subs) = by_method.get(&method) else {
            return Vec::new();
        };

        let mut groups: BTreeMap<String, Group> = BTreeMap::new();
        for sub in subs.values() {
            let key = sub.request.group_key();
            groups
                .entry(key.clone())
                .or_insert_with(|| Group {
                    key,
                    request: sub.request.clone(),
                    clients: Vec::new(),
                })
                .clients
                .push(sub.client.clone());
        }
        groups.into_values().collect()
    }

    /// Method the connection is registered under, if any.
    pub fn method_of(&self, id: ConnectionId) -> Option<Method> {
        self.by_method
            .read()
            .iter()
            .find(|(_, subs)| subs.contains_key(&id))
            .map(|(method, _)| *method)
    }

    pub fn contains(&self, id: ConnectionId) -> bool {
        self.method_of(id).is_some()
    }

    /// Registered connections across all methods.
    pub fn len(&self) -> usize {
        self.by_method.read().values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
