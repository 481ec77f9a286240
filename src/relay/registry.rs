use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

use super::connection::{Connection, ConnectionId, ConnectionSink};

/// The set of live client connections
///
/// Created once by the relay and shared (cheap clone) with the accept loop,
/// which inserts and removes, and the dispatcher, which snapshots and drops
/// connections whose sends fail. Membership is best-effort liveness: a
/// connection may linger until its closure is observed, but never after a
/// detected failure.
#[derive(Clone, Default)]
pub struct ConnectionRegistry {
    connections: Arc<RwLock<HashMap<ConnectionId, Arc<dyn ConnectionSink>>>>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a connection and returns its identity
    pub async fn register(&self, sink: Arc<dyn ConnectionSink>) -> ConnectionId {
        let id = ConnectionId::new();
        let mut connections = self.connections.write().await;
        connections.insert(id, sink);
        debug!(connection_id = %id, active = connections.len(), "Connection registered");
        id
    }

    /// Removes a connection, returning whether it was still present
    pub async fn remove(&self, id: ConnectionId) -> bool {
        let mut connections = self.connections.write().await;
        let removed = connections.remove(&id).is_some();
        if removed {
            debug!(connection_id = %id, active = connections.len(), "Connection removed");
        }
        removed
    }

    /// Copies the current membership
    ///
    /// The lock is released before returning, so fan-out over the snapshot
    /// never holds it across a send and tolerates concurrent register/remove.
    pub async fn snapshot(&self) -> Vec<Connection> {
        let connections = self.connections.read().await;
        connections
            .iter()
            .map(|(id, sink)| Connection::new(*id, Arc::clone(sink)))
            .collect()
    }

    pub async fn contains(&self, id: ConnectionId) -> bool {
        self.connections.read().await.contains_key(&id)
    }

    pub async fn len(&self) -> usize {
        self.connections.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.connections.read().await.is_empty()
    }
}
