use async_trait::async_trait;
use axum::extract::ws::{Message, WebSocket};
use futures::stream::SplitSink;
use futures::SinkExt;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;
use uuid::Uuid;

/// Identity of a registered connection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Error)]
pub enum SocketError {
    #[error("connection closed")]
    ConnectionClosed,

    #[error("send failed: {0}")]
    SendFailed(String),
}

/// Outbound half of a client connection - all the dispatcher needs is send
#[async_trait]
pub trait ConnectionSink: Send + Sync {
    /// Send a text frame to the client
    async fn send_text(&self, message: String) -> Result<(), SocketError>;
}

/// Send half of an axum WebSocket
///
/// The read half stays with the accept loop, which uses it only to notice
/// the client going away.
pub struct WebSocketSink {
    inner: Mutex<SplitSink<WebSocket, Message>>,
}

impl WebSocketSink {
    pub fn new(sink: SplitSink<WebSocket, Message>) -> Self {
        Self {
            inner: Mutex::new(sink),
        }
    }
}

#[async_trait]
impl ConnectionSink for WebSocketSink {
    async fn send_text(&self, message: String) -> Result<(), SocketError> {
        let mut sink = self.inner.lock().await;
        sink.send(Message::Text(message))
            .await
            .map_err(|e| SocketError::SendFailed(e.to_string()))
    }
}

/// A registered connection as seen by the dispatcher
#[derive(Clone)]
pub struct Connection {
    id: ConnectionId,
    sink: Arc<dyn ConnectionSink>,
}

impl Connection {
    pub fn new(id: ConnectionId, sink: Arc<dyn ConnectionSink>) -> Self {
        Self { id, sink }
    }

    pub fn id(&self) -> ConnectionId {
        self.id
    }

    pub async fn send(&self, message: String) -> Result<(), SocketError> {
        self.sink.send_text(message).await
    }
}

impl fmt::Debug for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection").field("id", &self.id).finish()
    }
}
