use futures::{SinkExt, StreamExt};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::{connect_async, tungstenite::Message, MaybeTlsStream, WebSocketStream};

use iam_backend::{
    config::DEFAULT_CHANNEL,
    event::{DomainEvent, EventPublisher},
    group::{repository::InMemoryGroupRepository, GroupService},
    relay::{relay_router, ChannelMessageSource, ChannelSubscriber, ConnectionRegistry, FanOutDispatcher},
    shared::AppState,
    task::{repository::InMemoryTaskRepository, TaskService},
    user::{repository::InMemoryUserRepository, UserService},
};

use super::mocks::BridgePublisher;

/// Upper bound for anything the tests wait on
pub const WAIT: Duration = Duration::from_secs(2);

// ============================================================================
// Test Setup Infrastructure
// ============================================================================

/// A relay bound to an ephemeral port, fed through an in-process channel
pub struct TestRelay {
    pub addr: SocketAddr,
    pub registry: ConnectionRegistry,
    sender: mpsc::UnboundedSender<String>,
    server_handle: JoinHandle<()>,
    subscriber_handle: JoinHandle<()>,
}

pub struct TestRelayBuilder {
    poll_timeout: Duration,
    error_backoff: Duration,
}

impl TestRelayBuilder {
    pub fn new() -> Self {
        Self {
            poll_timeout: Duration::from_millis(50),
            error_backoff: Duration::from_millis(50),
        }
    }

    #[allow(dead_code)]
    pub fn with_poll_timeout(mut self, poll_timeout: Duration) -> Self {
        self.poll_timeout = poll_timeout;
        self
    }

    pub async fn build(self) -> TestRelay {
        let registry = ConnectionRegistry::new();
        let dispatcher = FanOutDispatcher::new(registry.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let router = relay_router(registry.clone());
        let server_handle = tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        let (sender, source) = ChannelMessageSource::pair();
        let subscriber = ChannelSubscriber::new(Box::new(source), dispatcher)
            .with_poll_timeout(self.poll_timeout)
            .with_error_backoff(self.error_backoff);
        let subscriber_handle = tokio::spawn(subscriber.run());

        TestRelay {
            addr,
            registry,
            sender,
            server_handle,
            subscriber_handle,
        }
    }
}

impl TestRelay {
    /// Publishes the wire form of an event as the broker would deliver it
    pub fn publish(&self, event: &DomainEvent) {
        self.publish_raw(&event.to_json().unwrap());
    }

    pub fn publish_raw(&self, body: &str) {
        self.sender.send(body.to_string()).unwrap();
    }

    /// Publisher for an API state that feeds this relay
    #[allow(dead_code)]
    pub fn bridge_publisher(&self) -> Arc<BridgePublisher> {
        Arc::new(BridgePublisher::new(self.sender.clone()))
    }

    /// Opens a client and waits until the relay has registered it
    pub async fn connect(&self) -> TestClient {
        let expected = self.registry.len().await + 1;
        let (stream, _) = connect_async(format!("ws://{}/", self.addr))
            .await
            .unwrap();
        self.wait_for_connections(expected).await;
        TestClient { stream }
    }

    pub async fn wait_for_connections(&self, expected: usize) {
        tokio::time::timeout(WAIT, async {
            while self.registry.len().await != expected {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .unwrap_or_else(|_| panic!("relay never reached {} connections", expected));
    }
}

impl Drop for TestRelay {
    fn drop(&mut self) {
        self.server_handle.abort();
        self.subscriber_handle.abort();
    }
}

/// A WebSocket client connected to a TestRelay
pub struct TestClient {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl TestClient {
    /// Next text frame, or None if nothing arrives in time
    pub async fn next_text_within(&mut self, wait: Duration) -> Option<String> {
        let deadline = tokio::time::Instant::now() + wait;
        loop {
            let frame = tokio::time::timeout_at(deadline, self.stream.next())
                .await
                .ok()??;
            match frame.unwrap() {
                Message::Text(text) => return Some(text),
                Message::Close(_) => return None,
                _ => continue,
            }
        }
    }

    pub async fn next_text(&mut self) -> String {
        self.next_text_within(WAIT)
            .await
            .expect("no message received from relay")
    }

    pub async fn expect_silence(&mut self, wait: Duration) {
        if let Some(text) = self.next_text_within(wait).await {
            panic!("unexpected message from relay: {}", text);
        }
    }

    /// Sends a close frame and lets the relay observe it
    pub async fn close(mut self) {
        self.stream.close(None).await.unwrap();
        while let Some(Ok(_)) = self.stream.next().await {}
    }

    #[allow(dead_code)]
    pub async fn send_text(&mut self, text: &str) {
        self.stream.send(Message::Text(text.to_string())).await.unwrap();
    }
}

/// API state backed by in-memory repositories and the given publisher
#[allow(dead_code)]
pub fn api_state(publisher: Arc<dyn EventPublisher>) -> AppState {
    AppState::new(
        Arc::new(GroupService::new(
            Arc::new(InMemoryGroupRepository::new()),
            publisher,
            DEFAULT_CHANNEL,
        )),
        Arc::new(UserService::new(Arc::new(InMemoryUserRepository::new()))),
        Arc::new(TaskService::new(Arc::new(InMemoryTaskRepository::new()))),
    )
}
