use redis::AsyncCommands;
use std::sync::Mutex;
use tokio::sync::mpsc;
use tokio::time::timeout;
use tracing::{debug, error, info, warn};

use super::events::DomainEvent;
use crate::config::BrokerConfig;

/// Publishes domain events to a named broker channel
///
/// Publishing is fire-and-forget: implementations must not block the caller
/// on delivery and must never surface a failure. A CRUD mutation that has
/// succeeded stays successful even when its notification is lost.
pub trait EventPublisher: Send + Sync {
    fn publish(&self, channel: &str, event: &DomainEvent);
}

struct OutboundMessage {
    channel: String,
    payload: String,
}

/// Redis-backed publisher
///
/// The broker connection is attempted exactly once, when the publisher is
/// created. If that attempt fails the publisher stays disabled for the
/// life of the process and every publish is a silent no-op.
pub struct RedisEventPublisher {
    outbound: Option<mpsc::UnboundedSender<OutboundMessage>>,
}

impl RedisEventPublisher {
    pub async fn connect(config: &BrokerConfig) -> Self {
        match timeout(config.connect_timeout, open_connection(&config.url)).await {
            Ok(Ok(connection)) => {
                info!(url = %config.url, "Broker connection established for publishing");
                let (sender, receiver) = mpsc::unbounded_channel();
                tokio::spawn(forward_messages(connection, receiver));
                Self {
                    outbound: Some(sender),
                }
            }
            Ok(Err(e)) => {
                error!(url = %config.url, error = %e, "Failed to connect to broker, notifications disabled");
                Self::disabled()
            }
            Err(_) => {
                error!(
                    url = %config.url,
                    timeout_secs = config.connect_timeout.as_secs(),
                    "Timed out connecting to broker, notifications disabled"
                );
                Self::disabled()
            }
        }
    }

    /// A publisher that drops every event
    pub fn disabled() -> Self {
        Self { outbound: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.outbound.is_some()
    }
}

impl EventPublisher for RedisEventPublisher {
    fn publish(&self, channel: &str, event: &DomainEvent) {
        let Some(outbound) = &self.outbound else {
            debug!(channel = %channel, kind = %event.kind(), "Broker unavailable, event not published");
            return;
        };

        let payload = match event.to_json() {
            Ok(payload) => payload,
            Err(e) => {
                warn!(kind = %event.kind(), error = %e, "Failed to serialize event for publishing");
                return;
            }
        };

        let message = OutboundMessage {
            channel: channel.to_string(),
            payload,
        };
        if outbound.send(message).is_err() {
            warn!(channel = %channel, kind = %event.kind(), "Publisher task stopped, event dropped");
        }
    }
}

async fn open_connection(url: &str) -> redis::RedisResult<redis::aio::MultiplexedConnection> {
    let client = redis::Client::open(url)?;
    let mut connection = client.get_multiplexed_async_connection().await?;
    let pong: String = redis::cmd("PING").query_async(&mut connection).await?;
    debug!(reply = %pong, "Broker answered PING");
    Ok(connection)
}

/// Owns the broker connection and publishes queued messages in submission order
async fn forward_messages(
    mut connection: redis::aio::MultiplexedConnection,
    mut receiver: mpsc::UnboundedReceiver<OutboundMessage>,
) {
    while let Some(message) = receiver.recv().await {
        let result: redis::RedisResult<i64> = connection
            .publish(&message.channel, &message.payload)
            .await;
        match result {
            Ok(receivers) => {
                debug!(channel = %message.channel, receivers = receivers, "Event published");
            }
            Err(e) => {
                warn!(channel = %message.channel, error = %e, "Failed to publish event");
            }
        }
    }
    debug!("Publisher queue closed");
}

/// Records published events in memory, for development and testing
#[derive(Default)]
pub struct InMemoryEventPublisher {
    published: Mutex<Vec<(String, DomainEvent)>>,
}

impl InMemoryEventPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    /// All `(channel, event)` pairs published so far, oldest first
    pub fn published(&self) -> Vec<(String, DomainEvent)> {
        self.published
            .lock()
            .map(|published| published.clone())
            .unwrap_or_default()
    }
}

impl EventPublisher for InMemoryEventPublisher {
    fn publish(&self, channel: &str, event: &DomainEvent) {
        match self.published.lock() {
            Ok(mut published) => published.push((channel.to_string(), event.clone())),
            Err(_) => warn!("In-memory publisher lock poisoned, event dropped"),
        }
    }
}
