use async_trait::async_trait;
use futures::stream::BoxStream;
use futures::StreamExt;
use tokio::sync::mpsc;
use tokio::time::timeout;
use tracing::{debug, info};

use super::error::RelayError;
use crate::config::BrokerConfig;

/// The subscribe side of the broker: a stream of raw message bodies
///
/// `next_message` must be cancel-safe, since the subscriber wraps every
/// call in a bounded wait and drops it on expiry.
#[async_trait]
pub trait MessageSource: Send {
    /// Wait for the next message body on the subscribed channel
    ///
    /// A body that is not UTF-8 is reported as `RelayError::InvalidUtf8`;
    /// the subscription itself is still usable afterwards.
    async fn next_message(&mut self) -> Result<String, RelayError>;

    /// Re-establish the subscription after a failure
    async fn resubscribe(&mut self) -> Result<(), RelayError> {
        Ok(())
    }
}

/// Redis pub/sub subscription to a single channel
pub struct RedisChannelSource {
    client: redis::Client,
    channel: String,
    messages: BoxStream<'static, redis::Msg>,
}

impl RedisChannelSource {
    /// Connects and subscribes, bounded by the configured connect timeout
    pub async fn subscribe(config: &BrokerConfig) -> Result<Self, RelayError> {
        let client = redis::Client::open(config.url.as_str())?;
        let messages = timeout(
            config.connect_timeout,
            open_subscription(&client, &config.channel),
        )
        .await
        .map_err(|_| RelayError::ConnectTimeout(config.connect_timeout))??;

        info!(channel = %config.channel, "Subscribed to broker channel");
        Ok(Self {
            client,
            channel: config.channel.clone(),
            messages,
        })
    }
}

async fn open_subscription(
    client: &redis::Client,
    channel: &str,
) -> Result<BoxStream<'static, redis::Msg>, RelayError> {
    let mut pubsub = client.get_async_pubsub().await?;
    pubsub.subscribe(channel).await?;
    Ok(pubsub.into_on_message().boxed())
}

#[async_trait]
impl MessageSource for RedisChannelSource {
    async fn next_message(&mut self) -> Result<String, RelayError> {
        let message = self.messages.next().await.ok_or(RelayError::BrokerClosed)?;
        let payload = std::str::from_utf8(message.get_payload_bytes())?;
        Ok(payload.to_string())
    }

    async fn resubscribe(&mut self) -> Result<(), RelayError> {
        self.messages = open_subscription(&self.client, &self.channel).await?;
        info!(channel = %self.channel, "Resubscribed to broker channel");
        Ok(())
    }
}

/// In-process source fed by an mpsc channel
///
/// Stands in for the broker when both ends live in one process.
pub struct ChannelMessageSource {
    receiver: mpsc::UnboundedReceiver<String>,
}

impl ChannelMessageSource {
    pub fn new(receiver: mpsc::UnboundedReceiver<String>) -> Self {
        Self { receiver }
    }

    /// Creates a connected sender/source pair
    pub fn pair() -> (mpsc::UnboundedSender<String>, Self) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (sender, Self::new(receiver))
    }
}

#[async_trait]
impl MessageSource for ChannelMessageSource {
    async fn next_message(&mut self) -> Result<String, RelayError> {
        match self.receiver.recv().await {
            Some(payload) => Ok(payload),
            None => {
                debug!("In-process message channel closed");
                Err(RelayError::BrokerClosed)
            }
        }
    }
}

#[cfg(test)]
impl RedisChannelSource {
    /// Source over canned pub/sub messages; the client never connects
    pub(crate) fn from_messages(channel: &str, messages: Vec<redis::Msg>) -> Self {
        Self {
            client: redis::Client::open("redis://127.0.0.1:1").unwrap(),
            channel: channel.to_string(),
            messages: futures::stream::iter(messages).boxed(),
        }
    }
}

#[cfg(test)]
pub(crate) fn pubsub_message(channel: &str, body: &[u8]) -> redis::Msg {
    redis::Msg::from_value(&redis::Value::Array(vec![
        redis::Value::BulkString(b"message".to_vec()),
        redis::Value::BulkString(channel.as_bytes().to_vec()),
        redis::Value::BulkString(body.to_vec()),
    ]))
    .unwrap()
}
