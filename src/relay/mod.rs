// Notification relay: broker subscriber, connection registry, fan-out
// dispatcher and the process lifecycle that ties them together.
//
// Runs as its own process and shares nothing with the CRUD API except the
// broker channel.

pub use connection::{Connection, ConnectionId, ConnectionSink, SocketError, WebSocketSink};
pub use dispatcher::{DispatchReport, FanOutDispatcher};
pub use error::RelayError;
pub use registry::ConnectionRegistry;
pub use server::{relay_router, run};
pub use source::{ChannelMessageSource, MessageSource, RedisChannelSource};
pub use subscriber::{ChannelSubscriber, PollOutcome};

mod connection;
mod dispatcher;
mod error;
mod registry;
pub mod server;
mod source;
mod subscriber;

#[cfg(test)]
pub mod test_utils {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Sink that keeps everything sent to it
    #[derive(Default)]
    pub struct RecordingSink {
        messages: Mutex<Vec<String>>,
    }

    impl RecordingSink {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn messages(&self) -> Vec<String> {
            self.messages.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ConnectionSink for RecordingSink {
        async fn send_text(&self, message: String) -> Result<(), SocketError> {
            self.messages.lock().unwrap().push(message);
            Ok(())
        }
    }

    /// Sink whose peer has already gone away
    pub struct FailingSink;

    #[async_trait]
    impl ConnectionSink for FailingSink {
        async fn send_text(&self, _message: String) -> Result<(), SocketError> {
            Err(SocketError::ConnectionClosed)
        }
    }
}
