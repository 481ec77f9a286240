use std::time::Duration;
use tokio::time::{sleep, timeout};
use tracing::{debug, error, info, warn};

use super::dispatcher::{DispatchReport, FanOutDispatcher};
use super::error::RelayError;
use super::source::MessageSource;
use crate::config::RelayConfig;
use crate::event::DomainEvent;

/// What one turn of the polling loop did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    /// The bounded wait expired with no message
    Idle,
    /// A message was decoded and fanned out
    Dispatched(DispatchReport),
    /// A message arrived but could not be decoded
    Dropped,
}

/// Long-running consumer of the broker channel
///
/// Receives one message at a time and dispatches it before polling again,
/// so events reach each connection in the order they were published.
pub struct ChannelSubscriber {
    source: Box<dyn MessageSource>,
    dispatcher: FanOutDispatcher,
    poll_timeout: Duration,
    error_backoff: Duration,
}

impl ChannelSubscriber {
    pub fn new(source: Box<dyn MessageSource>, dispatcher: FanOutDispatcher) -> Self {
        let defaults = RelayConfig::default();
        Self {
            source,
            dispatcher,
            poll_timeout: defaults.poll_timeout,
            error_backoff: defaults.error_backoff,
        }
    }

    pub fn with_poll_timeout(mut self, poll_timeout: Duration) -> Self {
        self.poll_timeout = poll_timeout;
        self
    }

    pub fn with_error_backoff(mut self, error_backoff: Duration) -> Self {
        self.error_backoff = error_backoff;
        self
    }

    /// Poll forever; errors are logged and followed by a fixed backoff
    pub async fn run(mut self) {
        info!(
            poll_timeout_ms = self.poll_timeout.as_millis() as u64,
            backoff_secs = self.error_backoff.as_secs(),
            "Channel subscriber started"
        );

        loop {
            if let Err(e) = self.poll_once().await {
                error!(error = %e, backoff_secs = self.error_backoff.as_secs(), "Error in subscriber loop, backing off");
                sleep(self.error_backoff).await;

                if let Err(e) = self.source.resubscribe().await {
                    warn!(error = %e, "Resubscribe failed, will retry after next error");
                }
            }
        }
    }

    /// One turn of the loop: a bounded wait, then decode and dispatch
    ///
    /// Only broker-level failures are returned. A timeout is the normal idle
    /// case and a malformed body is dropped after logging.
    pub async fn poll_once(&mut self) -> Result<PollOutcome, RelayError> {
        let payload = match timeout(self.poll_timeout, self.source.next_message()).await {
            Err(_) => return Ok(PollOutcome::Idle),
            Ok(Err(RelayError::InvalidUtf8(e))) => {
                warn!(error = %e, "Dropping broker message with non UTF-8 body");
                return Ok(PollOutcome::Dropped);
            }
            Ok(result) => result?,
        };

        let event = match DomainEvent::from_json(&payload) {
            Ok(event) => event,
            Err(e) => {
                warn!(error = %e, payload = %payload, "Dropping malformed broker message");
                return Ok(PollOutcome::Dropped);
            }
        };

        debug!(kind = %event.kind(), "Received event from broker");
        let report = self.dispatcher.dispatch(&event).await;
        Ok(PollOutcome::Dispatched(report))
    }
}
