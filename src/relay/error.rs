use std::time::Duration;
use thiserror::Error;

/// Errors raised inside the relay process
///
/// None of these reach a client; they are logged at the loop boundary.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("broker error: {0}")]
    Broker(#[from] redis::RedisError),

    #[error("broker stream closed")]
    BrokerClosed,

    #[error("timed out connecting to broker after {0:?}")]
    ConnectTimeout(Duration),

    #[error("message body is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),

    #[error("malformed event: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
