use std::sync::Mutex;
use tokio::sync::mpsc;

use iam_backend::event::{DomainEvent, EventPublisher};

// ============================================================================
// Mock Infrastructure
// ============================================================================

/// Publisher that stands in for the broker by forwarding the wire form of
/// each event straight into an in-process relay source
pub struct BridgePublisher {
    sender: mpsc::UnboundedSender<String>,
    channels: Mutex<Vec<String>>,
}

impl BridgePublisher {
    pub fn new(sender: mpsc::UnboundedSender<String>) -> Self {
        Self {
            sender,
            channels: Mutex::new(Vec::new()),
        }
    }

    /// Channels published to, in call order
    #[allow(dead_code)]
    pub fn channels(&self) -> Vec<String> {
        self.channels.lock().unwrap().clone()
    }
}

impl EventPublisher for BridgePublisher {
    fn publish(&self, channel: &str, event: &DomainEvent) {
        self.channels.lock().unwrap().push(channel.to_string());
        let body = event.to_json().unwrap();
        // Relay gone means the message is lost, same as a broker with no subscribers
        let _ = self.sender.send(body);
    }
}
