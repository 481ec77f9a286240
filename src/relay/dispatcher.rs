use futures::future::join_all;
use tracing::{debug, info, instrument, warn};

use super::registry::ConnectionRegistry;
use crate::event::DomainEvent;

/// Outcome of a single fan-out
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchReport {
    pub attempted: usize,
    pub delivered: usize,
    pub failed: usize,
}

/// Pushes each event to every connection in the registry
///
/// A failed send only affects its own connection, which is dropped from the
/// registry. Nothing is ever propagated back to the caller.
#[derive(Clone)]
pub struct FanOutDispatcher {
    registry: ConnectionRegistry,
}

impl FanOutDispatcher {
    pub fn new(registry: ConnectionRegistry) -> Self {
        Self { registry }
    }

    /// Serializes the event once, sends it to a snapshot of the registry
    /// concurrently, and returns after every send has completed or failed
    #[instrument(skip(self, event), fields(kind = %event.kind()))]
    pub async fn dispatch(&self, event: &DomainEvent) -> DispatchReport {
        let message = match event.to_json() {
            Ok(message) => message,
            Err(e) => {
                warn!(error = %e, "Failed to serialize event, nothing dispatched");
                return DispatchReport::default();
            }
        };

        let targets = self.registry.snapshot().await;
        if targets.is_empty() {
            debug!("No connected clients, event not dispatched");
            return DispatchReport::default();
        }

        let sends = targets.iter().map(|connection| {
            let message = message.clone();
            async move { (connection.id(), connection.send(message).await) }
        });
        let results = join_all(sends).await;

        let mut report = DispatchReport {
            attempted: results.len(),
            ..DispatchReport::default()
        };
        for (connection_id, result) in results {
            match result {
                Ok(()) => report.delivered += 1,
                Err(e) => {
                    report.failed += 1;
                    warn!(connection_id = %connection_id, error = %e, "Send failed, dropping connection");
                    self.registry.remove(connection_id).await;
                }
            }
        }

        info!(
            attempted = report.attempted,
            delivered = report.delivered,
            failed = report.failed,
            "Event dispatched to clients"
        );
        report
    }
}
