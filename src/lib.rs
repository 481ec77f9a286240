// Library crate for the IAM backend and its notification relay
// This file exposes the public API for both binaries and integration tests

pub mod config;
pub mod event;
pub mod group;
pub mod relay;
pub mod routes;
pub mod shared;
pub mod task;
pub mod user;

// Re-export commonly used types for easier access in tests
pub use config::{ApiConfig, BrokerConfig, RelayConfig};
pub use event::{DomainEvent, EventPublisher, InMemoryEventPublisher, RedisEventPublisher};
pub use relay::{ConnectionRegistry, FanOutDispatcher};
pub use routes::api_router;
pub use shared::{AppError, AppState};
