// Domain events and the publishing side of the notification pipeline
//
// CRUD handlers build a DomainEvent after a successful mutation and hand it
// to an EventPublisher. The relay process consumes the same wire form.

pub use events::{DomainEvent, GROUP_CREATED};
pub use publisher::{EventPublisher, InMemoryEventPublisher, RedisEventPublisher};

mod events;
mod publisher;
