pub mod mocks;
pub mod setup;

// Re-export main utilities for use by test files
#[allow(unused_imports)]
pub use mocks::BridgePublisher;
#[allow(unused_imports)]
pub use setup::{api_state, TestClient, TestRelay, TestRelayBuilder, WAIT};
