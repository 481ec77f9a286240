use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::group::GroupResponse;

/// Kind tag for a newly created group
pub const GROUP_CREATED: &str = "GROUP_CREATED";

/// A state change of interest to external observers
///
/// Events are immutable once constructed. On the wire (broker channel and
/// WebSocket clients alike) they look like `{"type": <kind>, "payload": <value>}`.
/// There is no version field, so publishers and the relay must agree on
/// the payload shape for each kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainEvent {
    #[serde(rename = "type")]
    kind: String,
    payload: Value,
}

impl DomainEvent {
    pub fn new(kind: impl Into<String>, payload: Value) -> Self {
        Self {
            kind: kind.into(),
            payload,
        }
    }

    /// Event announcing a group that has just been stored
    pub fn group_created(group: &GroupResponse) -> Result<Self, serde_json::Error> {
        Ok(Self::new(GROUP_CREATED, serde_json::to_value(group)?))
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn payload(&self) -> &Value {
        &self.payload
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }
}
