//! Wire envelope for published events.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Message type carried by every domain event envelope.
pub const EVENT_MESSAGE_TYPE: &str = "event";

/// JSON envelope placed on the broker for each event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub message_id: Uuid,
    pub message_type: String,
    pub data: Value,
}

impl Message {
    /// Wrap an already encoded event under a fresh message id.
    pub fn event(data: Value) -> Self {
        Self {
            message_id: Uuid::new_v4(),
            message_type: EVENT_MESSAGE_TYPE.to_owned(),
            data,
        }
    }
}
