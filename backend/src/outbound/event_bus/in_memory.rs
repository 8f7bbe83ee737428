//! In-process broker for development and tests.
//!
//! Only the most recent [`HISTORY_LIMIT`] messages are kept for inspection;
//! older ones are dropped as new messages arrive.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, broadcast};
use tracing::debug;

use super::broker::{BrokerError, MessageBroker};
use super::message::Message;

const CHANNEL_CAPACITY: usize = 256;

/// Number of published messages retained by [`InMemoryMessageBroker`].
pub const HISTORY_LIMIT: usize = 1024;

/// One message as handed to the broker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedMessage {
    pub channel: String,
    pub payload: String,
}

impl PublishedMessage {
    /// Decode the payload envelope.
    ///
    /// # Errors
    ///
    /// Returns the JSON error when the payload is not a [`Message`].
    pub fn message(&self) -> Result<Message, serde_json::Error> {
        serde_json::from_str(&self.payload)
    }
}

/// Keeps recent messages and fans each one out to live subscribers.
#[derive(Clone)]
pub struct InMemoryMessageBroker {
    published: Arc<Mutex<VecDeque<PublishedMessage>>>,
    sender: broadcast::Sender<PublishedMessage>,
}

impl Default for InMemoryMessageBroker {
    fn default() -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self {
            published: Arc::default(),
            sender,
        }
    }
}

impl InMemoryMessageBroker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Receive messages published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<PublishedMessage> {
        self.sender.subscribe()
    }

    /// Retained messages, oldest first.
    pub async fn published(&self) -> Vec<PublishedMessage> {
        self.published.lock().await.iter().cloned().collect()
    }
}

#[async_trait]
impl MessageBroker for InMemoryMessageBroker {
    async fn publish(&self, channel: &str, payload: &str) -> Result<(), BrokerError> {
        let message = PublishedMessage {
            channel: channel.to_owned(),
            payload: payload.to_owned(),
        };
        {
            let mut published = self.published.lock().await;
            if published.len() == HISTORY_LIMIT {
                published.pop_front();
            }
            published.push_back(message.clone());
        }
        match self.sender.send(message) {
            Ok(receivers) => debug!(channel, receivers, "message broadcast"),
            Err(_) => debug!(channel, "message published with no subscribers"),
        }
        Ok(())
    }
}
