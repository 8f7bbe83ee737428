//! Transport seam between the event bus and a concrete broker.

use async_trait::async_trait;

/// Errors raised by message brokers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BrokerError {
    /// The broker could not be reached.
    #[error("broker connection failed: {message}")]
    Connection { message: String },

    /// The broker refused the message.
    #[error("broker publish failed: {message}")]
    Publish { message: String },
}

impl BrokerError {
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    pub fn publish(message: impl Into<String>) -> Self {
        Self::Publish {
            message: message.into(),
        }
    }
}

/// Fire-and-forget publisher of encoded messages.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessageBroker: Send + Sync {
    /// Publish `payload` on `channel`.
    async fn publish(&self, channel: &str, payload: &str) -> Result<(), BrokerError>;
}
