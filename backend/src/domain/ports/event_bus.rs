//! Port for publishing committed domain events.

use async_trait::async_trait;

use crate::domain::UserEvent;

use super::define_port_error;

define_port_error! {
    /// Errors raised by event bus adapters.
    pub enum EventBusError {
        /// The event could not be encoded for transport.
        Serialization { message: String } => "event serialization failed: {message}",
        /// The broker rejected or never received the message.
        Broker { message: String } => "event broker failed: {message}",
    }
}

/// Outbound channel for domain events.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EventBus: Send + Sync {
    /// Publish `events` in order. Stops at the first failure.
    async fn publish(&self, events: &[UserEvent]) -> Result<(), EventBusError>;
}
