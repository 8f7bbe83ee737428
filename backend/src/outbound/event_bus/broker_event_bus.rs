//! `EventBus` adapter that forwards domain events to a [`MessageBroker`].
//!
//! Each event becomes one [`Message`] published on
//! `<exchange>.<event name>`, for example `user_service.user.UserCreated`.

use async_trait::async_trait;
use tracing::debug;

use crate::domain::UserEvent;
use crate::domain::ports::{EventBus, EventBusError};

use super::broker::MessageBroker;
use super::message::Message;

/// Exchange used when none is configured.
pub const DEFAULT_EXCHANGE: &str = "user_service.user";

/// Publishes user events through a broker.
pub struct BrokerEventBus<B> {
    broker: B,
    exchange: String,
}

impl<B: MessageBroker> BrokerEventBus<B> {
    pub fn new(broker: B, exchange: impl Into<String>) -> Self {
        Self {
            broker,
            exchange: exchange.into(),
        }
    }

    /// Broker channel for `event`.
    pub fn channel_for(&self, event: &UserEvent) -> String {
        format!("{}.{}", self.exchange, event.name())
    }
}

fn encode(event: &UserEvent) -> Result<String, EventBusError> {
    let data = serde_json::to_value(event)
        .map_err(|err| EventBusError::serialization(err.to_string()))?;
    serde_json::to_string(&Message::event(data))
        .map_err(|err| EventBusError::serialization(err.to_string()))
}

#[async_trait]
impl<B: MessageBroker> EventBus for BrokerEventBus<B> {
    async fn publish(&self, events: &[UserEvent]) -> Result<(), EventBusError> {
        for event in events {
            let channel = self.channel_for(event);
            let payload = encode(event)?;
            self.broker
                .publish(&channel, &payload)
                .await
                .map_err(|err| EventBusError::broker(err.to_string()))?;
            debug!(%channel, user_id = %event.user_id(), "event published");
        }
        Ok(())
    }
}
