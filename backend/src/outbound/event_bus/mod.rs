//! Event bus adapters.
//!
//! [`BrokerEventBus`] implements the domain [`EventBus`] port on top of a
//! [`MessageBroker`]. Redis is the production broker; the in-memory broker
//! serves local runs and tests.
//!
//! [`EventBus`]: crate::domain::ports::EventBus

mod broker;
mod broker_event_bus;
mod in_memory;
mod message;
mod redis;

pub use broker::{BrokerError, MessageBroker};
pub use broker_event_bus::{BrokerEventBus, DEFAULT_EXCHANGE};
pub use in_memory::{InMemoryMessageBroker, PublishedMessage};
pub use message::{EVENT_MESSAGE_TYPE, Message};
pub use redis::RedisMessageBroker;
