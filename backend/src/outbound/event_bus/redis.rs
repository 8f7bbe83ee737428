//! Redis pub/sub broker.
//!
//! Messages go out with `PUBLISH`; delivery is at most once and only to
//! subscribers connected at the time.

use async_trait::async_trait;
use bb8_redis::RedisConnectionManager;
use bb8_redis::bb8::Pool;
use bb8_redis::redis::AsyncCommands;
use tracing::debug;

use super::broker::{BrokerError, MessageBroker};

/// [`MessageBroker`] publishing through a pooled Redis connection.
#[derive(Clone)]
pub struct RedisMessageBroker {
    pool: Pool<RedisConnectionManager>,
}

impl RedisMessageBroker {
    /// Build a pool of at most `max_size` connections to `redis_url`.
    ///
    /// # Errors
    ///
    /// Returns [`BrokerError::Connection`] when the URL is invalid or the
    /// first connection cannot be opened.
    pub async fn connect(redis_url: &str, max_size: u32) -> Result<Self, BrokerError> {
        let manager = RedisConnectionManager::new(redis_url)
            .map_err(|err| BrokerError::connection(err.to_string()))?;
        let pool = Pool::builder()
            .max_size(max_size)
            .build(manager)
            .await
            .map_err(|err| BrokerError::connection(err.to_string()))?;
        Ok(Self { pool })
    }
}

#[async_trait]
impl MessageBroker for RedisMessageBroker {
    async fn publish(&self, channel: &str, payload: &str) -> Result<(), BrokerError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| BrokerError::connection(err.to_string()))?;
        let receivers: i64 = conn
            .publish(channel, payload)
            .await
            .map_err(|err| BrokerError::publish(err.to_string()))?;
        debug!(channel, receivers, "redis publish");
        Ok(())
    }
}
