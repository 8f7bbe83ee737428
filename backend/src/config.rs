//! Service configuration loaded via OrthoConfig.
//!
//! Values come from `USER_SERVICE_*` environment variables, configuration
//! files and command-line flags. Defaults are declared on the fields and the
//! accessors validate.

use std::net::SocketAddr;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::outbound::event_bus::DEFAULT_EXCHANGE;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_POOL_MAX_SIZE: u32 = 10;

/// Errors raised when configured values are unusable.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid bind address `{value}`: {source}")]
    InvalidBindAddr {
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },
    #[error("pool_max_size must be at least 1")]
    EmptyPool,
}

/// Runtime settings for the user service.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "USER_SERVICE")]
pub struct ServiceSettings {
    /// PostgreSQL connection URL. Without it users are kept in memory.
    pub database_url: Option<String>,
    /// Redis connection URL. Without it events stay in process.
    pub redis_url: Option<String>,
    /// Socket address the HTTP server listens on.
    #[ortho_config(default = String::from(DEFAULT_BIND_ADDR))]
    pub bind_addr: String,
    /// Maximum pooled connections per backing service.
    #[ortho_config(default = DEFAULT_POOL_MAX_SIZE)]
    pub pool_max_size: u32,
    /// Exchange prefixing every event channel.
    #[ortho_config(default = String::from(DEFAULT_EXCHANGE))]
    pub event_exchange: String,
}

impl ServiceSettings {
    /// Parsed listen address.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBindAddr`] when the value is not a socket
    /// address.
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.bind_addr
            .parse()
            .map_err(|source| ConfigError::InvalidBindAddr {
                value: self.bind_addr.clone(),
                source,
            })
    }

    /// Validated pool size.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyPool`] for zero.
    pub fn pool_max_size(&self) -> Result<u32, ConfigError> {
        match self.pool_max_size {
            0 => Err(ConfigError::EmptyPool),
            size => Ok(size),
        }
    }

    pub fn event_exchange(&self) -> &str {
        &self.event_exchange
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for configuration parsing.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const VARS: [&str; 5] = [
        "USER_SERVICE_DATABASE_URL",
        "USER_SERVICE_REDIS_URL",
        "USER_SERVICE_BIND_ADDR",
        "USER_SERVICE_POOL_MAX_SIZE",
        "USER_SERVICE_EVENT_EXCHANGE",
    ];

    fn load_from_empty_args() -> ServiceSettings {
        ServiceSettings::load_from_iter([OsString::from("user-service")])
            .expect("config should load")
    }

    #[rstest]
    fn defaults_apply_when_unset() {
        let _guard = lock_env(VARS.map(|name| (name, None::<String>)));

        let settings = load_from_empty_args();
        assert!(settings.database_url.is_none());
        assert!(settings.redis_url.is_none());
        assert_eq!(
            settings.bind_addr().expect("default address"),
            SocketAddr::from(([0, 0, 0, 0], 8080))
        );
        assert_eq!(settings.pool_max_size().expect("default size"), 10);
        assert_eq!(settings.event_exchange(), "user_service.user");
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            (
                "USER_SERVICE_DATABASE_URL",
                Some("postgres://localhost/users".to_owned()),
            ),
            ("USER_SERVICE_REDIS_URL", Some("redis://localhost".to_owned())),
            ("USER_SERVICE_BIND_ADDR", Some("127.0.0.1:9000".to_owned())),
            ("USER_SERVICE_POOL_MAX_SIZE", Some("4".to_owned())),
            ("USER_SERVICE_EVENT_EXCHANGE", Some("accounts".to_owned())),
        ]);

        let settings = load_from_empty_args();
        assert_eq!(
            settings.database_url.as_deref(),
            Some("postgres://localhost/users")
        );
        assert_eq!(settings.redis_url.as_deref(), Some("redis://localhost"));
        assert_eq!(
            settings.bind_addr().expect("valid address"),
            SocketAddr::from(([127, 0, 0, 1], 9000))
        );
        assert_eq!(settings.pool_max_size().expect("valid size"), 4);
        assert_eq!(settings.event_exchange(), "accounts");
    }

    fn settings(bind_addr: &str, pool_max_size: u32) -> ServiceSettings {
        ServiceSettings {
            database_url: None,
            redis_url: None,
            bind_addr: bind_addr.to_owned(),
            pool_max_size,
            event_exchange: DEFAULT_EXCHANGE.to_owned(),
        }
    }

    #[rstest]
    fn unparsable_bind_address_is_rejected() {
        let err = settings("not an address", 4)
            .bind_addr()
            .expect_err("invalid address");
        assert!(
            matches!(err, ConfigError::InvalidBindAddr { ref value, .. } if value == "not an address")
        );
    }

    #[rstest]
    fn empty_pool_is_rejected() {
        let config = settings(DEFAULT_BIND_ADDR, 0);
        assert!(config.bind_addr().is_ok());
        assert!(matches!(
            config.pool_max_size(),
            Err(ConfigError::EmptyPool)
        ));
    }
}
