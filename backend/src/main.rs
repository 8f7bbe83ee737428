//! User service entry point: loads settings, prepares storage and the event
//! bus, then serves the HTTP API.

use std::sync::Arc;

use actix_web::web;
use color_eyre::eyre::{Result, eyre};
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use user_service::config::ServiceSettings;
use user_service::context::{AppContext, UserStore};
use user_service::domain::ports::EventBus;
use user_service::inbound::http::health::HealthState;
use user_service::outbound::event_bus::{
    BrokerEventBus, InMemoryMessageBroker, RedisMessageBroker,
};
use user_service::outbound::memory::InMemoryUserStore;
use user_service::outbound::persistence::{DbPool, PoolConfig, run_migrations};
use user_service::server::create_server;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if let Err(e) = fmt().with_env_filter(filter).json().try_init() {
        warn!(error = %e, "tracing init failed");
    }
}

async fn build_store(settings: &ServiceSettings) -> Result<UserStore> {
    let Some(database_url) = settings.database_url.as_deref() else {
        warn!("no database configured; users are kept in memory");
        return Ok(UserStore::Memory(InMemoryUserStore::new()));
    };

    run_migrations(database_url).await?;
    let config = PoolConfig::new(database_url).with_max_size(settings.pool_max_size()?);
    let pool = DbPool::new(config).await?;
    info!("database pool ready");
    Ok(UserStore::Postgres(pool))
}

async fn build_event_bus(settings: &ServiceSettings) -> Result<Arc<dyn EventBus>> {
    let exchange = settings.event_exchange();
    match settings.redis_url.as_deref() {
        Some(redis_url) => {
            let broker = RedisMessageBroker::connect(redis_url, settings.pool_max_size()?).await?;
            info!(exchange, "publishing events to redis");
            Ok(Arc::new(BrokerEventBus::new(broker, exchange)))
        }
        None => {
            warn!(exchange, "no redis configured; events stay in process");
            Ok(Arc::new(BrokerEventBus::new(
                InMemoryMessageBroker::new(),
                exchange,
            )))
        }
    }
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    init_tracing();

    let settings = ServiceSettings::load()
        .map_err(|err| eyre!("failed to load configuration: {err}"))?;
    let bind_addr = settings.bind_addr()?;

    let store = build_store(&settings).await?;
    let event_bus = build_event_bus(&settings).await?;
    let context = AppContext::new(store, event_bus);

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state.clone(), context, bind_addr)?;
    info!(%bind_addr, "user service listening");

    server.await?;
    health_state.mark_unhealthy();
    Ok(())
}
