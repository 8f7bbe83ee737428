//! Application and request contexts.
//!
//! [`AppContext`] lives for the whole process and owns the long-lived
//! resources: the user store (a PostgreSQL pool or the in-memory store) and
//! the event bus. Each request calls [`AppContext::begin_request`] to obtain a
//! [`RequestContext`], which binds a reader, repository and unit of work to a
//! single transaction and hands out the query and command handlers.

use std::sync::Arc;

use tracing::warn;

use crate::domain::ports::{EventBus, UnitOfWork, UserReader, UserRepository};
use crate::domain::{
    Error, GetUserByIdHandler, GetUserByUsernameHandler, GetUsersHandler, UserCommandHandler,
};
use crate::outbound::event_bus::{BrokerEventBus, DEFAULT_EXCHANGE, InMemoryMessageBroker};
use crate::outbound::memory::{
    InMemoryUnitOfWork, InMemoryUserReader, InMemoryUserRepository, InMemoryUserStore,
};
use crate::outbound::persistence::{
    DbPool, DieselSession, DieselUnitOfWork, DieselUserReader, DieselUserRepository,
};

/// Backing store for users.
#[derive(Clone)]
pub enum UserStore {
    /// PostgreSQL through a Diesel connection pool.
    Postgres(DbPool),
    /// Process-local store; data is lost on exit.
    Memory(InMemoryUserStore),
}

/// Process-wide dependencies shared by every request.
#[derive(Clone)]
pub struct AppContext {
    store: UserStore,
    event_bus: Arc<dyn EventBus>,
}

impl AppContext {
    pub fn new(store: UserStore, event_bus: Arc<dyn EventBus>) -> Self {
        Self { store, event_bus }
    }

    /// Fully in-process context: in-memory store and broker.
    pub fn in_memory() -> Self {
        Self::new(
            UserStore::Memory(InMemoryUserStore::new()),
            Arc::new(BrokerEventBus::new(
                InMemoryMessageBroker::new(),
                DEFAULT_EXCHANGE,
            )),
        )
    }

    /// Open the transaction for one request.
    ///
    /// # Errors
    ///
    /// Returns a `service_unavailable` error when no connection can be checked
    /// out and an `internal_error` when the transaction cannot begin.
    pub async fn begin_request(&self) -> Result<RequestContext, Error> {
        let ports = match &self.store {
            UserStore::Postgres(pool) => {
                let session = DieselSession::begin(pool).await?;
                RequestPorts {
                    reader: Arc::new(DieselUserReader::new(session.clone())),
                    repository: Arc::new(DieselUserRepository::new(session.clone())),
                    unit_of_work: Arc::new(DieselUnitOfWork::new(session)),
                }
            }
            UserStore::Memory(store) => {
                let session = store.begin().await;
                RequestPorts {
                    reader: Arc::new(InMemoryUserReader::new(session.clone())),
                    repository: Arc::new(InMemoryUserRepository::new(session.clone())),
                    unit_of_work: Arc::new(InMemoryUnitOfWork::new(session)),
                }
            }
        };

        Ok(RequestContext {
            ports,
            event_bus: Arc::clone(&self.event_bus),
        })
    }
}

struct RequestPorts {
    reader: Arc<dyn UserReader>,
    repository: Arc<dyn UserRepository>,
    unit_of_work: Arc<dyn UnitOfWork>,
}

/// Ports bound to one request's transaction.
pub struct RequestContext {
    ports: RequestPorts,
    event_bus: Arc<dyn EventBus>,
}

impl RequestContext {
    pub fn reader(&self) -> Arc<dyn UserReader> {
        Arc::clone(&self.ports.reader)
    }

    pub fn get_user_by_id(&self) -> GetUserByIdHandler<dyn UserReader> {
        GetUserByIdHandler::new(self.reader())
    }

    pub fn get_user_by_username(&self) -> GetUserByUsernameHandler<dyn UserReader> {
        GetUserByUsernameHandler::new(self.reader())
    }

    pub fn get_users(&self) -> GetUsersHandler<dyn UserReader> {
        GetUsersHandler::new(self.reader())
    }

    /// Handler for every user command, committing through this request.
    pub fn commands(&self) -> UserCommandHandler {
        UserCommandHandler::new(
            Arc::clone(&self.ports.repository),
            Arc::clone(&self.ports.unit_of_work),
            Arc::clone(&self.event_bus),
        )
    }

    /// End the request, rolling back anything not already committed.
    pub async fn close(self) {
        if let Err(err) = self.ports.unit_of_work.rollback().await {
            warn!(error = %err, "closing request transaction failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        CommandHandler, CreateUser, ErrorCode, GetUserByUsername, QueryHandler, UpdateUsername,
        Username,
    };
    use crate::outbound::event_bus::EVENT_MESSAGE_TYPE;
    use rstest::{fixture, rstest};

    struct Harness {
        context: AppContext,
        broker: InMemoryMessageBroker,
    }

    #[fixture]
    fn harness() -> Harness {
        let broker = InMemoryMessageBroker::new();
        let context = AppContext::new(
            UserStore::Memory(InMemoryUserStore::new()),
            Arc::new(BrokerEventBus::new(broker.clone(), DEFAULT_EXCHANGE)),
        );
        Harness { context, broker }
    }

    fn create(username: &str) -> CreateUser {
        CreateUser {
            username: username.to_owned(),
            first_name: "Alice".to_owned(),
            last_name: "Liddell".to_owned(),
            middle_name: None,
        }
    }

    #[rstest]
    #[tokio::test]
    async fn created_user_is_visible_to_later_requests(harness: Harness) {
        let request = harness.context.begin_request().await.expect("begin");
        let id = request
            .commands()
            .handle(create("alice"))
            .await
            .expect("create user");
        request.close().await;

        let request = harness.context.begin_request().await.expect("begin");
        let user = request
            .get_user_by_username()
            .handle(GetUserByUsername {
                username: Username::new("alice").expect("valid username"),
            })
            .await
            .expect("user by username");
        request.close().await;

        assert_eq!(user.id, id);
        let published = harness.broker.published().await;
        assert_eq!(published.len(), 1);
        assert_eq!(published[0].channel, "user_service.user.UserCreated");
        let envelope = published[0].message().expect("event envelope");
        assert_eq!(envelope.message_type, EVENT_MESSAGE_TYPE);
        assert_eq!(envelope.data["data"]["userId"], id.to_string());
    }

    #[rstest]
    #[tokio::test]
    async fn conflicting_create_publishes_nothing(harness: Harness) {
        let request = harness.context.begin_request().await.expect("begin");
        request.commands().handle(create("alice")).await.expect("first create");
        request.close().await;

        let request = harness.context.begin_request().await.expect("begin");
        let err = request
            .commands()
            .handle(create("alice"))
            .await
            .expect_err("duplicate username");
        request.close().await;

        assert_eq!(err.code(), ErrorCode::Conflict);
        assert_eq!(harness.broker.published().await.len(), 1);
    }

    #[rstest]
    #[tokio::test]
    async fn request_accepts_one_committed_command(harness: Harness) {
        let request = harness.context.begin_request().await.expect("begin");
        let id = request.commands().handle(create("alice")).await.expect("create");
        let err = request
            .commands()
            .handle(UpdateUsername {
                user_id: id,
                username: "alicia".to_owned(),
            })
            .await
            .expect_err("transaction already committed");
        request.close().await;

        assert_eq!(err.code(), ErrorCode::InternalError);
    }
}
