//! Request-scoped database session and its unit of work.
//!
//! A [`DieselSession`] owns one pooled connection with an open transaction.
//! The reader, repository and unit of work of a request all hold clones of
//! the same session, so every statement of the request runs in that
//! transaction. A session dropped without commit or rollback returns its
//! connection to the pool mid-transaction; the pool manager treats such a
//! connection as broken and discards it.

use std::sync::Arc;

use async_trait::async_trait;
use diesel_async::pooled_connection::bb8::PooledConnection;
use diesel_async::{AnsiTransactionManager, AsyncPgConnection, TransactionManager};
use tokio::sync::{Mutex, MutexGuard};
use tracing::debug;

use crate::domain::ports::{UnitOfWork, UnitOfWorkError};

use super::error_mapping::map_transaction_error;
use super::pool::DbPool;

pub(super) struct SessionState {
    connection: PooledConnection<'static, AsyncPgConnection>,
    open: bool,
}

impl SessionState {
    /// Whether the request transaction is still in progress.
    pub(super) fn is_open(&self) -> bool {
        self.open
    }

    pub(super) fn connection(&mut self) -> &mut AsyncPgConnection {
        &mut self.connection
    }
}

/// Shared handle to a request's connection and transaction.
#[derive(Clone)]
pub struct DieselSession {
    state: Arc<Mutex<SessionState>>,
}

impl DieselSession {
    /// Check out a connection and begin the request transaction.
    ///
    /// # Errors
    ///
    /// Returns [`UnitOfWorkError::Connection`] when the pool cannot supply a
    /// connection and [`UnitOfWorkError::Transaction`] when `BEGIN` fails.
    pub async fn begin(pool: &DbPool) -> Result<Self, UnitOfWorkError> {
        let mut connection = pool
            .get_owned()
            .await
            .map_err(|err| UnitOfWorkError::connection(err.into_message()))?;

        let conn: &mut AsyncPgConnection = &mut connection;
        AnsiTransactionManager::begin_transaction(conn)
            .await
            .map_err(|err| map_transaction_error(err, "begin transaction"))?;
        debug!("request transaction started");

        Ok(Self {
            state: Arc::new(Mutex::new(SessionState {
                connection,
                open: true,
            })),
        })
    }

    /// Wait for exclusive use of the session connection.
    pub(super) async fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().await
    }
}

/// [`UnitOfWork`] over a [`DieselSession`].
#[derive(Clone)]
pub struct DieselUnitOfWork {
    session: DieselSession,
}

impl DieselUnitOfWork {
    pub fn new(session: DieselSession) -> Self {
        Self { session }
    }
}

#[async_trait]
impl UnitOfWork for DieselUnitOfWork {
    async fn commit(&self) -> Result<(), UnitOfWorkError> {
        let mut state = self.session.lock().await;
        if !state.open {
            return Ok(());
        }
        AnsiTransactionManager::commit_transaction(state.connection())
            .await
            .map_err(|err| map_transaction_error(err, "commit transaction"))?;
        state.open = false;
        debug!("request transaction committed");
        Ok(())
    }

    async fn rollback(&self) -> Result<(), UnitOfWorkError> {
        let mut state = self.session.lock().await;
        if !state.open {
            return Ok(());
        }
        AnsiTransactionManager::rollback_transaction(state.connection())
            .await
            .map_err(|err| map_transaction_error(err, "rollback transaction"))?;
        state.open = false;
        debug!("request transaction rolled back");
        Ok(())
    }
}
