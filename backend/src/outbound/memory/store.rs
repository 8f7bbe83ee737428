//! Transactional in-memory user table.
//!
//! A session takes the store lock when it begins and keeps it until it
//! commits or rolls back, so sessions are serialised. Writes go to a working
//! copy that replaces the committed table on commit. Dropping a session
//! without committing discards its writes.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, MutexGuard, OwnedMutexGuard};

use crate::domain::ports::{UnitOfWork, UnitOfWorkError};
use crate::domain::{User, UserId};

/// Committed users keyed by identifier.
pub(super) type UserTable = HashMap<UserId, User>;

/// Process-wide in-memory user storage.
#[derive(Clone, Default)]
pub struct InMemoryUserStore {
    table: Arc<Mutex<UserTable>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access and open a session over the current data.
    pub async fn begin(&self) -> InMemorySession {
        let guard = Arc::clone(&self.table).lock_owned().await;
        let working = guard.clone();
        InMemorySession {
            state: Arc::new(Mutex::new(SessionState {
                guard: Some(guard),
                working,
            })),
        }
    }
}

pub(super) struct SessionState {
    guard: Option<OwnedMutexGuard<UserTable>>,
    working: UserTable,
}

impl SessionState {
    /// Whether the session still holds the store, i.e. has not committed or
    /// rolled back.
    pub(super) fn is_open(&self) -> bool {
        self.guard.is_some()
    }

    pub(super) fn users(&self) -> &UserTable {
        &self.working
    }

    pub(super) fn users_mut(&mut self) -> &mut UserTable {
        &mut self.working
    }
}

/// One request's view of an [`InMemoryUserStore`].
#[derive(Clone)]
pub struct InMemorySession {
    state: Arc<Mutex<SessionState>>,
}

impl InMemorySession {
    pub(super) async fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().await
    }
}

/// [`UnitOfWork`] over an [`InMemorySession`].
#[derive(Clone)]
pub struct InMemoryUnitOfWork {
    session: InMemorySession,
}

impl InMemoryUnitOfWork {
    pub fn new(session: InMemorySession) -> Self {
        Self { session }
    }
}

#[async_trait]
impl UnitOfWork for InMemoryUnitOfWork {
    async fn commit(&self) -> Result<(), UnitOfWorkError> {
        let mut state = self.session.lock().await;
        if let Some(mut guard) = state.guard.take() {
            *guard = state.working.clone();
        }
        Ok(())
    }

    async fn rollback(&self) -> Result<(), UnitOfWorkError> {
        let mut state = self.session.lock().await;
        if let Some(guard) = state.guard.take() {
            state.working = (*guard).clone();
        }
        Ok(())
    }
}
