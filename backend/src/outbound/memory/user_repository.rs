//! In-memory `UserRepository`.
//!
//! Uniqueness checks raise the same constraint names as the PostgreSQL
//! schema and go through the shared classifier, so both stores report
//! conflicts identically.

use async_trait::async_trait;

use crate::domain::ports::{UserRepository, UserRepositoryError};
use crate::domain::{User, UserId};
use crate::outbound::user_constraint::{PK_USERS, UQ_USERS_USERNAME, classify_conflict};

use super::store::{InMemorySession, SessionState, UserTable};

/// [`UserRepository`] over an [`InMemorySession`].
#[derive(Clone)]
pub struct InMemoryUserRepository {
    session: InMemorySession,
}

impl InMemoryUserRepository {
    pub fn new(session: InMemorySession) -> Self {
        Self { session }
    }
}

/// Name of the constraint `user` would violate if written to `users`.
fn violated_constraint(users: &UserTable, user: &User, inserting: bool) -> Option<&'static str> {
    if inserting && users.contains_key(user.id()) {
        return Some(PK_USERS);
    }
    users
        .values()
        .any(|other| other.id() != user.id() && other.username() == user.username())
        .then_some(UQ_USERS_USERNAME)
}

fn conflict(constraint: &'static str, user: &User) -> UserRepositoryError {
    let cause = format!("duplicate key value violates unique constraint \"{constraint}\"");
    classify_conflict(Some(constraint), user, &cause)
}

/// Writes are only accepted while the request transaction is open.
fn ensure_open(state: &SessionState) -> Result<(), UserRepositoryError> {
    if state.is_open() {
        Ok(())
    } else {
        Err(UserRepositoryError::repository(
            "request transaction is already closed",
        ))
    }
}

fn stored_copy(user: &User) -> User {
    User::new(user.id().clone(), user.username().clone(), user.full_name().clone())
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn acquire_user_by_id(&self, id: &UserId) -> Result<User, UserRepositoryError> {
        let state = self.session.lock().await;
        ensure_open(&state)?;
        state
            .users()
            .get(id)
            .map(stored_copy)
            .ok_or_else(|| UserRepositoryError::user_id_not_found(id.clone()))
    }

    async fn add_user(&self, user: &User) -> Result<(), UserRepositoryError> {
        let mut state = self.session.lock().await;
        ensure_open(&state)?;
        if let Some(constraint) = violated_constraint(state.users(), user, true) {
            return Err(conflict(constraint, user));
        }
        state.users_mut().insert(user.id().clone(), stored_copy(user));
        Ok(())
    }

    async fn update_user(&self, user: &User) -> Result<(), UserRepositoryError> {
        let mut state = self.session.lock().await;
        ensure_open(&state)?;
        if !state.users().contains_key(user.id()) {
            return Err(UserRepositoryError::user_id_not_found(user.id().clone()));
        }
        if let Some(constraint) = violated_constraint(state.users(), user, false) {
            return Err(conflict(constraint, user));
        }
        state.users_mut().insert(user.id().clone(), stored_copy(user));
        Ok(())
    }
}
