//! PostgreSQL-backed `UserRepository` running on the request session.
//!
//! Writes are attempted directly; the `pk_users` and `uq_users_username`
//! constraints decide whether they conflict, and the failure is classified
//! from the constraint name PostgreSQL reports.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::{debug, instrument};

use crate::domain::ports::{UserRepository, UserRepositoryError};
use crate::domain::{User, UserId};

use super::error_mapping::{map_repository_error, map_write_error};
use super::models::{NewUserRow, UserChangeset, UserRow};
use super::schema::users;
use super::session::{DieselSession, SessionState};

/// Diesel implementation of the [`UserRepository`] port.
#[derive(Clone)]
pub struct DieselUserRepository {
    session: DieselSession,
}

impl DieselUserRepository {
    pub fn new(session: DieselSession) -> Self {
        Self { session }
    }
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

#[async_trait]
impl UserRepository for DieselUserRepository {
    #[instrument(skip(self), fields(user_id = %id))]
    async fn acquire_user_by_id(&self, id: &UserId) -> Result<User, UserRepositoryError> {
        let mut state = self.session.lock().await;
        ensure_open(&state)?;
        let row: Option<UserRow> = users::table
            .filter(users::id.eq(id.as_uuid()))
            .select(UserRow::as_select())
            .for_update()
            .first(state.connection())
            .await
            .optional()
            .map_err(|err| map_repository_error(err, "acquire user"))?;

        let row = row.ok_or_else(|| UserRepositoryError::user_id_not_found(id.clone()))?;
        User::try_from(row).map_err(|err| {
            UserRepositoryError::repository(format!("stored user {id} is invalid: {err}"))
        })
    }

    #[instrument(skip(self, user), fields(user_id = %user.id()))]
    async fn add_user(&self, user: &User) -> Result<(), UserRepositoryError> {
        let mut state = self.session.lock().await;
        ensure_open(&state)?;
        diesel::insert_into(users::table)
            .values(NewUserRow::from(user))
            .execute(state.connection())
            .await
            .map_err(|err| map_write_error(err, user, "insert user"))?;
        debug!("user inserted");
        Ok(())
    }

    #[instrument(skip(self, user), fields(user_id = %user.id()))]
    async fn update_user(&self, user: &User) -> Result<(), UserRepositoryError> {
        let mut state = self.session.lock().await;
        ensure_open(&state)?;
        let updated_rows = diesel::update(users::table.filter(users::id.eq(user.id().as_uuid())))
            .set((
                UserChangeset::from(user),
                users::updated_at.eq(diesel::dsl::now),
            ))
            .execute(state.connection())
            .await
            .map_err(|err| map_write_error(err, user, "update user"))?;

        if updated_rows == 0 {
            return Err(UserRepositoryError::user_id_not_found(user.id().clone()));
        }
        debug!("user updated");
        Ok(())
    }
}
