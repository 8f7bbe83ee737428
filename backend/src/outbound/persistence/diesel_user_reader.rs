//! PostgreSQL-backed `UserReader` running on the request session.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::instrument;

use crate::domain::ports::{UserReader, UserReaderError};
use crate::domain::{UserDto, UserId, Username};

use super::error_mapping::map_reader_error;
use super::models::UserRow;
use super::schema::users;
use super::session::DieselSession;

/// Diesel implementation of the [`UserReader`] port.
///
/// Plain `SELECT`s without row locks. Reads see the uncommitted writes of the
/// same request because they share its session.
#[derive(Clone)]
pub struct DieselUserReader {
    session: DieselSession,
}

impl DieselUserReader {
    pub fn new(session: DieselSession) -> Self {
        Self { session }
    }
}

fn row_to_dto(row: UserRow) -> Result<UserDto, UserReaderError> {
    let id = row.id;
    UserDto::try_from(row)
        .map_err(|err| UserReaderError::query(format!("stored user {id} is invalid: {err}")))
}

#[async_trait]
impl UserReader for DieselUserReader {
    #[instrument(skip(self), fields(user_id = %id))]
    async fn get_user_by_id(&self, id: &UserId) -> Result<UserDto, UserReaderError> {
        let mut state = self.session.lock().await;
        let row: Option<UserRow> = users::table
            .filter(users::id.eq(id.as_uuid()))
            .select(UserRow::as_select())
            .first(state.connection())
            .await
            .optional()
            .map_err(|err| map_reader_error(err, "get user by id"))?;

        match row {
            Some(row) => row_to_dto(row),
            None => Err(UserReaderError::user_id_not_found(id.clone())),
        }
    }

    #[instrument(skip(self), fields(username = %username))]
    async fn get_user_by_username(
        &self,
        username: &Username,
    ) -> Result<UserDto, UserReaderError> {
        let mut state = self.session.lock().await;
        let row: Option<UserRow> = users::table
            .filter(users::username.eq(username.as_ref()))
            .select(UserRow::as_select())
            .first(state.connection())
            .await
            .optional()
            .map_err(|err| map_reader_error(err, "get user by username"))?;

        match row {
            Some(row) => row_to_dto(row),
            None => Err(UserReaderError::username_not_found(username.clone())),
        }
    }

    /// `users.username` uses the `"C"` collation, so the order is bytewise and
    /// matches the in-memory reader.
    #[instrument(skip(self))]
    async fn get_users(&self) -> Result<Vec<UserDto>, UserReaderError> {
        let mut state = self.session.lock().await;
        let rows: Vec<UserRow> = users::table
            .select(UserRow::as_select())
            .order_by(users::username.asc())
            .load(state.connection())
            .await
            .map_err(|err| map_reader_error(err, "list users"))?;

        rows.into_iter().map(row_to_dto).collect()
    }
}
