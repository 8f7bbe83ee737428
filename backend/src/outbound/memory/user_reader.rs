//! In-memory `UserReader`.

use async_trait::async_trait;

use crate::domain::ports::{UserReader, UserReaderError};
use crate::domain::{UserDto, UserId, Username};

use super::store::InMemorySession;

/// [`UserReader`] over an [`InMemorySession`].
#[derive(Clone)]
pub struct InMemoryUserReader {
    session: InMemorySession,
}

impl InMemoryUserReader {
    pub fn new(session: InMemorySession) -> Self {
        Self { session }
    }
}

#[async_trait]
impl UserReader for InMemoryUserReader {
    async fn get_user_by_id(&self, id: &UserId) -> Result<UserDto, UserReaderError> {
        let state = self.session.lock().await;
        state
            .users()
            .get(id)
            .map(UserDto::from)
            .ok_or_else(|| UserReaderError::user_id_not_found(id.clone()))
    }

    async fn get_user_by_username(
        &self,
        username: &Username,
    ) -> Result<UserDto, UserReaderError> {
        let state = self.session.lock().await;
        state
            .users()
            .values()
            .find(|user| user.username() == username)
            .map(UserDto::from)
            .ok_or_else(|| UserReaderError::username_not_found(username.clone()))
    }

    async fn get_users(&self) -> Result<Vec<UserDto>, UserReaderError> {
        let state = self.session.lock().await;
        let mut users: Vec<UserDto> = state.users().values().map(UserDto::from).collect();
        users.sort_by(|left, right| left.username.as_ref().cmp(right.username.as_ref()));
        Ok(users)
    }
}
