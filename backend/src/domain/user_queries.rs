//! Read-side use cases.
//!
//! Each query is a small value naming its output type. Handlers hold a
//! [`UserReader`] and forward to it; results and errors pass through
//! unchanged, with no caching and no retries.

use std::sync::Arc;

use async_trait::async_trait;

use super::ports::{UserReader, UserReaderError};
use super::{UserDto, UserId, Username};

/// A request for data with a fixed result type.
pub trait Query: Send + Sync {
    /// Value produced when the query succeeds.
    type Output: Send;
}

/// Executes one kind of [`Query`].
#[async_trait]
pub trait QueryHandler<Q: Query>: Send + Sync {
    /// Error produced when the query fails.
    type Error: Send;

    /// Run `query`.
    async fn handle(&self, query: Q) -> Result<Q::Output, Self::Error>;
}

/// Fetch one user by identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetUserById {
    pub user_id: UserId,
}

impl Query for GetUserById {
    type Output = UserDto;
}

/// Fetch one user by username.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetUserByUsername {
    pub username: Username,
}

impl Query for GetUserByUsername {
    type Output = UserDto;
}

/// List every user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GetUsers;

impl Query for GetUsers {
    type Output = Vec<UserDto>;
}

/// Handler for [`GetUserById`].
pub struct GetUserByIdHandler<R: ?Sized> {
    reader: Arc<R>,
}

impl<R: UserReader + ?Sized> GetUserByIdHandler<R> {
    pub fn new(reader: Arc<R>) -> Self {
        Self { reader }
    }
}

#[async_trait]
impl<R: UserReader + ?Sized> QueryHandler<GetUserById> for GetUserByIdHandler<R> {
    type Error = UserReaderError;

    async fn handle(&self, query: GetUserById) -> Result<UserDto, UserReaderError> {
        self.reader.get_user_by_id(&query.user_id).await
    }
}

/// Handler for [`GetUserByUsername`].
pub struct GetUserByUsernameHandler<R: ?Sized> {
    reader: Arc<R>,
}

impl<R: UserReader + ?Sized> GetUserByUsernameHandler<R> {
    pub fn new(reader: Arc<R>) -> Self {
        Self { reader }
    }
}

#[async_trait]
impl<R: UserReader + ?Sized> QueryHandler<GetUserByUsername> for GetUserByUsernameHandler<R> {
    type Error = UserReaderError;

    async fn handle(&self, query: GetUserByUsername) -> Result<UserDto, UserReaderError> {
        self.reader.get_user_by_username(&query.username).await
    }
}

/// Handler for [`GetUsers`].
pub struct GetUsersHandler<R: ?Sized> {
    reader: Arc<R>,
}

impl<R: UserReader + ?Sized> GetUsersHandler<R> {
    pub fn new(reader: Arc<R>) -> Self {
        Self { reader }
    }
}

#[async_trait]
impl<R: UserReader + ?Sized> QueryHandler<GetUsers> for GetUsersHandler<R> {
    type Error = UserReaderError;

    async fn handle(&self, _query: GetUsers) -> Result<Vec<UserDto>, UserReaderError> {
        self.reader.get_users().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::MockUserReader;
    use crate::domain::{FullName, User};
    use mockall::predicate::eq;
    use rstest::{fixture, rstest};

    #[fixture]
    fn alice() -> UserDto {
        let user = User::new(
            UserId::random(),
            Username::new("alice").expect("valid username"),
            FullName::new("Alice", "Liddell", None).expect("valid full name"),
        );
        UserDto::from(&user)
    }

    #[rstest]
    #[tokio::test]
    async fn get_user_by_username_returns_reader_result_unchanged(alice: UserDto) {
        let username = alice.username.clone();
        let expected = alice.clone();
        let mut reader = MockUserReader::new();
        reader
            .expect_get_user_by_username()
            .with(eq(username.clone()))
            .times(1)
            .return_once(move |_| Ok(alice));

        let handler = GetUserByUsernameHandler::new(Arc::new(reader));
        let dto = handler
            .handle(GetUserByUsername { username })
            .await
            .expect("query succeeds");

        assert_eq!(dto, expected);
    }

    #[rstest]
    #[tokio::test]
    async fn get_user_by_username_propagates_not_found() {
        let mut reader = MockUserReader::new();
        reader
            .expect_get_user_by_username()
            .times(1)
            .return_once(|username| Err(UserReaderError::username_not_found(username.clone())));

        let handler = GetUserByUsernameHandler::new(Arc::new(reader));
        let err = handler
            .handle(GetUserByUsername {
                username: Username::new("ghost").expect("valid username"),
            })
            .await
            .expect_err("missing user");

        assert_eq!(err, UserReaderError::username_not_found("ghost"));
    }

    #[rstest]
    #[tokio::test]
    async fn get_user_by_id_forwards_the_identifier(alice: UserDto) {
        let id = alice.id.clone();
        let mut reader = MockUserReader::new();
        reader
            .expect_get_user_by_id()
            .with(eq(id.clone()))
            .times(1)
            .return_once(move |_| Ok(alice));

        let handler = GetUserByIdHandler::new(Arc::new(reader));
        let dto = handler
            .handle(GetUserById { user_id: id.clone() })
            .await
            .expect("query succeeds");

        assert_eq!(dto.id, id);
    }

    #[rstest]
    #[tokio::test]
    async fn get_users_passes_through_connection_errors() {
        let mut reader = MockUserReader::new();
        reader
            .expect_get_users()
            .times(1)
            .return_once(|| Err(UserReaderError::connection("pool exhausted")));

        let handler = GetUsersHandler::new(Arc::new(reader));
        let err = handler.handle(GetUsers).await.expect_err("reader failure");

        assert_eq!(err, UserReaderError::connection("pool exhausted"));
    }
}
