//! Port for read-only user lookups.
//!
//! Readers serve projections ([`UserDto`]) and never lock rows. They run
//! inside the request's transaction, so they observe writes made earlier in
//! the same request.

use async_trait::async_trait;

use crate::domain::{UserDto, UserId, Username};

use super::define_port_error;

define_port_error! {
    /// Errors raised by user reader adapters.
    pub enum UserReaderError {
        /// No user has the requested identifier.
        UserIdNotFound { id: String } => "user {id} not found",
        /// No user has the requested username.
        UsernameNotFound { username: String } => "user with username {username} not found",
        /// Reader connection could not be established or was lost.
        Connection { message: String } => "user reader connection failed: {message}",
        /// Query failed during execution.
        Query { message: String } => "user reader query failed: {message}",
    }
}

/// Read side of user persistence.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserReader: Send + Sync {
    /// Fetch the projection of the user with `id`.
    ///
    /// Fails with [`UserReaderError::UserIdNotFound`] when absent.
    async fn get_user_by_id(&self, id: &UserId) -> Result<UserDto, UserReaderError>;

    /// Fetch the projection of the user holding `username`.
    ///
    /// Fails with [`UserReaderError::UsernameNotFound`] when absent.
    async fn get_user_by_username(&self, username: &Username)
    -> Result<UserDto, UserReaderError>;

    /// List every stored user ordered by username. Empty stores yield an
    /// empty vector.
    async fn get_users(&self) -> Result<Vec<UserDto>, UserReaderError>;
}
