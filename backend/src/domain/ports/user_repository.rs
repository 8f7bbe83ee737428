//! Port abstraction for user persistence adapters and their errors.
//!
//! Uniqueness of ids and usernames is enforced by the store. Adapters never
//! pre-check; they attempt the write and classify the conflict that comes
//! back into one of the typed variants below.

use async_trait::async_trait;

use crate::domain::{User, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserRepositoryError {
        /// No user has the requested identifier.
        UserIdNotFound { id: String } => "user {id} not found",
        /// A user with this identifier is already stored.
        UserIdAlreadyExists { id: String } => "user {id} already exists",
        /// Another user already holds this username.
        UsernameAlreadyExists { username: String } => "username {username} is already taken",
        /// Repository connection could not be established or was lost.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Any other storage failure, including unclassified constraint
        /// violations. The message keeps the underlying cause.
        Repository { message: String } => "user repository failed: {message}",
    }
}

/// Write side of user persistence.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Load the user with `id` and hold a row lock on it until the current
    /// transaction ends.
    async fn acquire_user_by_id(&self, id: &UserId) -> Result<User, UserRepositoryError>;

    /// Insert a new user.
    async fn add_user(&self, user: &User) -> Result<(), UserRepositoryError>;

    /// Persist the username and full name of an existing user.
    async fn update_user(&self, user: &User) -> Result<(), UserRepositoryError>;
}
