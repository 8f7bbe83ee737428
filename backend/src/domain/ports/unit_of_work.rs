//! Port for ending the request-scoped transaction.

use async_trait::async_trait;

use super::define_port_error;

define_port_error! {
    /// Errors raised while finishing a unit of work.
    pub enum UnitOfWorkError {
        /// The session connection is unavailable.
        Connection { message: String } => "unit of work connection failed: {message}",
        /// Commit or rollback was rejected.
        Transaction { message: String } => "unit of work transaction failed: {message}",
    }
}

/// Transaction boundary shared by the reader and repository of one request.
///
/// Once `commit` or `rollback` has succeeded the unit of work is finished;
/// further calls are no-ops.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    /// Make every write of the request durable.
    async fn commit(&self) -> Result<(), UnitOfWorkError>;

    /// Discard every write of the request.
    async fn rollback(&self) -> Result<(), UnitOfWorkError>;
}
