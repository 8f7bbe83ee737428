//! Diesel error mapping for the user reader and repository.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use crate::domain::User;
use crate::domain::ports::{UnitOfWorkError, UserReaderError, UserRepositoryError};
use crate::outbound::user_constraint::classify_conflict;

fn log_diesel_error(error: &DieselError, operation: &'static str) {
    match error {
        DieselError::DatabaseError(kind, info) => debug!(
            ?kind,
            message = info.message(),
            constraint = info.constraint_name(),
            operation,
            "diesel operation failed"
        ),
        _ => debug!(%error, operation, "diesel operation failed"),
    }
}

fn is_connection_failure(error: &DieselError) -> bool {
    matches!(
        error,
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _)
            | DieselError::BrokenTransactionManager
    )
}

fn is_integrity_violation(kind: &DatabaseErrorKind) -> bool {
    matches!(
        kind,
        DatabaseErrorKind::UniqueViolation
            | DatabaseErrorKind::ForeignKeyViolation
            | DatabaseErrorKind::NotNullViolation
            | DatabaseErrorKind::CheckViolation
    )
}

/// Map a failed read into a reader error. Absence is handled by callers.
pub(super) fn map_reader_error(error: DieselError, operation: &'static str) -> UserReaderError {
    log_diesel_error(&error, operation);
    if is_connection_failure(&error) {
        UserReaderError::connection(error.to_string())
    } else {
        UserReaderError::query(error.to_string())
    }
}

/// Map a failed repository statement that carries no user, such as a
/// locking read.
pub(super) fn map_repository_error(
    error: DieselError,
    operation: &'static str,
) -> UserRepositoryError {
    log_diesel_error(&error, operation);
    if is_connection_failure(&error) {
        UserRepositoryError::connection(error.to_string())
    } else {
        UserRepositoryError::repository(error.to_string())
    }
}

/// Map a failed write of `user`, classifying integrity violations by the
/// constraint name PostgreSQL reports.
pub(super) fn map_write_error(
    error: DieselError,
    user: &User,
    operation: &'static str,
) -> UserRepositoryError {
    match &error {
        DieselError::DatabaseError(kind, info) if is_integrity_violation(kind) => {
            log_diesel_error(&error, operation);
            classify_conflict(info.constraint_name(), user, info.message())
        }
        _ => map_repository_error(error, operation),
    }
}

/// Map a failed transaction statement.
pub(super) fn map_transaction_error(error: DieselError, operation: &'static str) -> UnitOfWorkError {
    log_diesel_error(&error, operation);
    if is_connection_failure(&error) {
        UnitOfWorkError::connection(error.to_string())
    } else {
        UnitOfWorkError::transaction(error.to_string())
    }
}
