//! Classification of integrity violations raised by user stores.
//!
//! Stores report which named constraint rejected a write. The names below
//! are the ones created by the `users` migration; the in-memory store raises
//! the same names so both adapters share [`classify_conflict`].

use tracing::warn;

use crate::domain::User;
use crate::domain::ports::UserRepositoryError;

/// Primary key constraint on `users.id`.
pub const PK_USERS: &str = "pk_users";
/// Unique constraint on `users.username`.
pub const UQ_USERS_USERNAME: &str = "uq_users_username";

/// Constraints on the `users` table that have a domain meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserConstraint {
    PrimaryKey,
    UniqueUsername,
}

impl UserConstraint {
    /// Look up a constraint by the name the store reports.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            PK_USERS => Some(Self::PrimaryKey),
            UQ_USERS_USERNAME => Some(Self::UniqueUsername),
            _ => None,
        }
    }

    /// Name of the constraint in the schema.
    pub const fn name(self) -> &'static str {
        match self {
            Self::PrimaryKey => PK_USERS,
            Self::UniqueUsername => UQ_USERS_USERNAME,
        }
    }
}

/// Turn an integrity violation on a write of `user` into a repository error.
///
/// Known constraints map to their typed conflict. Anything else, including a
/// violation without a constraint name, becomes a generic repository error
/// that keeps `cause`.
pub fn classify_conflict(
    constraint_name: Option<&str>,
    user: &User,
    cause: &str,
) -> UserRepositoryError {
    match constraint_name.and_then(UserConstraint::from_name) {
        Some(UserConstraint::PrimaryKey) => {
            UserRepositoryError::user_id_already_exists(user.id().clone())
        }
        Some(UserConstraint::UniqueUsername) => {
            UserRepositoryError::username_already_exists(user.username().clone())
        }
        None => {
            warn!(
                constraint_name = ?constraint_name,
                user_id = %user.id(),
                cause,
                "unclassified integrity violation on users"
            );
            UserRepositoryError::repository(cause)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FullName, UserId, Username};
    use rstest::{fixture, rstest};

    #[fixture]
    fn user() -> User {
        User::new(
            UserId::new("11111111-1111-1111-1111-111111111111").expect("valid id"),
            Username::new("alice").expect("valid username"),
            FullName::new("Alice", "Liddell", None).expect("valid full name"),
        )
    }

    #[rstest]
    fn primary_key_violation_is_id_conflict(user: User) {
        let err = classify_conflict(Some(PK_USERS), &user, "duplicate key");
        assert_eq!(
            err,
            UserRepositoryError::user_id_already_exists("11111111-1111-1111-1111-111111111111")
        );
    }

    #[rstest]
    fn username_violation_is_username_conflict(user: User) {
        let err = classify_conflict(Some(UQ_USERS_USERNAME), &user, "duplicate key");
        assert_eq!(err, UserRepositoryError::username_already_exists("alice"));
    }

    #[rstest]
    #[case(Some("ck_users_names"))]
    #[case(Some("PK_USERS"))]
    #[case(Some(""))]
    #[case(None)]
    fn other_violations_keep_the_cause(user: User, #[case] constraint: Option<&str>) {
        let err = classify_conflict(constraint, &user, "new row violates check constraint");
        assert_eq!(
            err,
            UserRepositoryError::repository("new row violates check constraint")
        );
    }

    #[rstest]
    #[case(UserConstraint::PrimaryKey)]
    #[case(UserConstraint::UniqueUsername)]
    fn names_round_trip(#[case] constraint: UserConstraint) {
        assert_eq!(UserConstraint::from_name(constraint.name()), Some(constraint));
    }
}
