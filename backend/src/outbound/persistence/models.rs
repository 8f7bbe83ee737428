//! Internal Diesel row structs for the `users` table.
//!
//! These types never leave the persistence layer. Conversions into domain
//! types revalidate stored values, so a row edited outside the service
//! surfaces as a storage error rather than an invalid aggregate.

use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::{FullName, User, UserDto, UserId, UserValidationError, Username};

use super::schema::users;

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub middle_name: Option<String>,
}

/// Insertable struct for creating new user records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub username: &'a str,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub middle_name: Option<&'a str>,
}

/// Changeset for rewriting the mutable columns of a user.
///
/// `middle_name` is always written so clearing it stores `NULL`.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = users)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct UserChangeset<'a> {
    pub username: &'a str,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub middle_name: Option<&'a str>,
}

impl<'a> From<&'a User> for NewUserRow<'a> {
    fn from(user: &'a User) -> Self {
        let name = user.full_name();
        Self {
            id: *user.id().as_uuid(),
            username: user.username().as_ref(),
            first_name: name.first_name(),
            last_name: name.last_name(),
            middle_name: name.middle_name(),
        }
    }
}

impl<'a> From<&'a User> for UserChangeset<'a> {
    fn from(user: &'a User) -> Self {
        let name = user.full_name();
        Self {
            username: user.username().as_ref(),
            first_name: name.first_name(),
            last_name: name.last_name(),
            middle_name: name.middle_name(),
        }
    }
}

impl TryFrom<UserRow> for User {
    type Error = UserValidationError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let username = Username::new(row.username)?;
        let full_name = FullName::new(row.first_name, row.last_name, row.middle_name)?;
        Ok(User::new(UserId::from_uuid(row.id), username, full_name))
    }
}

impl TryFrom<UserRow> for UserDto {
    type Error = UserValidationError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        User::try_from(row).map(|user| UserDto::from(&user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn row(username: &str, middle_name: Option<&str>) -> UserRow {
        UserRow {
            id: Uuid::new_v4(),
            username: username.to_owned(),
            first_name: "Ada".to_owned(),
            last_name: "Lovelace".to_owned(),
            middle_name: middle_name.map(str::to_owned),
        }
    }

    #[rstest]
    fn row_converts_to_dto_with_rendered_full_name() {
        let dto = UserDto::try_from(row("ada", Some("Augusta"))).expect("valid row");
        assert_eq!(dto.username.as_ref(), "ada");
        assert_eq!(dto.full_name, "Ada Augusta Lovelace");
    }

    #[rstest]
    fn corrupt_username_is_rejected() {
        let err = User::try_from(row("", None)).expect_err("empty username");
        assert_eq!(err, UserValidationError::EmptyUsername);
    }

    #[rstest]
    fn insert_row_borrows_user_fields() {
        let user = User::try_from(row("ada", None)).expect("valid row");
        let new_row = NewUserRow::from(&user);
        assert_eq!(new_row.id, *user.id().as_uuid());
        assert_eq!(new_row.username, "ada");
        assert_eq!(new_row.middle_name, None);
    }
}
