//! Read model returned by user readers.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::user::{User, UserId, Username};

/// Flat projection of a stored user.
///
/// Built by readers straight from storage rows; it carries no behaviour and
/// is what query handlers hand back to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    #[schema(value_type = String, example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub id: UserId,
    #[schema(value_type = String, example = "ada")]
    pub username: Username,
    #[schema(example = "Ada")]
    pub first_name: String,
    #[schema(example = "Lovelace")]
    pub last_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub middle_name: Option<String>,
    #[schema(example = "Ada Lovelace")]
    pub full_name: String,
}

impl From<&User> for UserDto {
    fn from(user: &User) -> Self {
        let name = user.full_name();
        Self {
            id: user.id().clone(),
            username: user.username().clone(),
            first_name: name.first_name().to_owned(),
            last_name: name.last_name().to_owned(),
            middle_name: name.middle_name().map(str::to_owned),
            full_name: name.to_string(),
        }
    }
}
