//! Domain events emitted by the user aggregate.
//!
//! Events are plain serialisable values. The event bus adapter decides how
//! they travel; the domain only names them and fixes their payloads.

use serde::{Deserialize, Serialize};

use super::user::{User, UserId};

/// Something that happened to a user and was committed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum UserEvent {
    /// A new user was stored.
    #[serde(rename_all = "camelCase")]
    UserCreated {
        user_id: UserId,
        username: String,
        first_name: String,
        last_name: String,
        middle_name: Option<String>,
    },
    /// The username changed.
    #[serde(rename_all = "camelCase")]
    UsernameUpdated { user_id: UserId, username: String },
    /// The full name changed.
    #[serde(rename_all = "camelCase")]
    FullNameUpdated {
        user_id: UserId,
        first_name: String,
        last_name: String,
        middle_name: Option<String>,
    },
}

impl UserEvent {
    pub(crate) fn user_created(user: &User) -> Self {
        let full_name = user.full_name();
        Self::UserCreated {
            user_id: user.id().clone(),
            username: user.username().to_string(),
            first_name: full_name.first_name().to_owned(),
            last_name: full_name.last_name().to_owned(),
            middle_name: full_name.middle_name().map(str::to_owned),
        }
    }

    /// Stable event name, used for routing on the broker.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::UserCreated { .. } => "UserCreated",
            Self::UsernameUpdated { .. } => "UsernameUpdated",
            Self::FullNameUpdated { .. } => "FullNameUpdated",
        }
    }

    /// Identifier of the user the event concerns.
    pub fn user_id(&self) -> &UserId {
        match self {
            Self::UserCreated { user_id, .. }
            | Self::UsernameUpdated { user_id, .. }
            | Self::FullNameUpdated { user_id, .. } => user_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    const ID: &str = "3fa85f64-5717-4562-b3fc-2c963f66afa6";

    #[rstest]
    fn username_updated_serialises_with_type_tag() {
        let event = UserEvent::UsernameUpdated {
            user_id: UserId::new(ID).expect("valid id"),
            username: "alice".to_owned(),
        };

        let value = serde_json::to_value(&event).expect("serialise event");

        assert_eq!(
            value,
            json!({
                "type": "UsernameUpdated",
                "data": { "userId": ID, "username": "alice" }
            })
        );
        assert_eq!(event.name(), "UsernameUpdated");
    }

    #[rstest]
    fn full_name_updated_keeps_absent_middle_name_as_null() {
        let event = UserEvent::FullNameUpdated {
            user_id: UserId::new(ID).expect("valid id"),
            first_name: "Ada".to_owned(),
            last_name: "Lovelace".to_owned(),
            middle_name: None,
        };

        let value = serde_json::to_value(&event).expect("serialise event");

        assert_eq!(value["data"]["middleName"], serde_json::Value::Null);
        assert_eq!(event.user_id().as_ref(), ID);
    }
}
