//! User aggregate and its value objects.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::user_events::UserEvent;

/// Validation errors raised while constructing user value objects.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserValidationError {
    #[error("user id must not be empty")]
    EmptyId,
    #[error("user id must be a valid UUID")]
    InvalidId,
    #[error("username must not be empty")]
    EmptyUsername,
    #[error("username must be at least {min} characters")]
    UsernameTooShort { min: usize },
    #[error("username must be at most {max} characters")]
    UsernameTooLong { max: usize },
    #[error("username must start with a letter and contain only letters, digits, or underscores")]
    UsernameInvalidCharacters,
    #[error("{field} must not be empty")]
    EmptyName { field: NameField },
    #[error("{field} must be at most {max} characters")]
    NameTooLong { field: NameField, max: usize },
}

impl UserValidationError {
    /// Machine-readable code used in error details.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::EmptyId => "empty_id",
            Self::InvalidId => "invalid_id",
            Self::EmptyUsername => "empty_username",
            Self::UsernameTooShort { .. } => "username_too_short",
            Self::UsernameTooLong { .. } => "username_too_long",
            Self::UsernameInvalidCharacters => "username_invalid_chars",
            Self::EmptyName { .. } => "empty_name",
            Self::NameTooLong { .. } => "name_too_long",
        }
    }

    /// Name of the offending input field.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::EmptyId | Self::InvalidId => "id",
            Self::EmptyUsername
            | Self::UsernameTooShort { .. }
            | Self::UsernameTooLong { .. }
            | Self::UsernameInvalidCharacters => "username",
            Self::EmptyName { field } | Self::NameTooLong { field, .. } => field.as_str(),
        }
    }
}

/// Name component a [`FullName`] validation error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameField {
    FirstName,
    LastName,
    MiddleName,
}

impl NameField {
    /// Wire name of the field.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::FirstName => "firstName",
            Self::LastName => "lastName",
            Self::MiddleName => "middleName",
        }
    }
}

impl fmt::Display for NameField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stable user identifier stored as a UUID.
///
/// Every spelling of a UUID is normalised to its lowercase hyphenated form,
/// so equality and hashing follow the UUID value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(Uuid, String);

impl UserId {
    /// Validate and construct a [`UserId`] from borrowed input.
    pub fn new(id: impl AsRef<str>) -> Result<Self, UserValidationError> {
        Self::from_owned(id.as_ref().to_owned())
    }

    /// Generate a new random [`UserId`].
    #[must_use]
    pub fn random() -> Self {
        Self::from_uuid(Uuid::new_v4())
    }

    /// Wrap a UUID that is already known to be valid, such as a stored key.
    #[must_use]
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid, uuid.to_string())
    }

    fn from_owned(id: String) -> Result<Self, UserValidationError> {
        if id.is_empty() {
            return Err(UserValidationError::EmptyId);
        }
        if id.trim() != id {
            return Err(UserValidationError::InvalidId);
        }

        let parsed = Uuid::parse_str(&id).map_err(|_| UserValidationError::InvalidId)?;
        Ok(Self::from_uuid(parsed))
    }

    /// Access the underlying UUID.
    #[must_use]
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        self.1.as_str()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        let UserId(_, raw) = value;
        raw
    }
}

impl TryFrom<String> for UserId {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

/// Minimum allowed length for a username.
pub const USERNAME_MIN: usize = 2;
/// Maximum allowed length for a username. Mirrors the `users.username` column.
pub const USERNAME_MAX: usize = 32;

static USERNAME_RE: OnceLock<Regex> = OnceLock::new();

fn username_regex() -> &'static Regex {
    USERNAME_RE.get_or_init(|| {
        // Length is checked before matching.
        Regex::new("^[A-Za-z][A-Za-z0-9_]*$")
            .unwrap_or_else(|error| panic!("username regex failed to compile: {error}"))
    })
}

/// Unique handle chosen by the user.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Username(String);

impl Username {
    /// Validate and construct a [`Username`].
    pub fn new(username: impl Into<String>) -> Result<Self, UserValidationError> {
        Self::from_owned(username.into())
    }

    fn from_owned(username: String) -> Result<Self, UserValidationError> {
        if username.trim().is_empty() {
            return Err(UserValidationError::EmptyUsername);
        }

        let length = username.chars().count();
        if length < USERNAME_MIN {
            return Err(UserValidationError::UsernameTooShort { min: USERNAME_MIN });
        }
        if length > USERNAME_MAX {
            return Err(UserValidationError::UsernameTooLong { max: USERNAME_MAX });
        }
        if !username_regex().is_match(&username) {
            return Err(UserValidationError::UsernameInvalidCharacters);
        }

        Ok(Self(username))
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<Username> for String {
    fn from(value: Username) -> Self {
        value.0
    }
}

impl TryFrom<String> for Username {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

/// Maximum length of each name component. Mirrors the name columns.
pub const NAME_PART_MAX: usize = 64;

fn validate_name_part(value: String, field: NameField) -> Result<String, UserValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(UserValidationError::EmptyName { field });
    }
    if trimmed.chars().count() > NAME_PART_MAX {
        return Err(UserValidationError::NameTooLong {
            field,
            max: NAME_PART_MAX,
        });
    }
    if trimmed.len() == value.len() {
        Ok(value)
    } else {
        Ok(trimmed.to_owned())
    }
}

/// Personal name of a user.
///
/// ## Invariants
/// - First and last names are non-empty once trimmed.
/// - The middle name, when present, follows the same rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FullName {
    first_name: String,
    last_name: String,
    middle_name: Option<String>,
}

impl FullName {
    /// Validate and construct a [`FullName`]. Surrounding whitespace is trimmed.
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        middle_name: Option<String>,
    ) -> Result<Self, UserValidationError> {
        let first_name = validate_name_part(first_name.into(), NameField::FirstName)?;
        let last_name = validate_name_part(last_name.into(), NameField::LastName)?;
        let middle_name = middle_name
            .map(|value| validate_name_part(value, NameField::MiddleName))
            .transpose()?;

        Ok(Self {
            first_name,
            last_name,
            middle_name,
        })
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn middle_name(&self) -> Option<&str> {
        self.middle_name.as_deref()
    }
}

impl fmt::Display for FullName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.middle_name {
            Some(middle) => write!(f, "{} {} {}", self.first_name, middle, self.last_name),
            None => write!(f, "{} {}", self.first_name, self.last_name),
        }
    }
}

/// User aggregate.
///
/// Mutations record [`UserEvent`]s which callers drain with
/// [`User::take_events`] once the change has been persisted.
///
/// ## Invariants
/// - `id` never changes after construction.
/// - `username` is unique across stored users; the store enforces this.
#[derive(Debug, Clone)]
pub struct User {
    id: UserId,
    username: Username,
    full_name: FullName,
    events: Vec<UserEvent>,
}

impl PartialEq for User {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.username == other.username && self.full_name == other.full_name
    }
}

impl Eq for User {}

impl User {
    /// Rehydrate a user from validated components without recording events.
    #[must_use]
    pub fn new(id: UserId, username: Username, full_name: FullName) -> Self {
        Self {
            id,
            username,
            full_name,
            events: Vec::new(),
        }
    }

    /// Create a brand new user and record [`UserEvent::UserCreated`].
    #[must_use]
    pub fn create(id: UserId, username: Username, full_name: FullName) -> Self {
        let mut user = Self::new(id, username, full_name);
        let event = UserEvent::user_created(&user);
        user.events.push(event);
        user
    }

    /// Stable user identifier.
    pub fn id(&self) -> &UserId {
        &self.id
    }

    /// Current username.
    pub fn username(&self) -> &Username {
        &self.username
    }

    /// Current full name.
    pub fn full_name(&self) -> &FullName {
        &self.full_name
    }

    /// Replace the username. Returns `false` when the value is unchanged.
    pub fn set_username(&mut self, username: Username) -> bool {
        if self.username == username {
            return false;
        }
        self.username = username;
        self.events.push(UserEvent::UsernameUpdated {
            user_id: self.id.clone(),
            username: self.username.to_string(),
        });
        true
    }

    /// Replace the full name. Returns `false` when the value is unchanged.
    pub fn set_full_name(&mut self, full_name: FullName) -> bool {
        if self.full_name == full_name {
            return false;
        }
        self.full_name = full_name;
        self.events.push(UserEvent::FullNameUpdated {
            user_id: self.id.clone(),
            first_name: self.full_name.first_name().to_owned(),
            last_name: self.full_name.last_name().to_owned(),
            middle_name: self.full_name.middle_name().map(str::to_owned),
        });
        true
    }

    /// Drain the events recorded since the last call.
    pub fn take_events(&mut self) -> Vec<UserEvent> {
        std::mem::take(&mut self.events)
    }
}
