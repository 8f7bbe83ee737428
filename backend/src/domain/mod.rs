//! Domain primitives, use cases and ports.
//!
//! Purpose: define the user aggregate, its read model and events, and the
//! query and command handlers that drive them through the ports in
//! [`ports`]. Nothing here performs I/O directly.
//!
//! Public surface:
//! - `Error` / `ErrorCode`: transport-agnostic failure payload.
//! - `User`, `UserId`, `Username`, `FullName`: aggregate and value objects.
//! - `UserDto`: projection returned by readers and query handlers.
//! - `UserEvent`: events published after a command commits.

pub mod error;
pub mod ports;
pub mod user;
pub mod user_commands;
pub mod user_dto;
pub mod user_events;
pub mod user_queries;

pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::user::{FullName, NameField, User, UserId, UserValidationError, Username};
pub use self::user_commands::{
    Command, CommandHandler, CreateUser, SetFullName, UpdateUsername, UserCommandHandler,
};
pub use self::user_dto::UserDto;
pub use self::user_events::UserEvent;
pub use self::user_queries::{
    GetUserById, GetUserByIdHandler, GetUserByUsername, GetUserByUsernameHandler, GetUsers,
    GetUsersHandler, Query, QueryHandler,
};
