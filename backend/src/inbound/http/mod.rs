//! HTTP inbound adapter exposing the user REST endpoints.

pub mod error;
pub mod health;
pub mod users;

pub use error::{ApiResult, json_error_handler};
