//! User service: persistence, use cases and HTTP surface for user accounts.
//!
//! - [`domain`]: the user aggregate, its events, the query and command
//!   handlers, and the ports they drive.
//! - [`outbound`]: PostgreSQL and in-memory stores, and the broker-backed
//!   event bus.
//! - [`context`]: process-wide and per-request wiring of ports.
//! - [`inbound`]: Actix HTTP handlers.

pub mod config;
pub mod context;
pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod server;

/// Public OpenAPI surface used by tooling.
pub use doc::ApiDoc;
pub use middleware::Trace;
