//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL-backed reader, repository and unit of work
//!   using Diesel
//! - **memory**: transactional in-memory store for local runs and tests
//! - **event_bus**: broker-backed event publishing (Redis or in-process)
//!
//! Adapters translate between domain types and infrastructure
//! representations. They contain no business logic.

pub mod event_bus;
pub mod memory;
pub mod persistence;
pub mod user_constraint;
