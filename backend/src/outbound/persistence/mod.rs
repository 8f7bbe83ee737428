//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Concrete implementations of the user ports backed by PostgreSQL through
//! `diesel-async` and `bb8` connection pooling.
//!
//! # Architecture
//!
//! - **Thin adapters**: the reader and repository only translate between
//!   Diesel rows and domain types.
//! - **Internal models**: row structs (`models.rs`) and the schema
//!   (`schema.rs`) never leave this module.
//! - **One session per request**: [`DieselSession`] owns a pooled connection
//!   with an open transaction that the reader, repository and unit of work
//!   share.
//! - **Typed errors**: every Diesel error is mapped to a port error; unique
//!   violations are classified by constraint name.
//!
//! # Example
//!
//! ```ignore
//! use user_service::outbound::persistence::{
//!     DbPool, DieselSession, DieselUserRepository, PoolConfig,
//! };
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/users")).await?;
//! let session = DieselSession::begin(&pool).await?;
//! let repository = DieselUserRepository::new(session.clone());
//! ```

mod diesel_user_reader;
mod diesel_user_repository;
mod error_mapping;
mod migrations;
mod models;
mod pool;
mod schema;
mod session;

pub use diesel_user_reader::DieselUserReader;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MigrationError, run_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
pub use session::{DieselSession, DieselUnitOfWork};
