//! In-memory adapters for the user ports.
//!
//! Used when no database is configured and by tests that exercise the full
//! read/write contract without PostgreSQL.

mod store;
mod user_reader;
mod user_repository;

pub use store::{InMemorySession, InMemoryUnitOfWork, InMemoryUserStore};
pub use user_reader::InMemoryUserReader;
pub use user_repository::InMemoryUserRepository;
