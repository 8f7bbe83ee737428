//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod event_bus;
mod unit_of_work;
mod user_reader;
mod user_repository;

#[cfg(test)]
pub use event_bus::MockEventBus;
pub use event_bus::{EventBus, EventBusError};
#[cfg(test)]
pub use unit_of_work::MockUnitOfWork;
pub use unit_of_work::{UnitOfWork, UnitOfWorkError};
#[cfg(test)]
pub use user_reader::MockUserReader;
pub use user_reader::{UserReader, UserReaderError};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserRepository, UserRepositoryError};
