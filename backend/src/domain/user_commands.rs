//! Write-side use cases for users.
//!
//! Commands run inside the request's unit of work. A handler loads or builds
//! the aggregate, persists it through the [`UserRepository`], commits, and
//! only then publishes the events the aggregate recorded. Any failure before
//! the commit rolls the unit of work back.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, warn};

use super::ports::{EventBus, UnitOfWork, UserRepository};
use super::{Error, FullName, User, UserEvent, UserId, Username};

/// A request to change state with a fixed result type.
pub trait Command: Send + Sync {
    /// Value produced when the command succeeds.
    type Output: Send;
}

/// Executes one kind of [`Command`].
#[async_trait]
pub trait CommandHandler<C: Command>: Send + Sync {
    /// Run `command`.
    async fn handle(&self, command: C) -> Result<C::Output, Error>;
}

/// Register a new user under a fresh identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateUser {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub middle_name: Option<String>,
}

impl Command for CreateUser {
    type Output = UserId;
}

/// Change the username of an existing user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateUsername {
    pub user_id: UserId,
    pub username: String,
}

impl Command for UpdateUsername {
    type Output = ();
}

/// Replace the full name of an existing user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetFullName {
    pub user_id: UserId,
    pub first_name: String,
    pub last_name: String,
    pub middle_name: Option<String>,
}

impl Command for SetFullName {
    type Output = ();
}

/// Handles every user command against one request's ports.
#[derive(Clone)]
pub struct UserCommandHandler {
    repository: Arc<dyn UserRepository>,
    unit_of_work: Arc<dyn UnitOfWork>,
    event_bus: Arc<dyn EventBus>,
}

impl UserCommandHandler {
    pub fn new(
        repository: Arc<dyn UserRepository>,
        unit_of_work: Arc<dyn UnitOfWork>,
        event_bus: Arc<dyn EventBus>,
    ) -> Self {
        Self {
            repository,
            unit_of_work,
            event_bus,
        }
    }

    async fn create(&self, command: CreateUser) -> Result<(UserId, Vec<UserEvent>), Error> {
        let username = Username::new(command.username)?;
        let full_name = FullName::new(command.first_name, command.last_name, command.middle_name)?;
        let mut user = User::create(UserId::random(), username, full_name);

        self.repository.add_user(&user).await?;
        Ok((user.id().clone(), user.take_events()))
    }

    async fn rename(&self, command: UpdateUsername) -> Result<((), Vec<UserEvent>), Error> {
        let username = Username::new(command.username)?;
        let mut user = self.repository.acquire_user_by_id(&command.user_id).await?;

        if user.set_username(username) {
            self.repository.update_user(&user).await?;
        }
        Ok(((), user.take_events()))
    }

    async fn set_full_name(&self, command: SetFullName) -> Result<((), Vec<UserEvent>), Error> {
        let full_name = FullName::new(command.first_name, command.last_name, command.middle_name)?;
        let mut user = self.repository.acquire_user_by_id(&command.user_id).await?;

        if user.set_full_name(full_name) {
            self.repository.update_user(&user).await?;
        }
        Ok(((), user.take_events()))
    }

    /// Commit or roll back depending on `outcome`, then publish on success.
    ///
    /// Publishing happens after the commit, so a broker failure cannot undo
    /// stored data; it is logged and the command still succeeds.
    async fn finish<T: Send>(&self, outcome: Result<(T, Vec<UserEvent>), Error>) -> Result<T, Error> {
        let (output, events) = match outcome {
            Ok(value) => value,
            Err(err) => {
                if let Err(rollback_err) = self.unit_of_work.rollback().await {
                    warn!(error = %rollback_err, "rollback after failed command did not complete");
                }
                return Err(err);
            }
        };

        self.unit_of_work.commit().await?;

        if !events.is_empty() {
            if let Err(publish_err) = self.event_bus.publish(&events).await {
                error!(
                    error = %publish_err,
                    event_count = events.len(),
                    "committed user events were not published"
                );
            }
        }
        Ok(output)
    }
}

#[async_trait]
impl CommandHandler<CreateUser> for UserCommandHandler {
    async fn handle(&self, command: CreateUser) -> Result<UserId, Error> {
        let outcome = self.create(command).await;
        self.finish(outcome).await
    }
}

#[async_trait]
impl CommandHandler<UpdateUsername> for UserCommandHandler {
    async fn handle(&self, command: UpdateUsername) -> Result<(), Error> {
        let outcome = self.rename(command).await;
        self.finish(outcome).await
    }
}

#[async_trait]
impl CommandHandler<SetFullName> for UserCommandHandler {
    async fn handle(&self, command: SetFullName) -> Result<(), Error> {
        let outcome = self.set_full_name(command).await;
        self.finish(outcome).await
    }
}

#[cfg(test)]
#[path = "user_commands_tests.rs"]
mod tests;
