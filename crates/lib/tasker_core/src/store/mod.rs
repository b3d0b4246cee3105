//! Persistence: users and their tasks.
//!
//! Handlers talk to the [`Store`] trait object held in application state.
//! [`PgStore`] backs it with PostgreSQL; [`MemoryStore`] keeps everything
//! in process for tests and database-less runs.

pub mod memory;
pub mod pg;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{NewTask, NewUser, Task, TaskChanges, User, UserRecord};

pub use memory::MemoryStore;
pub use pg::PgStore;

/// Default page size for task listings.
pub const DEFAULT_TASK_LIMIT: i64 = 100;

/// Persistence errors.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    DbError(#[from] sqlx::Error),
}

/// User persistence. Also the lookup used to resolve principals.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Fetch a user and stored credential by username.
    async fn find_by_username(&self, username: &str) -> Result<Option<UserRecord>, StoreError>;

    /// Check whether either the username or the email is already registered.
    async fn username_or_email_taken(&self, username: &str, email: &str)
    -> Result<bool, StoreError>;

    /// Create a new user. Fails with [`StoreError::Conflict`] on a duplicate
    /// username or email.
    async fn create_user(&self, user: NewUser) -> Result<User, StoreError>;

    /// Delete a user and, with it, their tasks. Returns whether a row existed.
    async fn delete_user(&self, user_id: i64) -> Result<bool, StoreError>;
}

/// Task persistence, keyed by owner.
#[async_trait]
pub trait TaskStore: Send + Sync {
    async fn get_task(&self, task_id: i64) -> Result<Option<Task>, StoreError>;

    /// Tasks owned by `owner_id`, ordered by id, paged by `skip`/`limit`.
    async fn list_tasks(&self, owner_id: i64, skip: i64, limit: i64)
    -> Result<Vec<Task>, StoreError>;

    async fn create_task(&self, owner_id: i64, task: NewTask) -> Result<Task, StoreError>;

    /// Apply `changes` to a task. Returns `None` if the task does not exist.
    async fn update_task(&self, task_id: i64, changes: TaskChanges)
    -> Result<Option<Task>, StoreError>;

    /// Returns whether a row existed.
    async fn delete_task(&self, task_id: i64) -> Result<bool, StoreError>;
}

/// Everything the application needs from persistence.
pub trait Store: UserStore + TaskStore {}

impl<T: UserStore + TaskStore> Store for T {}
