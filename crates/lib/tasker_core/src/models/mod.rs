//! Domain models.
//!
//! Internal domain types, distinct from the request/response shapes in
//! `tasker_api::models`.

pub mod task;
pub mod user;

pub use task::{NewTask, Task, TaskChanges};
pub use user::{NewUser, User, UserRecord};
