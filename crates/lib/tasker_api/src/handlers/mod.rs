//! Request handlers.

pub mod auth;
pub mod tasks;
pub mod ui;
