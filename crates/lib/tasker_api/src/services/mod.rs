//! Services shared by the JSON API and the browser UI.

pub mod auth;
pub mod cookies;
pub mod tasks;
