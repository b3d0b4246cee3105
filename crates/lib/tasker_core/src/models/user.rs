//! User models.

use serde::{Deserialize, Serialize};

use crate::auth::Credential;

/// Domain user. Never carries the credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
}

/// User with stored credential (for login only).
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub user: User,
    pub credential: Credential,
}

/// A user about to be inserted.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub credential: Credential,
}
