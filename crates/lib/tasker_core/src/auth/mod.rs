//! Identity core.
//!
//! Password hashing, signed identity tokens, token carriers and per-request
//! principal resolution. Shared by the JSON API and the browser UI.

pub mod carrier;
pub mod password;
pub mod principal;
pub mod token;

use thiserror::Error;

use crate::store::StoreError;

pub use carrier::{TokenCarrier, extract_from_carrier};
pub use password::{Credential, hash_password, hash_password_with_cost, verify_password};
pub use principal::resolve_principal;
pub use token::{TokenClaims, TokenError, TokenService};

/// Authentication errors.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Unknown user or wrong password. The two are never told apart.
    #[error("Invalid credentials")]
    CredentialError,

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Internal error: {0}")]
    Internal(String),
}
