//! Password hashing via bcrypt.

use std::fmt;
use std::ops::RangeInclusive;

use tracing::debug;

use super::AuthError;

/// Default bcrypt cost factor.
pub const DEFAULT_BCRYPT_COST: u32 = 12;

/// Cost factors bcrypt accepts.
pub const BCRYPT_COST_RANGE: RangeInclusive<u32> = 4..=31;

/// bcrypt only reads this many bytes of a password; anything after is
/// ignored when hashing and verifying.
pub const BCRYPT_MAX_PASSWORD_BYTES: usize = 72;

/// Stored one-way form of a password.
///
/// Holds a bcrypt modular-crypt string (`$2b$<cost>$<salt><hash>`), so the
/// algorithm, cost and salt travel with the hash.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Wrap a hash loaded from storage. No parsing happens here; a malformed
    /// value simply never verifies.
    pub fn from_stored(hash: impl Into<String>) -> Self {
        Self(hash.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(..)")
    }
}

/// Hash a password with bcrypt at [`DEFAULT_BCRYPT_COST`].
pub fn hash_password(password: &str) -> Result<Credential, AuthError> {
    hash_password_with_cost(password, DEFAULT_BCRYPT_COST)
}

/// Hash a password with bcrypt at the given cost, using a fresh random salt.
///
/// Only the first [`BCRYPT_MAX_PASSWORD_BYTES`] bytes of `password` take
/// part. A cost outside [`BCRYPT_COST_RANGE`] fails with
/// [`AuthError::Internal`].
pub fn hash_password_with_cost(password: &str, cost: u32) -> Result<Credential, AuthError> {
    bcrypt::hash(password, cost)
        .map(Credential)
        .map_err(|e| AuthError::Internal(format!("bcrypt hash: {e}")))
}

/// Verify a password against a stored credential.
///
/// Returns `false` for a wrong password and for a credential that cannot be
/// parsed. As with hashing, bytes past [`BCRYPT_MAX_PASSWORD_BYTES`] are
/// not compared.
pub fn verify_password(password: &str, credential: &Credential) -> bool {
    match bcrypt::verify(password, credential.as_str()) {
        Ok(matches) => matches,
        Err(e) => {
            debug!(error = %e, "stored credential is not a valid bcrypt hash");
            false
        }
    }
}
