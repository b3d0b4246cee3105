//! Identity tokens: HS256-signed JWTs asserting a username.
//!
//! Tokens are self-contained. There is no server-side revocation list, so a
//! token is valid strictly before its `exp` second and expired from it on.

use std::fmt;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::Utc;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::AuthError;

/// Default token lifetime: one hour.
pub const DEFAULT_TOKEN_TTL_SECS: i64 = 60 * 60;

/// Longest lifetime the server can be configured with: one year.
pub const MAX_TOKEN_TTL_SECS: i64 = 365 * 24 * 60 * 60;

/// The only algorithm tokens are signed or accepted with.
const SIGNING_ALGORITHM: Algorithm = Algorithm::HS256;

/// Why a token was rejected.
///
/// Callers collapse all variants into a single "unauthenticated" outcome;
/// the distinction exists for logs and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("token is malformed")]
    Malformed,

    #[error("token signature or algorithm is invalid")]
    BadSignature,

    #[error("token has expired")]
    Expired,
}

/// JWT claims embedded in identity tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject: the username.
    pub sub: String,
    /// Issued at (unix timestamp).
    pub iat: i64,
    /// Expiry (unix timestamp), always `iat + lifetime`.
    pub exp: i64,
}

/// Issues and validates identity tokens with a server-held secret.
///
/// Immutable after construction and cheap to clone; share one instance
/// across all requests.
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    default_ttl_secs: i64,
}

impl fmt::Debug for TokenService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenService")
            .field("algorithm", &SIGNING_ALGORITHM)
            .field("default_ttl_secs", &self.default_ttl_secs)
            .finish_non_exhaustive()
    }
}

impl TokenService {
    /// Build a service signing with `secret` and issuing tokens that live
    /// `default_ttl_secs` seconds unless a caller overrides it.
    pub fn new(secret: &[u8], default_ttl_secs: i64) -> Self {
        let mut validation = Validation::new(SIGNING_ALGORITHM);
        // Expiry is checked against our own clock reading in `validate_at`.
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["sub", "exp"]);

        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
            default_ttl_secs,
        }
    }

    /// Lifetime applied by [`TokenService::issue`].
    pub fn default_ttl_secs(&self) -> i64 {
        self.default_ttl_secs
    }

    /// Issue a token for `username` with the default lifetime.
    pub fn issue(&self, username: &str) -> Result<String, AuthError> {
        self.issue_with_ttl(username, self.default_ttl_secs)
    }

    /// Issue a token for `username` that expires `ttl_secs` from now.
    pub fn issue_with_ttl(&self, username: &str, ttl_secs: i64) -> Result<String, AuthError> {
        self.issue_at(username, ttl_secs, Utc::now().timestamp())
    }

    /// Issue a token as if the clock read `now`.
    ///
    /// The lifetime must be positive; an expiry past `i64::MAX` is an
    /// internal error rather than a wrapped timestamp.
    pub fn issue_at(&self, username: &str, ttl_secs: i64, now: i64) -> Result<String, AuthError> {
        if ttl_secs <= 0 {
            return Err(AuthError::ValidationError(format!(
                "token lifetime must be positive, got {ttl_secs}"
            )));
        }
        let exp = now.checked_add(ttl_secs).ok_or_else(|| {
            AuthError::Internal(format!("token expiry overflows for lifetime {ttl_secs}"))
        })?;

        let claims = TokenClaims {
            sub: username.to_string(),
            iat: now,
            exp,
        };
        encode(&Header::new(SIGNING_ALGORITHM), &claims, &self.encoding)
            .map_err(|e| AuthError::Internal(format!("jwt encode: {e}")))
    }

    /// Validate a bare token and return the username it asserts.
    pub fn validate(&self, token: &str) -> Result<String, TokenError> {
        self.validate_at(token, Utc::now().timestamp())
            .map(|claims| claims.sub)
    }

    /// Validate a bare token against the clock reading `now`.
    ///
    /// Checks run in order: structure, algorithm, signature, claims, expiry.
    /// No claim is returned unless every check passes.
    pub fn validate_at(&self, token: &str, now: i64) -> Result<TokenClaims, TokenError> {
        check_algorithm(token)?;

        let claims = decode::<TokenClaims>(token, &self.decoding, &self.validation)
            .map_err(|e| classify(e.kind()))?
            .claims;

        if now >= claims.exp {
            return Err(TokenError::Expired);
        }
        Ok(claims)
    }
}

/// Header fields we inspect before handing the token to `jsonwebtoken`.
#[derive(Deserialize)]
struct RawHeader {
    alg: String,
}

/// Reject anything that is not a three-part JWT whose header names HS256.
///
/// `jsonwebtoken` cannot even parse `alg: none`, which would surface as a
/// JSON error; here it is reported as a signature failure instead.
fn check_algorithm(token: &str) -> Result<(), TokenError> {
    let mut parts = token.split('.');
    let (Some(header), Some(_), Some(_), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(TokenError::Malformed);
    };

    let raw = URL_SAFE_NO_PAD
        .decode(header)
        .map_err(|_| TokenError::Malformed)?;
    let header: RawHeader = serde_json::from_slice(&raw).map_err(|_| TokenError::Malformed)?;

    if header.alg != "HS256" {
        return Err(TokenError::BadSignature);
    }
    Ok(())
}

fn classify(kind: &ErrorKind) -> TokenError {
    match kind {
        ErrorKind::InvalidSignature
        | ErrorKind::InvalidAlgorithm
        | ErrorKind::InvalidAlgorithmName
        | ErrorKind::InvalidKeyFormat => TokenError::BadSignature,
        ErrorKind::ExpiredSignature => TokenError::Expired,
        _ => TokenError::Malformed,
    }
}
