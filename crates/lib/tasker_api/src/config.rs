//! API server configuration.

use std::path::PathBuf;

use rand::distr::Alphanumeric;
use rand::{Rng, rng};
use tasker_core::auth::password::{BCRYPT_COST_RANGE, DEFAULT_BCRYPT_COST};
use tasker_core::auth::token::{DEFAULT_TOKEN_TTL_SECS, MAX_TOKEN_TTL_SECS};
use tracing::{info, warn};

/// Configuration for the API server.
#[derive(Clone, Debug)]
pub struct ApiConfig {
    /// Address to bind the HTTP listener (e.g. "127.0.0.1:8000").
    pub bind_addr: String,
    /// PostgreSQL connection URL. `None` runs on the in-memory store.
    pub database_url: Option<String>,
    /// Token signing secret.
    pub jwt_secret: String,
    /// Lifetime of issued access tokens, in seconds.
    pub token_ttl_secs: i64,
    /// bcrypt cost for newly hashed passwords.
    pub bcrypt_cost: u32,
}

impl ApiConfig {
    /// Reads configuration from environment variables with sensible defaults.
    ///
    /// | Variable                 | Default                          |
    /// |--------------------------|----------------------------------|
    /// | `BIND_ADDR`              | `127.0.0.1:8000`                 |
    /// | `DATABASE_URL`           | unset (in-memory store)          |
    /// | `JWT_SECRET` / `AUTH_SECRET` | generated & persisted to file |
    /// | `ACCESS_TOKEN_TTL_SECS`  | `3600`                           |
    /// | `BCRYPT_COST`            | `12`                             |
    pub fn from_env() -> Self {
        Self {
            bind_addr: std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:8000".into()),
            database_url: std::env::var("DATABASE_URL")
                .ok()
                .filter(|url| !url.is_empty()),
            jwt_secret: resolve_jwt_secret(),
            token_ttl_secs: env_number("ACCESS_TOKEN_TTL_SECS", DEFAULT_TOKEN_TTL_SECS),
            bcrypt_cost: env_number("BCRYPT_COST", DEFAULT_BCRYPT_COST),
        }
        .validated()
    }

    /// Replace out-of-range values with their defaults.
    ///
    /// The token lifetime must lie in `1..=MAX_TOKEN_TTL_SECS` and the
    /// bcrypt cost in [`BCRYPT_COST_RANGE`].
    pub fn validated(mut self) -> Self {
        if !(1..=MAX_TOKEN_TTL_SECS).contains(&self.token_ttl_secs) {
            warn!(
                value = self.token_ttl_secs,
                default = DEFAULT_TOKEN_TTL_SECS,
                "token lifetime out of range; using default"
            );
            self.token_ttl_secs = DEFAULT_TOKEN_TTL_SECS;
        }
        if !BCRYPT_COST_RANGE.contains(&self.bcrypt_cost) {
            warn!(
                value = self.bcrypt_cost,
                default = DEFAULT_BCRYPT_COST,
                "bcrypt cost out of range; using default"
            );
            self.bcrypt_cost = DEFAULT_BCRYPT_COST;
        }
        self
    }

    /// Configuration for tests: fixed secret, cheap hashing, no database.
    pub fn for_tests(jwt_secret: &str) -> Self {
        Self {
            bind_addr: "127.0.0.1:0".into(),
            database_url: None,
            jwt_secret: jwt_secret.into(),
            token_ttl_secs: DEFAULT_TOKEN_TTL_SECS,
            bcrypt_cost: 4,
        }
    }
}

fn env_number<T: std::str::FromStr + Copy + std::fmt::Display>(name: &str, default: T) -> T {
    match std::env::var(name) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            warn!(name, value = %raw, %default, "ignoring unparsable setting");
            default
        }),
        Err(_) => default,
    }
}

/// Resolve the JWT secret: env var `JWT_SECRET` → `AUTH_SECRET` → persisted file.
pub fn resolve_jwt_secret() -> String {
    if let Ok(secret) = std::env::var("JWT_SECRET")
        && !secret.is_empty()
    {
        return secret;
    }
    if let Ok(secret) = std::env::var("AUTH_SECRET")
        && !secret.is_empty()
    {
        return secret;
    }
    // Generate and persist
    let secret_path = jwt_secret_path();
    if let Ok(existing) = std::fs::read_to_string(&secret_path) {
        let trimmed = existing.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }
    let secret: String = rng()
        .sample_iter(&Alphanumeric)
        .take(64)
        .map(char::from)
        .collect();
    if let Some(parent) = secret_path.parent()
        && let Err(e) = std::fs::create_dir_all(parent)
    {
        warn!(error = %e, "could not create directory for JWT secret");
    }
    match std::fs::write(&secret_path, &secret) {
        Ok(()) => info!(path = %secret_path.display(), "generated new JWT secret"),
        Err(e) => warn!(error = %e, "generated JWT secret could not be persisted; tokens will not survive a restart"),
    }
    secret
}

/// Path to the persisted JWT secret file.
fn jwt_secret_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("tasker")
        .join("jwt-secret")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_range_values_are_kept() {
        let mut config = ApiConfig::for_tests("s");
        config.token_ttl_secs = 1;
        config.bcrypt_cost = 31;
        let config = config.validated();
        assert_eq!(config.token_ttl_secs, 1);
        assert_eq!(config.bcrypt_cost, 31);

        let config = ApiConfig::for_tests("s").validated();
        assert_eq!(config.bcrypt_cost, 4);
    }

    #[test]
    fn out_of_range_lifetime_falls_back_to_default() {
        for ttl in [0, -5, MAX_TOKEN_TTL_SECS + 1, i64::MAX] {
            let mut config = ApiConfig::for_tests("s");
            config.token_ttl_secs = ttl;
            assert_eq!(config.validated().token_ttl_secs, DEFAULT_TOKEN_TTL_SECS, "{ttl}");
        }
    }

    #[test]
    fn out_of_range_cost_falls_back_to_default() {
        for cost in [0, 3, 32, u32::MAX] {
            let mut config = ApiConfig::for_tests("s");
            config.bcrypt_cost = cost;
            assert_eq!(config.validated().bcrypt_cost, DEFAULT_BCRYPT_COST, "{cost}");
        }
    }

    #[test]
    fn validated_config_issues_usable_tokens() {
        let mut config = ApiConfig::for_tests("s");
        config.token_ttl_secs = i64::MAX;
        let config = config.validated();
        let tokens = tasker_core::auth::TokenService::new(
            config.jwt_secret.as_bytes(),
            config.token_ttl_secs,
        );
        let token = tokens.issue("alice").unwrap();
        assert_eq!(tokens.validate(&token).unwrap(), "alice");
    }
}
