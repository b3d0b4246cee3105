//! Authentication service — registration and login flows over `tasker_core`.

use tasker_core::auth::{self, AuthError, TokenService};
use tasker_core::models::{NewUser, User};
use tasker_core::store::UserStore;
use tracing::info;

use crate::error::{AppError, AppResult};
use crate::models::TokenResponse;

/// Input to [`register`], shared by the JSON and form endpoints.
#[derive(Debug)]
pub struct Registration<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub password: &'a str,
}

/// Register a new account.
pub async fn register<S: UserStore + ?Sized>(
    users: &S,
    bcrypt_cost: u32,
    registration: Registration<'_>,
) -> AppResult<User> {
    let username = registration.username.trim();
    let email = registration.email.trim();

    if username.is_empty() {
        return Err(AppError::Validation("Username is required".into()));
    }
    if email.is_empty() {
        return Err(AppError::Validation("Email is required".into()));
    }
    if registration.password.is_empty() {
        return Err(AppError::Validation("Password is required".into()));
    }

    if users.username_or_email_taken(username, email).await? {
        return Err(AppError::Validation(
            "Username or email already registered".into(),
        ));
    }

    let credential = auth::hash_password_with_cost(registration.password, bcrypt_cost)?;
    let user = users
        .create_user(NewUser {
            username: username.to_string(),
            email: email.to_string(),
            credential,
        })
        .await?;

    info!(user_id = user.id, username = %user.username, "registered user");
    Ok(user)
}

/// Check a username/password pair and issue an access token.
///
/// The username is trimmed as on registration. Unknown usernames and wrong
/// passwords both fail with [`AuthError::CredentialError`].
pub async fn login<S: UserStore + ?Sized>(
    users: &S,
    tokens: &TokenService,
    username: &str,
    password: &str,
) -> AppResult<TokenResponse> {
    let record = users
        .find_by_username(username.trim())
        .await?
        .ok_or(AuthError::CredentialError)?;

    if !auth::verify_password(password, &record.credential) {
        return Err(AuthError::CredentialError.into());
    }

    let access_token = tokens.issue(&record.user.username)?;
    info!(user_id = record.user.id, "user logged in");

    Ok(TokenResponse {
        access_token,
        token_type: "bearer".to_string(),
        expires_in: tokens.default_ttl_secs(),
    })
}
