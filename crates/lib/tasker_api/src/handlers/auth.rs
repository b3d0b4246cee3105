//! JSON authentication handlers.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use tasker_core::models::User;

use crate::AppState;
use crate::error::AppResult;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::{LoginRequest, RegisterRequest, TokenResponse};
use crate::services::auth::{self, Registration};

/// `POST /api/auth/register` — create a new account.
pub async fn register_handler(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<User>)> {
    let user = auth::register(
        &*state.store,
        state.config.bcrypt_cost,
        Registration {
            username: &body.username,
            email: &body.email,
            password: &body.password,
        },
    )
    .await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// `POST /api/auth/login` — exchange username + password for a bearer token.
pub async fn login_handler(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> AppResult<Json<TokenResponse>> {
    let resp = auth::login(&*state.store, &state.tokens, &body.username, &body.password).await?;
    Ok(Json(resp))
}

/// `GET /api/auth/me` — the user the bearer token resolves to.
pub async fn me_handler(AuthenticatedUser(user): AuthenticatedUser) -> Json<User> {
    Json(user)
}
