//! Authentication extractors — resolve the request principal from the
//! `Authorization` header (JSON API) or the access cookie (browser pages).

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::response::Redirect;
use axum_extra::extract::cookie::CookieJar;
use tasker_core::auth::{TokenCarrier, resolve_principal};
use tasker_core::models::User;

use crate::AppState;
use crate::error::AppError;
use crate::services::cookies::ACCESS_COOKIE;

/// Where browser pages send signed-out visitors.
pub const LOGIN_PATH: &str = "/login";

/// Principal carried by `Authorization: Bearer <token>`.
///
/// Rejects with 401 when the header is missing or the token, or its
/// subject, does not check out.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub User);

impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let carrier = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(TokenCarrier::Header);

        resolve_principal(&state.tokens, carrier, &*state.store)
            .await
            .map(AuthenticatedUser)
            .ok_or_else(|| AppError::Unauthorized("Could not validate credentials".into()))
    }
}

/// Principal carried by the access cookie, if any. Never rejects.
#[derive(Debug, Clone)]
pub struct BrowserUser(pub Option<User>);

impl FromRequestParts<AppState> for BrowserUser {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let carrier = jar
            .get(ACCESS_COOKIE)
            .map(|cookie| TokenCarrier::Cookie(cookie.value()));

        Ok(BrowserUser(
            resolve_principal(&state.tokens, carrier, &*state.store).await,
        ))
    }
}

/// Signed-in browser user. Redirects to the login page otherwise.
#[derive(Debug, Clone)]
pub struct SignedIn(pub User);

impl FromRequestParts<AppState> for SignedIn {
    type Rejection = Redirect;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let Ok(BrowserUser(user)) = BrowserUser::from_request_parts(parts, state).await;
        user.map(SignedIn).ok_or_else(|| Redirect::to(LOGIN_PATH))
    }
}
