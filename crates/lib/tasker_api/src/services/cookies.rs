//! Cookie service — set/clear the httpOnly access cookie.

use axum_extra::extract::cookie::{Cookie, SameSite};
use tasker_core::auth::carrier::bearer_value;
use time::Duration;

/// Cookie name for the access token.
pub const ACCESS_COOKIE: &str = "access_token";

/// Build a httpOnly cookie holding `Bearer <token>`.
pub fn access_cookie(token: &str, max_age_secs: i64) -> Cookie<'static> {
    Cookie::build((ACCESS_COOKIE.to_string(), bearer_value(token)))
        .http_only(true)
        .same_site(SameSite::Lax)
        .path("/".to_string())
        .max_age(Duration::seconds(max_age_secs))
        .build()
}

/// Build an expired cookie to clear auth state.
pub fn clear_access_cookie() -> Cookie<'static> {
    Cookie::build((ACCESS_COOKIE.to_string(), String::new()))
        .http_only(true)
        .same_site(SameSite::Lax)
        .path("/".to_string())
        .max_age(Duration::ZERO)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn access_cookie_is_http_only_and_prefixed() {
        let cookie = access_cookie("abc.def.ghi", 3600);
        assert_eq!(cookie.name(), "access_token");
        assert_eq!(cookie.value(), "Bearer abc.def.ghi");
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.max_age(), Some(Duration::seconds(3600)));
    }

    #[test]
    fn clearing_cookie_expires_immediately() {
        let cookie = clear_access_cookie();
        assert_eq!(cookie.value(), "");
        assert_eq!(cookie.max_age(), Some(Duration::ZERO));
    }
}
