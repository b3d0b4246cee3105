//! JSON authentication endpoints and bearer-token resolution.

mod common;

use axum::http::{StatusCode, header};
use serde_json::json;
use tasker_core::auth::TokenService;
use tasker_core::store::UserStore;

use common::*;

#[tokio::test]
async fn register_login_and_me() {
    let (app, _) = app();
    let token = register_and_login(&app, "alice", "secret123").await;

    let resp = send(&app, get("/api/auth/me", Some(&token))).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let me = body_json(resp).await;
    assert_eq!(me["username"], "alice");
    assert_eq!(me["email"], "alice@example.com");
    assert!(me.get("hashed_password").is_none());
    assert!(me.get("credential").is_none());
}

#[tokio::test]
async fn login_returns_bearer_token_shape() {
    let (app, _) = app();
    register_and_login(&app, "alice", "secret123").await;

    let resp = send(
        &app,
        json_request(
            "POST",
            "/api/auth/login",
            None,
            &json!({ "username": "alice", "password": "secret123" }),
        ),
    )
    .await;
    let body = body_json(resp).await;
    assert_eq!(body["token_type"], "bearer");
    assert_eq!(body["expires_in"], 3600);
    let token = body["access_token"].as_str().unwrap();
    assert_eq!(TokenService::new(SECRET.as_bytes(), 3600).validate(token).unwrap(), "alice");
}

#[tokio::test]
async fn bad_credentials_are_indistinguishable() {
    let (app, _) = app();
    register_and_login(&app, "alice", "secret123").await;

    let mut bodies = Vec::new();
    for (username, password) in [("alice", "wrongpass"), ("nobody", "secret123")] {
        let resp = send(
            &app,
            json_request(
                "POST",
                "/api/auth/login",
                None,
                &json!({ "username": username, "password": password }),
            ),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(resp.headers()[header::WWW_AUTHENTICATE], "Bearer");
        bodies.push(body_json(resp).await);
    }
    assert_eq!(bodies[0], bodies[1]);
}

#[tokio::test]
async fn duplicate_registration_is_a_bad_request() {
    let (app, _) = app();
    register_and_login(&app, "alice", "secret123").await;

    let resp = send(
        &app,
        json_request(
            "POST",
            "/api/auth/register",
            None,
            &json!({ "username": "alice", "email": "other@example.com", "password": "x" }),
        ),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = body_json(resp).await;
    assert_eq!(body["message"], "Username or email already registered");
}

#[tokio::test]
async fn missing_or_rejected_tokens_are_unauthorized() {
    let (app, _) = app();
    register_and_login(&app, "alice", "secret123").await;

    let forged = TokenService::new(b"not-the-server-secret", 3600)
        .issue("alice")
        .unwrap();
    let expired = TokenService::new(SECRET.as_bytes(), 3600)
        .issue_at("alice", 60, chrono::Utc::now().timestamp() - 3_600)
        .unwrap();

    for token in [None, Some("garbage"), Some(forged.as_str()), Some(expired.as_str())] {
        let resp = send(&app, get("/api/auth/me", token)).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED, "{token:?}");
        let body = body_json(resp).await;
        assert_eq!(body["message"], "Could not validate credentials");
    }
}

#[tokio::test]
async fn token_of_deleted_user_is_unauthorized() {
    let (app, store) = app();
    let token = register_and_login(&app, "alice", "secret123").await;

    let alice = store.find_by_username("alice").await.unwrap().unwrap();
    assert!(store.delete_user(alice.user.id).await.unwrap());

    let resp = send(&app, get("/api/auth/me", Some(&token))).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn access_cookie_does_not_authenticate_api_routes() {
    let (app, _) = app();
    let token = register_and_login(&app, "alice", "secret123").await;

    let request = page_request("/api/auth/me", Some(&format!("access_token=Bearer {token}")));
    let resp = send(&app, request).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}
