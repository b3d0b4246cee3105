//! Shared helpers for router-level tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response, header};
use serde_json::Value;
use tasker_api::{AppState, config::ApiConfig};
use tasker_core::store::MemoryStore;
use tower::ServiceExt;

pub const SECRET: &str = "integration-test-secret";

/// Router over a fresh in-memory store. The store handle is returned so
/// tests can reach behind the API.
pub fn app() -> (Router, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let state = AppState::new(store.clone(), ApiConfig::for_tests(SECRET));
    (tasker_api::router(state), store)
}

pub async fn send(app: &Router, request: Request<Body>) -> Response<Body> {
    app.clone().oneshot(request).await.expect("request")
}

pub fn json_request(method: &str, uri: &str, token: Option<&str>, body: &Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).expect("build request")
}

pub fn get(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).expect("build request")
}

pub fn form_request(uri: &str, cookie: Option<&str>, form: &str) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(form.to_string())).expect("build request")
}

pub fn page_request(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).expect("build request")
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    String::from_utf8(bytes.to_vec()).expect("utf-8 body")
}

pub async fn body_json(response: Response<Body>) -> Value {
    serde_json::from_str(&body_text(response).await).expect("parse JSON")
}

pub fn location(response: &Response<Body>) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .expect("location header")
}

/// `name=value` of the first `Set-Cookie` header, ready to send back.
pub fn set_cookie_pair(response: &Response<Body>) -> String {
    let raw = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .expect("set-cookie header");
    raw.split(';').next().expect("cookie pair").trim().to_string()
}

/// Register `username` through the JSON API and return a bearer token.
pub async fn register_and_login(app: &Router, username: &str, password: &str) -> String {
    let register = json_request(
        "POST",
        "/api/auth/register",
        None,
        &serde_json::json!({
            "username": username,
            "email": format!("{username}@example.com"),
            "password": password,
        }),
    );
    let resp = send(app, register).await;
    assert_eq!(resp.status(), 201, "register {username}");

    let login = json_request(
        "POST",
        "/api/auth/login",
        None,
        &serde_json::json!({ "username": username, "password": password }),
    );
    let resp = send(app, login).await;
    assert_eq!(resp.status(), 200, "login {username}");
    body_json(resp).await["access_token"]
        .as_str()
        .expect("access_token")
        .to_string()
}
