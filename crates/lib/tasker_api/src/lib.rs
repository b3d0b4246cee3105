//! # tasker_api
//!
//! HTTP API and browser UI for Tasker.

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod views;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tasker_core::auth::TokenService;
use tasker_core::store::Store;
use tower_http::cors::{Any, CorsLayer};

use crate::config::ApiConfig;
use crate::handlers::{auth, tasks, ui};

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// User and task persistence.
    pub store: Arc<dyn Store>,
    /// Issues and validates identity tokens.
    pub tokens: TokenService,
    /// API configuration.
    pub config: ApiConfig,
}

impl AppState {
    /// Build state, deriving the token service from `config`.
    pub fn new(store: Arc<dyn Store>, config: ApiConfig) -> Self {
        let tokens = TokenService::new(config.jwt_secret.as_bytes(), config.token_ttl_secs);
        Self {
            store,
            tokens,
            config,
        }
    }
}

/// Builds the Axum router with all routes and shared state.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // JSON API (bearer token)
    let api = Router::new()
        .route("/api/auth/register", post(auth::register_handler))
        .route("/api/auth/login", post(auth::login_handler))
        .route("/api/auth/me", get(auth::me_handler))
        .route(
            "/tasks",
            get(tasks::list_tasks_handler).post(tasks::create_task_handler),
        );

    // Browser pages (cookie)
    let pages = Router::new()
        .route("/", get(ui::home))
        .route("/login", get(ui::login_page).post(ui::login_submit))
        .route("/register", get(ui::register_page).post(ui::register_submit))
        .route("/logout", get(ui::logout))
        .route("/tasks/ui", get(ui::task_list_page))
        .route(
            "/tasks/create",
            get(ui::create_task_page).post(ui::create_task_submit),
        )
        .route("/tasks/{task_id}/edit", get(ui::edit_task_page).post(ui::edit_task_submit))
        .route("/tasks/{task_id}/delete", post(ui::delete_task_submit))
        .route(views::FORMS_SCRIPT_PATH, get(ui::forms_script));

    // `/tasks/{task_id}` serves the page on GET and the JSON API otherwise.
    let task_item = Router::new().route(
        "/tasks/{task_id}",
        get(ui::task_page)
            .put(tasks::update_task_handler)
            .delete(tasks::delete_task_handler),
    );

    Router::new()
        .merge(api)
        .merge(pages)
        .merge(task_item)
        .layer(cors)
        .with_state(state)
}
