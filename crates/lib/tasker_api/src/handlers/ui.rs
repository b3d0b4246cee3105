//! Browser-facing pages: account forms and task screens.
//!
//! Identity comes from the `access_token` cookie. Signed-out visitors are
//! redirected to `/login`; outcomes are reported through `msg`/`error`
//! query parameters on the redirect target.

use axum::Form;
use axum::extract::{Path, Query, State};
use axum::http::{StatusCode, header};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum_extra::extract::cookie::CookieJar;
use tasker_core::models::{NewTask, TaskChanges};
use tasker_core::store::{DEFAULT_TASK_LIMIT, TaskStore};
use tracing::debug;

use crate::AppState;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::{BrowserUser, SignedIn};
use crate::models::{FlashQuery, LoginForm, RegisterForm, TaskForm};
use crate::services::tasks::{self, Lookup};
use crate::services::{auth, cookies};
use crate::views;

/// `path?key=value` with `value` form-encoded.
fn with_flash(path: &str, key: &str, value: &str) -> String {
    let encoded: String = url::form_urlencoded::byte_serialize(value.as_bytes()).collect();
    format!("{path}?{key}={encoded}")
}

fn flash_error(message: impl Into<String>) -> FlashQuery {
    FlashQuery {
        msg: None,
        error: Some(message.into()),
    }
}

// ---------------------------------------------------------------------------
// Account pages
// ---------------------------------------------------------------------------

/// `GET /`
pub async fn home(BrowserUser(user): BrowserUser, Query(flash): Query<FlashQuery>) -> Html<String> {
    Html(views::render_home(user.as_ref(), &flash))
}

/// `GET /login`
pub async fn login_page(
    BrowserUser(user): BrowserUser,
    Query(flash): Query<FlashQuery>,
) -> Html<String> {
    Html(views::render_login(user.as_ref(), &flash))
}

/// `POST /login` — on success set the access cookie and go to the task list.
pub async fn login_submit(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Response {
    match auth::login(&*state.store, &state.tokens, &form.username, &form.password).await {
        Ok(token) => {
            let cookie = cookies::access_cookie(&token.access_token, token.expires_in);
            (
                jar.add(cookie),
                Redirect::to(&with_flash("/tasks/ui", "msg", "Welcome back!")),
            )
                .into_response()
        }
        Err(AppError::Unauthorized(message)) => (
            StatusCode::UNAUTHORIZED,
            Html(views::render_login(None, &flash_error(message))),
        )
            .into_response(),
        Err(e) => e.into_response(),
    }
}

/// `GET /register`
pub async fn register_page(
    BrowserUser(user): BrowserUser,
    Query(flash): Query<FlashQuery>,
) -> Html<String> {
    Html(views::render_register(user.as_ref(), &flash))
}

/// `POST /register` — on success go to the login page.
pub async fn register_submit(State(state): State<AppState>, Form(form): Form<RegisterForm>) -> Response {
    if form.password != form.confirm_password {
        return (
            StatusCode::BAD_REQUEST,
            Html(views::render_register(None, &flash_error("Passwords do not match"))),
        )
            .into_response();
    }

    let registration = auth::Registration {
        username: &form.username,
        email: &form.email,
        password: &form.password,
    };
    match auth::register(&*state.store, state.config.bcrypt_cost, registration).await {
        Ok(_) => Redirect::to(&with_flash(
            "/login",
            "msg",
            "Account created successfully! Please log in.",
        ))
        .into_response(),
        Err(AppError::Validation(message)) => (
            StatusCode::BAD_REQUEST,
            Html(views::render_register(None, &flash_error(message))),
        )
            .into_response(),
        Err(e) => e.into_response(),
    }
}

/// `GET /logout` — drop the access cookie. The token itself stays valid
/// until it expires.
pub async fn logout(jar: CookieJar) -> (CookieJar, Redirect) {
    (
        jar.add(cookies::clear_access_cookie()),
        Redirect::to(&with_flash("/", "msg", "Logged out successfully!")),
    )
}

// ---------------------------------------------------------------------------
// Task pages
// ---------------------------------------------------------------------------

/// `GET /tasks/ui`
pub async fn task_list_page(
    State(state): State<AppState>,
    SignedIn(user): SignedIn,
    Query(flash): Query<FlashQuery>,
) -> AppResult<Html<String>> {
    let tasks = tasks::list(&*state.store, &user, 0, DEFAULT_TASK_LIMIT, None).await?;
    Ok(Html(views::render_task_list(&user, &tasks, &flash)))
}

/// `GET /tasks/create`
pub async fn create_task_page(SignedIn(user): SignedIn, Query(flash): Query<FlashQuery>) -> Html<String> {
    Html(views::render_task_form(&user, None, &flash))
}

/// `POST /tasks/create`
pub async fn create_task_submit(
    State(state): State<AppState>,
    SignedIn(user): SignedIn,
    Form(form): Form<TaskForm>,
) -> AppResult<Redirect> {
    if form.title.trim().is_empty() {
        return Ok(Redirect::to(&with_flash("/tasks/create", "error", "Title is required")));
    }
    let Ok(deadline) = tasks::parse_deadline(&form.deadline) else {
        return Ok(Redirect::to(&with_flash(
            "/tasks/create",
            "error",
            "Invalid deadline format",
        )));
    };

    let task = state
        .store
        .create_task(
            user.id,
            NewTask {
                title: form.title,
                description: non_blank(form.description),
                completed: tasks::parse_completed(&form.completed),
                deadline,
            },
        )
        .await?;
    debug!(task_id = task.id, user_id = user.id, "created task from form");

    Ok(Redirect::to(&with_flash("/tasks/ui", "msg", "Task created successfully!")))
}

/// `GET /tasks/{task_id}`
pub async fn task_page(
    State(state): State<AppState>,
    SignedIn(user): SignedIn,
    Path(task_id): Path<i64>,
    Query(flash): Query<FlashQuery>,
) -> AppResult<Response> {
    Ok(match tasks::lookup(&*state.store, &user, task_id).await? {
        Lookup::Owned(task) => Html(views::render_task_view(&user, &task, &flash)).into_response(),
        Lookup::Missing => {
            Redirect::to(&with_flash("/tasks/ui", "error", "Task not found")).into_response()
        }
        Lookup::Foreign => {
            Redirect::to(&with_flash("/tasks/ui", "error", "Access denied")).into_response()
        }
    })
}

/// `GET /tasks/{task_id}/edit`
pub async fn edit_task_page(
    State(state): State<AppState>,
    SignedIn(user): SignedIn,
    Path(task_id): Path<i64>,
    Query(flash): Query<FlashQuery>,
) -> AppResult<Response> {
    Ok(match tasks::lookup(&*state.store, &user, task_id).await? {
        Lookup::Owned(task) => {
            Html(views::render_task_form(&user, Some(&task), &flash)).into_response()
        }
        Lookup::Missing | Lookup::Foreign => not_found(&user),
    })
}

/// `POST /tasks/{task_id}/edit` — an unparsable deadline clears it.
pub async fn edit_task_submit(
    State(state): State<AppState>,
    SignedIn(user): SignedIn,
    Path(task_id): Path<i64>,
    Form(form): Form<TaskForm>,
) -> AppResult<Response> {
    if !matches!(tasks::lookup(&*state.store, &user, task_id).await?, Lookup::Owned(_)) {
        return Ok(not_found(&user));
    }
    if form.title.trim().is_empty() {
        let target = with_flash(&format!("/tasks/{task_id}/edit"), "error", "Title is required");
        return Ok(Redirect::to(&target).into_response());
    }

    let changes = TaskChanges {
        title: Some(form.title),
        description: Some(non_blank(form.description)),
        completed: Some(tasks::parse_completed(&form.completed)),
        deadline: Some(tasks::parse_deadline(&form.deadline).unwrap_or(None)),
    };
    if state.store.update_task(task_id, changes).await?.is_none() {
        return Ok(not_found(&user));
    }

    let target = with_flash(&format!("/tasks/{task_id}"), "msg", "Task updated successfully!");
    Ok(Redirect::to(&target).into_response())
}

/// `POST /tasks/{task_id}/delete`
pub async fn delete_task_submit(
    State(state): State<AppState>,
    SignedIn(user): SignedIn,
    Path(task_id): Path<i64>,
) -> AppResult<Response> {
    if !matches!(tasks::lookup(&*state.store, &user, task_id).await?, Lookup::Owned(_)) {
        return Ok(not_found(&user));
    }
    state.store.delete_task(task_id).await?;
    debug!(task_id, user_id = user.id, "deleted task from form");

    Ok(Redirect::to(&with_flash("/tasks/ui", "msg", "Task deleted successfully!")).into_response())
}

/// `GET /static/js/forms.js`
pub async fn forms_script() -> impl IntoResponse {
    (
        [
            (header::CONTENT_TYPE, "text/javascript; charset=utf-8"),
            (header::CACHE_CONTROL, "public, max-age=3600"),
        ],
        views::FORMS_SCRIPT,
    )
}

fn not_found(user: &tasker_core::models::User) -> Response {
    (StatusCode::NOT_FOUND, Html(views::render_not_found(user))).into_response()
}

fn non_blank(value: String) -> Option<String> {
    if value.trim().is_empty() { None } else { Some(value) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flash_values_are_encoded() {
        assert_eq!(
            with_flash("/login", "msg", "Account created! Please log in."),
            "/login?msg=Account+created%21+Please+log+in."
        );
    }

    #[test]
    fn blank_strings_become_none() {
        assert_eq!(non_blank(String::new()), None);
        assert_eq!(non_blank("  ".into()), None);
        assert_eq!(non_blank("x".into()), Some("x".into()));
    }
}
