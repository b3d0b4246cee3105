//! JSON task handlers. Every route requires a bearer token.

use axum::Json;
use axum::extract::{Path, Query, State};
use tasker_core::models::{NewTask, Task, TaskChanges};
use tasker_core::store::TaskStore;
use tracing::debug;

use crate::AppState;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthenticatedUser;
use crate::models::{DetailResponse, TaskListQuery};
use crate::services::tasks;

/// `POST /tasks` — create a task owned by the caller.
pub async fn create_task_handler(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(body): Json<NewTask>,
) -> AppResult<Json<Task>> {
    let task = state.store.create_task(user.id, body).await?;
    debug!(task_id = task.id, user_id = user.id, "created task");
    Ok(Json(task))
}

/// `GET /tasks` — list the caller's tasks.
pub async fn list_tasks_handler(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Query(query): Query<TaskListQuery>,
) -> AppResult<Json<Vec<Task>>> {
    let tasks = tasks::list(&*state.store, &user, query.skip, query.limit, query.completed).await?;
    Ok(Json(tasks))
}

/// `PUT /tasks/{task_id}` — partially update one of the caller's tasks.
pub async fn update_task_handler(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(task_id): Path<i64>,
    Json(changes): Json<TaskChanges>,
) -> AppResult<Json<Task>> {
    tasks::owned(&*state.store, &user, task_id).await?;
    let task = state
        .store
        .update_task(task_id, changes)
        .await?
        .ok_or_else(|| AppError::NotFound("Task not found".into()))?;
    Ok(Json(task))
}

/// `DELETE /tasks/{task_id}` — delete one of the caller's tasks.
pub async fn delete_task_handler(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(task_id): Path<i64>,
) -> AppResult<Json<DetailResponse>> {
    tasks::owned(&*state.store, &user, task_id).await?;
    state.store.delete_task(task_id).await?;
    debug!(task_id, user_id = user.id, "deleted task");
    Ok(Json(DetailResponse {
        detail: "Task deleted".into(),
    }))
}
