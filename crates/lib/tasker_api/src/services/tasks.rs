//! Task service — ownership checks and listing over `tasker_core::store`.

use chrono::NaiveDate;
use tasker_core::models::{Task, User};
use tasker_core::store::TaskStore;

use crate::error::{AppError, AppResult};

/// Outcome of looking up a task on behalf of a user.
#[derive(Debug)]
pub enum Lookup {
    Owned(Task),
    Missing,
    /// Exists but belongs to someone else.
    Foreign,
}

/// Look up a task and check it belongs to `user`.
pub async fn lookup<S: TaskStore + ?Sized>(store: &S, user: &User, task_id: i64) -> AppResult<Lookup> {
    Ok(match store.get_task(task_id).await? {
        None => Lookup::Missing,
        Some(task) if task.owner_id != user.id => Lookup::Foreign,
        Some(task) => Lookup::Owned(task),
    })
}

/// Fetch a task owned by `user`. Missing and foreign tasks are both 404 so
/// the API does not reveal other users' task ids.
pub async fn owned<S: TaskStore + ?Sized>(store: &S, user: &User, task_id: i64) -> AppResult<Task> {
    match lookup(store, user, task_id).await? {
        Lookup::Owned(task) => Ok(task),
        Lookup::Missing | Lookup::Foreign => Err(AppError::NotFound("Task not found".into())),
    }
}

/// Page through `user`'s tasks, then keep those matching `completed`.
///
/// The filter runs after paging, so a page may hold fewer than `limit`
/// items.
pub async fn list<S: TaskStore + ?Sized>(
    store: &S,
    user: &User,
    skip: i64,
    limit: i64,
    completed: Option<bool>,
) -> AppResult<Vec<Task>> {
    if skip < 0 || limit < 0 {
        return Err(AppError::Validation(
            "skip and limit must not be negative".into(),
        ));
    }
    let mut tasks = store.list_tasks(user.id, skip, limit).await?;
    if let Some(completed) = completed {
        tasks.retain(|task| task.completed == completed);
    }
    Ok(tasks)
}

/// Parse an HTML date input (`YYYY-MM-DD`). Blank means no deadline.
pub fn parse_deadline(raw: &str) -> Result<Option<NaiveDate>, chrono::ParseError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map(Some)
}

/// Interpret a form checkbox/select value.
pub fn parse_completed(raw: &str) -> bool {
    raw.trim().eq_ignore_ascii_case("true")
}

#[cfg(test)]
mod tests {
    use tasker_core::models::NewTask;
    use tasker_core::store::MemoryStore;

    use super::*;

    fn user(id: i64) -> User {
        User {
            id,
            username: format!("user{id}"),
            email: format!("user{id}@example.com"),
        }
    }

    fn new_task(title: &str, completed: bool) -> NewTask {
        NewTask {
            title: title.into(),
            description: None,
            completed,
            deadline: None,
        }
    }

    #[tokio::test]
    async fn lookup_distinguishes_missing_and_foreign() {
        let store = MemoryStore::new();
        let task = store.create_task(1, new_task("mine", false)).await.unwrap();

        assert!(matches!(lookup(&store, &user(1), task.id).await.unwrap(), Lookup::Owned(_)));
        assert!(matches!(lookup(&store, &user(2), task.id).await.unwrap(), Lookup::Foreign));
        assert!(matches!(lookup(&store, &user(1), 999).await.unwrap(), Lookup::Missing));

        let err = owned(&store, &user(2), task.id).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn list_filters_by_completion() {
        let store = MemoryStore::new();
        store.create_task(1, new_task("done", true)).await.unwrap();
        store.create_task(1, new_task("open", false)).await.unwrap();

        let done = list(&store, &user(1), 0, 100, Some(true)).await.unwrap();
        assert_eq!(done.len(), 1);
        assert_eq!(done[0].title, "done");

        let all = list(&store, &user(1), 0, 100, None).await.unwrap();
        assert_eq!(all.len(), 2);

        assert!(list(&store, &user(1), -1, 100, None).await.is_err());
    }

    #[test]
    fn parses_form_fields() {
        assert_eq!(parse_deadline("").unwrap(), None);
        assert_eq!(
            parse_deadline("2026-05-04").unwrap(),
            NaiveDate::from_ymd_opt(2026, 5, 4)
        );
        assert!(parse_deadline("04/05/2026").is_err());

        assert!(parse_completed("true"));
        assert!(parse_completed("True"));
        assert!(!parse_completed("false"));
        assert!(!parse_completed(""));
    }
}
