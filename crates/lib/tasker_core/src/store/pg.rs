//! PostgreSQL-backed store.
//!
//! Every query checks a connection out of the pool and hands it back when
//! the query future completes or is dropped.

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::PgPool;

use super::{StoreError, TaskStore, UserStore};
use crate::auth::Credential;
use crate::models::{NewTask, NewUser, Task, TaskChanges, User, UserRecord};

type TaskRow = (i64, String, Option<String>, bool, Option<NaiveDate>, i64);

const TASK_COLUMNS: &str = "id, title, description, completed, deadline, owner_id";

fn task_from_row(
    (id, title, description, completed, deadline, owner_id): TaskRow,
) -> Task {
    Task {
        id,
        title,
        description,
        completed,
        deadline,
        owner_id,
    }
}

/// Store over a PostgreSQL connection pool.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<UserRecord>, StoreError> {
        let row = sqlx::query_as::<_, (i64, String, String, String)>(
            "SELECT id, username, email, hashed_password FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(|(id, username, email, hash)| UserRecord {
            user: User {
                id,
                username,
                email,
            },
            credential: Credential::from_stored(hash),
        }))
    }

    async fn username_or_email_taken(
        &self,
        username: &str,
        email: &str,
    ) -> Result<bool, StoreError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM users WHERE username = $1 OR email = $2)",
        )
        .bind(username)
        .bind(email)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    async fn create_user(&self, user: NewUser) -> Result<User, StoreError> {
        let result = sqlx::query_scalar::<_, i64>(
            "INSERT INTO users (username, email, hashed_password) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(&user.username)
        .bind(&user.email)
        .bind(user.credential.as_str())
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(id) => Ok(User {
                id,
                username: user.username,
                email: user.email,
            }),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => Err(StoreError::Conflict(
                "Username or email already registered".into(),
            )),
            Err(e) => Err(e.into()),
        }
    }

    async fn delete_user(&self, user_id: i64) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl TaskStore for PgStore {
    async fn get_task(&self, task_id: i64) -> Result<Option<Task>, StoreError> {
        let row = sqlx::query_as::<_, TaskRow>(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE id = $1"
        ))
        .bind(task_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(task_from_row))
    }

    async fn list_tasks(
        &self,
        owner_id: i64,
        skip: i64,
        limit: i64,
    ) -> Result<Vec<Task>, StoreError> {
        let rows = sqlx::query_as::<_, TaskRow>(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE owner_id = $1 \
             ORDER BY id OFFSET $2 LIMIT $3"
        ))
        .bind(owner_id)
        .bind(skip)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(task_from_row).collect())
    }

    async fn create_task(&self, owner_id: i64, task: NewTask) -> Result<Task, StoreError> {
        let row = sqlx::query_as::<_, TaskRow>(&format!(
            "INSERT INTO tasks (title, description, completed, deadline, owner_id) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {TASK_COLUMNS}"
        ))
        .bind(task.title)
        .bind(task.description)
        .bind(task.completed)
        .bind(task.deadline)
        .bind(owner_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(task_from_row(row))
    }

    async fn update_task(
        &self,
        task_id: i64,
        changes: TaskChanges,
    ) -> Result<Option<Task>, StoreError> {
        // Read-modify-write inside one transaction so partial updates do not
        // need dynamic SQL.
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, TaskRow>(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE id = $1 FOR UPDATE"
        ))
        .bind(task_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };
        let mut task = task_from_row(row);
        changes.apply(&mut task);

        sqlx::query(
            "UPDATE tasks SET title = $2, description = $3, completed = $4, deadline = $5 \
             WHERE id = $1",
        )
        .bind(task.id)
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.completed)
        .bind(task.deadline)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(Some(task))
    }

    async fn delete_task(&self, task_id: i64) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(task_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
