//! In-process store.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{StoreError, TaskStore, UserStore};
use crate::models::{NewTask, NewUser, Task, TaskChanges, User, UserRecord};

#[derive(Debug, Default)]
struct Tables {
    users: BTreeMap<i64, UserRecord>,
    tasks: BTreeMap<i64, Task>,
    last_user_id: i64,
    last_task_id: i64,
}

/// Store that keeps users and tasks in memory. Contents are lost on drop.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<UserRecord>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .values()
            .find(|record| record.user.username == username)
            .cloned())
    }

    async fn username_or_email_taken(
        &self,
        username: &str,
        email: &str,
    ) -> Result<bool, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .values()
            .any(|record| record.user.username == username || record.user.email == email))
    }

    async fn create_user(&self, user: NewUser) -> Result<User, StoreError> {
        let mut tables = self.tables.write().await;
        let taken = tables
            .users
            .values()
            .any(|record| record.user.username == user.username || record.user.email == user.email);
        if taken {
            return Err(StoreError::Conflict(
                "Username or email already registered".into(),
            ));
        }

        tables.last_user_id += 1;
        let created = User {
            id: tables.last_user_id,
            username: user.username,
            email: user.email,
        };
        tables.users.insert(
            created.id,
            UserRecord {
                user: created.clone(),
                credential: user.credential,
            },
        );
        Ok(created)
    }

    async fn delete_user(&self, user_id: i64) -> Result<bool, StoreError> {
        let mut tables = self.tables.write().await;
        let existed = tables.users.remove(&user_id).is_some();
        if existed {
            tables.tasks.retain(|_, task| task.owner_id != user_id);
        }
        Ok(existed)
    }
}

#[async_trait]
impl TaskStore for MemoryStore {
    async fn get_task(&self, task_id: i64) -> Result<Option<Task>, StoreError> {
        Ok(self.tables.read().await.tasks.get(&task_id).cloned())
    }

    async fn list_tasks(
        &self,
        owner_id: i64,
        skip: i64,
        limit: i64,
    ) -> Result<Vec<Task>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .tasks
            .values()
            .filter(|task| task.owner_id == owner_id)
            .skip(usize::try_from(skip).unwrap_or(0))
            .take(usize::try_from(limit).unwrap_or(0))
            .cloned()
            .collect())
    }

    async fn create_task(&self, owner_id: i64, task: NewTask) -> Result<Task, StoreError> {
        let mut tables = self.tables.write().await;
        tables.last_task_id += 1;
        let created = Task {
            id: tables.last_task_id,
            title: task.title,
            description: task.description,
            completed: task.completed,
            deadline: task.deadline,
            owner_id,
        };
        tables.tasks.insert(created.id, created.clone());
        Ok(created)
    }

    async fn update_task(
        &self,
        task_id: i64,
        changes: TaskChanges,
    ) -> Result<Option<Task>, StoreError> {
        let mut tables = self.tables.write().await;
        Ok(tables.tasks.get_mut(&task_id).map(|task| {
            changes.apply(task);
            task.clone()
        }))
    }

    async fn delete_task(&self, task_id: i64) -> Result<bool, StoreError> {
        Ok(self.tables.write().await.tasks.remove(&task_id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Credential;

    fn new_user(username: &str, email: &str) -> NewUser {
        NewUser {
            username: username.into(),
            email: email.into(),
            credential: Credential::from_stored("$2b$04$placeholder"),
        }
    }

    fn new_task(title: &str) -> NewTask {
        NewTask {
            title: title.into(),
            description: None,
            completed: false,
            deadline: None,
        }
    }

    #[tokio::test]
    async fn duplicate_username_or_email_conflicts() {
        let store = MemoryStore::new();
        store.create_user(new_user("alice", "a@x.io")).await.unwrap();

        assert!(store.username_or_email_taken("alice", "other@x.io").await.unwrap());
        assert!(store.username_or_email_taken("bob", "a@x.io").await.unwrap());
        assert!(!store.username_or_email_taken("bob", "b@x.io").await.unwrap());

        let err = store.create_user(new_user("alice", "b@x.io")).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
    }

    #[tokio::test]
    async fn lists_only_the_owners_tasks_in_pages() {
        let store = MemoryStore::new();
        let alice = store.create_user(new_user("alice", "a@x.io")).await.unwrap();
        let bob = store.create_user(new_user("bob", "b@x.io")).await.unwrap();
        for i in 0..5 {
            store.create_task(alice.id, new_task(&format!("a{i}"))).await.unwrap();
        }
        store.create_task(bob.id, new_task("b0")).await.unwrap();

        let all = store.list_tasks(alice.id, 0, 100).await.unwrap();
        assert_eq!(all.len(), 5);
        assert!(all.iter().all(|t| t.owner_id == alice.id));

        let page = store.list_tasks(alice.id, 1, 2).await.unwrap();
        let titles: Vec<_> = page.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, ["a1", "a2"]);
    }

    #[tokio::test]
    async fn update_and_delete_report_missing_rows() {
        let store = MemoryStore::new();
        assert_eq!(store.update_task(42, TaskChanges::default()).await.unwrap(), None);
        assert!(!store.delete_task(42).await.unwrap());
    }

    #[tokio::test]
    async fn deleting_a_user_drops_their_tasks() {
        let store = MemoryStore::new();
        let alice = store.create_user(new_user("alice", "a@x.io")).await.unwrap();
        let task = store.create_task(alice.id, new_task("t")).await.unwrap();

        assert!(store.delete_user(alice.id).await.unwrap());
        assert!(store.find_by_username("alice").await.unwrap().is_none());
        assert!(store.get_task(task.id).await.unwrap().is_none());
    }
}
