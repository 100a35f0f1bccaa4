use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, warn};

use crate::auth::{require_user_id, RequestContext};
use crate::database::error::{DatabaseError, TaskError};
use crate::database::models::{NewTask, Task, TaskId, TaskPatch};
use crate::database::store::TaskStore;
use crate::services::change_feed::{ChangeFeed, ChangeKind, TaskChange};

/// Owner-scoped CRUD over the `tasks` table.
///
/// Every operation resolves the caller itself, independent of whatever the
/// HTTP layer already checked, so internal callers get the same guarantees.
pub struct TaskRepository {
    store: Arc<dyn TaskStore>,
    feed: ChangeFeed,
}

impl TaskRepository {
    pub fn new(store: Arc<dyn TaskStore>, feed: ChangeFeed) -> Self {
        Self { store, feed }
    }

    pub fn feed(&self) -> &ChangeFeed {
        &self.feed
    }

    /// All tasks owned by the caller, in insertion order
    pub async fn list(&self, ctx: &RequestContext) -> Result<Vec<Task>, TaskError> {
        let user_id = require_user_id(ctx)?;
        Ok(self.store.list_by_owner(&user_id).await?)
    }

    pub async fn get(&self, ctx: &RequestContext, id: &TaskId) -> Result<Task, TaskError> {
        let user_id = require_user_id(ctx)?;
        self.fetch_owned(&user_id, id).await
    }

    pub async fn create(&self, ctx: &RequestContext, fields: NewTask) -> Result<TaskId, TaskError> {
        let user_id = require_user_id(ctx)?;
        fields.validate()?;

        let id = TaskId::generate();
        let task = Task::new(id.clone(), user_id.clone(), fields, Utc::now().timestamp_millis());
        self.store.insert(task).await?;

        debug!("Created task {} for {}", id, user_id);
        self.notify(user_id, id.clone(), ChangeKind::Created);
        Ok(id)
    }

    pub async fn update(&self, ctx: &RequestContext, id: &TaskId, patch: TaskPatch) -> Result<(), TaskError> {
        let user_id = require_user_id(ctx)?;
        self.fetch_owned(&user_id, id).await?;
        patch.validate()?;

        self.store.patch(id, &patch).await.map_err(vanished)?;
        self.notify(user_id, id.clone(), ChangeKind::Updated);
        Ok(())
    }

    pub async fn remove(&self, ctx: &RequestContext, id: &TaskId) -> Result<(), TaskError> {
        let user_id = require_user_id(ctx)?;
        self.fetch_owned(&user_id, id).await?;

        self.store.delete(id).await.map_err(vanished)?;
        self.notify(user_id, id.clone(), ChangeKind::Removed);
        Ok(())
    }

    async fn fetch_owned(&self, user_id: &str, id: &TaskId) -> Result<Task, TaskError> {
        let task = self.store.get(id).await?.ok_or(TaskError::NotFound)?;
        if task.user_id != user_id {
            warn!("Ownership check failed: {} is not the owner of task {}", user_id, id);
            return Err(TaskError::Unauthorized);
        }
        Ok(task)
    }

    fn notify(&self, user_id: String, task_id: TaskId, kind: ChangeKind) {
        self.feed.publish(TaskChange { user_id, task_id, kind });
    }
}

/// A row deleted between the ownership check and the write is a plain miss
fn vanished(err: DatabaseError) -> TaskError {
    match err {
        DatabaseError::NotFound(_) => TaskError::NotFound,
        other => TaskError::Store(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::AuthUser;
    use crate::database::memory::MemoryTaskStore;
    use crate::database::models::{TaskPriority, TaskStatus};

    fn repo() -> TaskRepository {
        TaskRepository::new(Arc::new(MemoryTaskStore::new()), ChangeFeed::new(16))
    }

    fn as_user(subject: &str) -> RequestContext {
        RequestContext::authenticated(AuthUser {
            subject: subject.to_string(),
            issuer: "https://issuer.test".to_string(),
        })
    }

    fn new_task(title: &str, priority: TaskPriority) -> NewTask {
        NewTask {
            title: title.to_string(),
            description: Some("details".to_string()),
            status: TaskStatus::Todo,
            due_date: Some(1_800_000_000_000),
            priority,
        }
    }

    #[tokio::test]
    async fn list_is_scoped_to_the_owner() {
        let repo = repo();
        let id = repo.create(&as_user("alice"), new_task("A", TaskPriority::Low)).await.unwrap();

        let mine = repo.list(&as_user("alice")).await.unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].id, id);
        assert_eq!(mine[0].user_id, "alice");

        assert!(repo.list(&as_user("bob")).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn non_owner_get_is_unauthorized() {
        let repo = repo();
        let id = repo.create(&as_user("alice"), new_task("A", TaskPriority::Low)).await.unwrap();

        assert!(matches!(repo.get(&as_user("bob"), &id).await, Err(TaskError::Unauthorized)));
        assert!(matches!(
            repo.update(&as_user("bob"), &id, TaskPatch { title: Some("hijack".into()), ..Default::default() }).await,
            Err(TaskError::Unauthorized)
        ));
        assert!(matches!(repo.remove(&as_user("bob"), &id).await, Err(TaskError::Unauthorized)));

        // the owner's row is untouched
        assert_eq!(repo.get(&as_user("alice"), &id).await.unwrap().title, "A");
    }

    #[tokio::test]
    async fn missing_ids_are_not_found_for_everyone() {
        let repo = repo();
        let missing = TaskId::from("does-not-exist");
        for user in ["alice", "bob"] {
            assert!(matches!(repo.get(&as_user(user), &missing).await, Err(TaskError::NotFound)));
            assert!(matches!(repo.remove(&as_user(user), &missing).await, Err(TaskError::NotFound)));
        }
    }

    #[tokio::test]
    async fn anonymous_calls_fail_closed() {
        let repo = repo();
        let anon = RequestContext::anonymous();
        assert!(matches!(repo.list(&anon).await, Err(TaskError::Unauthenticated)));
        assert!(matches!(
            repo.create(&anon, new_task("A", TaskPriority::Low)).await,
            Err(TaskError::Unauthenticated)
        ));
    }

    #[tokio::test]
    async fn partial_update_keeps_unsupplied_fields() {
        let repo = repo();
        let alice = as_user("alice");
        let id = repo.create(&alice, new_task("A", TaskPriority::Low)).await.unwrap();
        let before = repo.get(&alice, &id).await.unwrap();

        let patch = TaskPatch { priority: Some(TaskPriority::High), ..Default::default() };
        repo.update(&alice, &id, patch).await.unwrap();

        let after = repo.get(&alice, &id).await.unwrap();
        assert_eq!(after.priority, TaskPriority::High);
        assert_eq!(after.title, "A");
        assert_eq!(after.description, before.description);
        assert_eq!(after.status, before.status);
        assert_eq!(after.due_date, before.due_date);
        assert_eq!(after.created_at, before.created_at);
    }

    #[tokio::test]
    async fn removed_tasks_never_resurface() {
        let repo = repo();
        let alice = as_user("alice");
        let keep = repo.create(&alice, new_task("keep", TaskPriority::Medium)).await.unwrap();
        let gone = repo.create(&alice, new_task("gone", TaskPriority::Medium)).await.unwrap();

        repo.remove(&alice, &gone).await.unwrap();

        assert!(matches!(repo.get(&alice, &gone).await, Err(TaskError::NotFound)));
        let ids: Vec<_> = repo.list(&alice).await.unwrap().into_iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![keep]);
    }

    #[tokio::test]
    async fn blank_titles_are_rejected_server_side() {
        let repo = repo();
        let alice = as_user("alice");
        assert!(matches!(
            repo.create(&alice, new_task("  ", TaskPriority::Low)).await,
            Err(TaskError::Validation { .. })
        ));

        let id = repo.create(&alice, new_task("A", TaskPriority::Low)).await.unwrap();
        let blank = TaskPatch { title: Some(String::new()), ..Default::default() };
        assert!(matches!(repo.update(&alice, &id, blank).await, Err(TaskError::Validation { .. })));
    }

    #[tokio::test]
    async fn writes_are_published_for_the_owner() {
        let repo = repo();
        let mut rx = repo.feed().subscribe();
        let alice = as_user("alice");

        let id = repo.create(&alice, new_task("A", TaskPriority::Low)).await.unwrap();
        repo.update(&alice, &id, TaskPatch { status: Some(TaskStatus::Done), ..Default::default() })
            .await
            .unwrap();
        repo.remove(&alice, &id).await.unwrap();

        let kinds: Vec<_> = (0..3).map(|_| rx.try_recv().unwrap()).map(|c| (c.user_id, c.kind)).collect();
        assert_eq!(
            kinds,
            vec![
                ("alice".to_string(), ChangeKind::Created),
                ("alice".to_string(), ChangeKind::Updated),
                ("alice".to_string(), ChangeKind::Removed),
            ]
        );
    }
}
