use async_trait::async_trait;

use crate::database::error::DatabaseError;
use crate::database::models::{Task, TaskId, TaskPatch};

/// The single `tasks` table with its `by_user` secondary index.
///
/// Implementations apply each write to exactly one row atomically; callers
/// do their own ownership checks before writing.
#[async_trait]
pub trait TaskStore: Send + Sync {
    async fn insert(&self, task: Task) -> Result<(), DatabaseError>;

    async fn get(&self, id: &TaskId) -> Result<Option<Task>, DatabaseError>;

    /// Rows owned by `user_id`, in insertion order
    async fn list_by_owner(&self, user_id: &str) -> Result<Vec<Task>, DatabaseError>;

    /// Fails with `DatabaseError::NotFound` if the row vanished
    async fn patch(&self, id: &TaskId, patch: &TaskPatch) -> Result<(), DatabaseError>;

    /// Fails with `DatabaseError::NotFound` if the row vanished
    async fn delete(&self, id: &TaskId) -> Result<(), DatabaseError>;

    async fn health_check(&self) -> Result<(), DatabaseError>;
}
