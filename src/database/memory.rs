use std::collections::{BTreeMap, BTreeSet, HashMap};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::database::error::DatabaseError;
use crate::database::models::{Task, TaskId, TaskPatch};
use crate::database::store::TaskStore;

/// In-process table. Rows are keyed by an insertion sequence so owner scans
/// come back in creation order.
#[derive(Default)]
pub struct MemoryTaskStore {
    table: RwLock<Table>,
}

#[derive(Default)]
struct Table {
    next_seq: u64,
    rows: BTreeMap<u64, Task>,
    by_id: HashMap<TaskId, u64>,
    by_user: HashMap<String, BTreeSet<u64>>,
}

impl MemoryTaskStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TaskStore for MemoryTaskStore {
    async fn insert(&self, task: Task) -> Result<(), DatabaseError> {
        let mut table = self.table.write().await;
        if table.by_id.contains_key(&task.id) {
            return Err(DatabaseError::QueryError(format!("duplicate task id {}", task.id)));
        }

        let seq = table.next_seq;
        table.next_seq += 1;
        table.by_id.insert(task.id.clone(), seq);
        table.by_user.entry(task.user_id.clone()).or_default().insert(seq);
        table.rows.insert(seq, task);
        Ok(())
    }

    async fn get(&self, id: &TaskId) -> Result<Option<Task>, DatabaseError> {
        let table = self.table.read().await;
        Ok(table.by_id.get(id).and_then(|seq| table.rows.get(seq)).cloned())
    }

    async fn list_by_owner(&self, user_id: &str) -> Result<Vec<Task>, DatabaseError> {
        let table = self.table.read().await;
        let tasks = match table.by_user.get(user_id) {
            Some(seqs) => seqs.iter().filter_map(|seq| table.rows.get(seq)).cloned().collect(),
            None => Vec::new(),
        };
        Ok(tasks)
    }

    async fn patch(&self, id: &TaskId, patch: &TaskPatch) -> Result<(), DatabaseError> {
        let mut table = self.table.write().await;
        let seq = *table
            .by_id
            .get(id)
            .ok_or_else(|| DatabaseError::NotFound(format!("task {}", id)))?;
        if let Some(task) = table.rows.get_mut(&seq) {
            patch.apply(task);
        }
        Ok(())
    }

    async fn delete(&self, id: &TaskId) -> Result<(), DatabaseError> {
        let mut table = self.table.write().await;
        let seq = table
            .by_id
            .remove(id)
            .ok_or_else(|| DatabaseError::NotFound(format!("task {}", id)))?;

        if let Some(task) = table.rows.remove(&seq) {
            let now_empty = match table.by_user.get_mut(&task.user_id) {
                Some(seqs) => {
                    seqs.remove(&seq);
                    seqs.is_empty()
                }
                None => false,
            };
            if now_empty {
                table.by_user.remove(&task.user_id);
            }
        }
        Ok(())
    }

    async fn health_check(&self) -> Result<(), DatabaseError> {
        Ok(())
    }
}
