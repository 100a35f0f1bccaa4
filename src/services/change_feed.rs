use serde::Serialize;
use tokio::sync::broadcast;

use crate::database::models::TaskId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Created,
    Updated,
    Removed,
}

/// Notice that one row owned by `user_id` changed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskChange {
    pub user_id: String,
    pub task_id: TaskId,
    pub kind: ChangeKind,
}

/// Fan-out of committed writes to live subscribers
#[derive(Clone)]
pub struct ChangeFeed {
    sender: broadcast::Sender<TaskChange>,
}

impl ChangeFeed {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn publish(&self, change: TaskChange) {
        // No receivers is the normal case when nobody is watching
        let _ = self.sender.send(change);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<TaskChange> {
        self.sender.subscribe()
    }
}
