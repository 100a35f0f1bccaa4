use tracing::debug;

use super::client::{ClientError, TasksApi};
use crate::database::models::{Task, TaskId, TaskPatch, TaskStatus};

/// One board column and its tasks, in list order
#[derive(Debug, PartialEq)]
pub struct KanbanColumn<'a> {
    pub status: TaskStatus,
    pub tasks: Vec<&'a Task>,
}

/// Partition `tasks` into the three status columns, left to right
pub fn group_columns(tasks: &[Task]) -> Vec<KanbanColumn<'_>> {
    TaskStatus::ALL
        .iter()
        .map(|&status| KanbanColumn {
            status,
            tasks: tasks.iter().filter(|t| t.status == status).collect(),
        })
        .collect()
}

/// Column ids are the exact status labels
fn column_status(id: &str) -> Option<TaskStatus> {
    TaskStatus::ALL.into_iter().find(|status| status.as_str() == id)
}

/// The update a drop should send, if any.
///
/// Carries the task's full field set with only the status replaced. Nothing is
/// sent for a drop outside any column, onto an unknown column, onto the column
/// the task is already in, or for a task that is no longer in the list.
pub fn drop_patch(tasks: &[Task], task_id: &TaskId, target: Option<&str>) -> Option<TaskPatch> {
    let target = target?;
    let status = match column_status(target) {
        Some(status) => status,
        None => {
            debug!("Ignoring drop onto unknown column '{}'", target);
            return None;
        }
    };

    let task = tasks.iter().find(|t| &t.id == task_id)?;
    if task.status == status {
        return None;
    }

    Some(TaskPatch {
        title: Some(task.title.clone()),
        description: task.description.clone(),
        status: Some(status),
        due_date: task.due_date,
        priority: Some(task.priority),
    })
}

/// Move a task by dropping it on a column. Returns whether an update was sent.
pub async fn handle_drop(
    api: &dyn TasksApi,
    tasks: &[Task],
    task_id: &TaskId,
    target: Option<&str>,
) -> Result<bool, ClientError> {
    match drop_patch(tasks, task_id, target) {
        Some(patch) => {
            api.update(task_id, &patch).await?;
            Ok(true)
        }
        None => Ok(false),
    }
}
