use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::database::error::TaskError;

/// Opaque identifier of a row in the `tasks` table
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for TaskId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for TaskId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TaskStatus {
    #[default]
    #[serde(rename = "To Do")]
    Todo,
    #[serde(rename = "In Progress")]
    InProgress,
    #[serde(rename = "Done")]
    Done,
}

impl TaskStatus {
    /// Board order, left to right
    pub const ALL: [TaskStatus; 3] = [TaskStatus::Todo, TaskStatus::InProgress, TaskStatus::Done];

    pub fn as_str(self) -> &'static str {
        match self {
            TaskStatus::Todo => "To Do",
            TaskStatus::InProgress => "In Progress",
            TaskStatus::Done => "Done",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = String;

    /// Accepts the display labels plus the kebab/snake spellings used on the command line.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace(['-', '_'], " ").as_str() {
            "to do" | "todo" => Ok(TaskStatus::Todo),
            "in progress" => Ok(TaskStatus::InProgress),
            "done" => Ok(TaskStatus::Done),
            _ => Err(format!("unknown status '{}' (expected To Do, In Progress or Done)", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
}

impl TaskPriority {
    pub const ALL: [TaskPriority; 3] = [TaskPriority::Low, TaskPriority::Medium, TaskPriority::High];

    pub fn as_str(self) -> &'static str {
        match self {
            TaskPriority::Low => "Low",
            TaskPriority::Medium => "Medium",
            TaskPriority::High => "High",
        }
    }
}

impl fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskPriority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(TaskPriority::Low),
            "medium" => Ok(TaskPriority::Medium),
            "high" => Ok(TaskPriority::High),
            _ => Err(format!("unknown priority '{}' (expected Low, Medium or High)", s)),
        }
    }
}

/// A persisted task. Field names on the wire follow the camelCase shape the
/// board client expects (`_id`, `userId`, `dueDate`, `createdAt`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    #[serde(rename = "_id")]
    pub id: TaskId,
    pub user_id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    /// Epoch milliseconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<i64>,
    /// Epoch milliseconds
    pub created_at: i64,
}

impl Task {
    pub fn new(id: TaskId, user_id: impl Into<String>, fields: NewTask, created_at: i64) -> Self {
        Self {
            id,
            user_id: user_id.into(),
            title: fields.title,
            description: fields.description,
            status: fields.status,
            priority: fields.priority,
            due_date: fields.due_date,
            created_at,
        }
    }
}

/// Arguments of `tasks.create`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTask {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub status: TaskStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<i64>,
    pub priority: TaskPriority,
}

impl NewTask {
    pub fn validate(&self) -> Result<(), TaskError> {
        let mut field_errors = HashMap::new();
        if self.title.trim().is_empty() {
            field_errors.insert("title".to_string(), "Title must not be empty".to_string());
        }
        TaskError::check_fields(field_errors)
    }
}

/// Arguments of `tasks.update` minus the id. Omitted fields keep their stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<TaskPriority>,
}

impl TaskPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.status.is_none()
            && self.due_date.is_none()
            && self.priority.is_none()
    }

    pub fn validate(&self) -> Result<(), TaskError> {
        let mut field_errors = HashMap::new();
        if matches!(&self.title, Some(title) if title.trim().is_empty()) {
            field_errors.insert("title".to_string(), "Title must not be empty".to_string());
        }
        TaskError::check_fields(field_errors)
    }

    /// Copy every supplied field onto `task`. Identity fields are not patchable.
    pub fn apply(&self, task: &mut Task) {
        if let Some(title) = &self.title {
            task.title = title.clone();
        }
        if let Some(description) = &self.description {
            task.description = Some(description.clone());
        }
        if let Some(status) = self.status {
            task.status = status;
        }
        if let Some(due_date) = self.due_date {
            task.due_date = Some(due_date);
        }
        if let Some(priority) = self.priority {
            task.priority = priority;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Task {
        Task::new(
            TaskId::from("t1"),
            "user_a",
            NewTask {
                title: "A".to_string(),
                description: None,
                status: TaskStatus::Todo,
                due_date: None,
                priority: TaskPriority::Low,
            },
            1_700_000_000_000,
        )
    }

    #[test]
    fn serializes_with_board_field_names() {
        let value = serde_json::to_value(sample()).unwrap();
        assert_eq!(value["_id"], "t1");
        assert_eq!(value["userId"], "user_a");
        assert_eq!(value["status"], "To Do");
        assert_eq!(value["priority"], "Low");
        assert_eq!(value["createdAt"], 1_700_000_000_000i64);
        assert!(value.get("dueDate").is_none());
    }

    #[test]
    fn rejects_unknown_enum_values() {
        let err = serde_json::from_value::<NewTask>(json!({
            "title": "x", "status": "Blocked", "priority": "Low"
        }));
        assert!(err.is_err());
    }

    #[test]
    fn blank_title_fails_validation() {
        let input = NewTask {
            title: "   ".to_string(),
            description: None,
            status: TaskStatus::Todo,
            due_date: None,
            priority: TaskPriority::Medium,
        };
        match input.validate() {
            Err(TaskError::Validation { field_errors, .. }) => assert!(field_errors.contains_key("title")),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn patch_only_touches_supplied_fields() {
        let mut task = sample();
        let patch: TaskPatch = serde_json::from_value(json!({ "priority": "High" })).unwrap();
        patch.apply(&mut task);
        assert_eq!(task.priority, TaskPriority::High);
        assert_eq!(task.title, "A");
        assert_eq!(task.status, TaskStatus::Todo);
        assert_eq!(task.user_id, "user_a");
    }

    #[test]
    fn status_parses_cli_spellings() {
        assert_eq!("in-progress".parse::<TaskStatus>(), Ok(TaskStatus::InProgress));
        assert_eq!("To Do".parse::<TaskStatus>(), Ok(TaskStatus::Todo));
        assert_eq!("todo".parse::<TaskStatus>(), Ok(TaskStatus::Todo));
        assert!("blocked".parse::<TaskStatus>().is_err());
        assert_eq!("HIGH".parse::<TaskPriority>(), Ok(TaskPriority::High));
    }

    #[test]
    fn new_tasks_default_to_todo_and_medium() {
        assert_eq!(TaskStatus::default(), TaskStatus::Todo);
        assert_eq!(TaskPriority::default(), TaskPriority::Medium);
    }
}
