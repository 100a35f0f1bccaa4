use chrono::{NaiveDate, TimeZone, Utc};
use tracing::error;

use super::client::{ClientError, TasksApi};
use crate::database::models::{NewTask, Task, TaskId, TaskPatch, TaskPriority, TaskStatus};

#[derive(Debug, thiserror::Error)]
pub enum FormError {
    #[error("Title is required")]
    BlankTitle,

    #[error("Invalid due date '{0}', expected YYYY-MM-DD")]
    InvalidDueDate(String),

    #[error("Failed to save task: {0}")]
    Client(#[from] ClientError),
}

/// Editable fields of the create/edit form. `due_date` holds `YYYY-MM-DD` or nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskForm {
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub due_date: String,
    pub submitting: bool,
    pub error: Option<String>,
}

impl TaskForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate from a stored task for editing
    pub fn for_task(task: &Task) -> Self {
        Self {
            title: task.title.clone(),
            description: task.description.clone().unwrap_or_default(),
            status: task.status,
            priority: task.priority,
            due_date: task.due_date.map(date_input).unwrap_or_default(),
            ..Self::default()
        }
    }

    pub fn can_submit(&self) -> bool {
        !self.submitting && !self.title.trim().is_empty()
    }

    fn title(&self) -> Result<String, FormError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(FormError::BlankTitle);
        }
        Ok(title.to_string())
    }

    fn description(&self) -> Option<String> {
        Some(self.description.trim()).filter(|d| !d.is_empty()).map(str::to_string)
    }

    /// `YYYY-MM-DD` to UTC midnight in epoch milliseconds
    pub fn due_date_millis(&self) -> Result<Option<i64>, FormError> {
        let input = self.due_date.trim();
        if input.is_empty() {
            return Ok(None);
        }
        let date = NaiveDate::parse_from_str(input, "%Y-%m-%d")
            .map_err(|_| FormError::InvalidDueDate(input.to_string()))?;
        let midnight = date.and_hms_opt(0, 0, 0).ok_or_else(|| FormError::InvalidDueDate(input.to_string()))?;
        Ok(Some(Utc.from_utc_datetime(&midnight).timestamp_millis()))
    }

    pub fn to_new_task(&self) -> Result<NewTask, FormError> {
        Ok(NewTask {
            title: self.title()?,
            description: self.description(),
            status: self.status,
            due_date: self.due_date_millis()?,
            priority: self.priority,
        })
    }

    /// Every field is sent. An emptied description or due date leaves the stored value alone.
    pub fn to_patch(&self) -> Result<TaskPatch, FormError> {
        Ok(TaskPatch {
            title: Some(self.title()?),
            description: self.description(),
            status: Some(self.status),
            due_date: self.due_date_millis()?,
            priority: Some(self.priority),
        })
    }

    /// Create a task, or update `editing` when set. Returns the affected id.
    ///
    /// On failure the fields are kept, `submitting` is cleared and `error`
    /// holds the message so the user can retry.
    pub async fn submit(&mut self, api: &dyn TasksApi, editing: Option<&TaskId>) -> Result<TaskId, FormError> {
        self.error = None;
        self.submitting = true;

        let result = self.save(api, editing).await;
        self.submitting = false;

        if let Err(err) = &result {
            error!("Failed to save task: {}", err);
            self.error = Some(err.to_string());
        }
        result
    }

    async fn save(&self, api: &dyn TasksApi, editing: Option<&TaskId>) -> Result<TaskId, FormError> {
        match editing {
            Some(id) => {
                api.update(id, &self.to_patch()?).await?;
                Ok(id.clone())
            }
            None => Ok(api.create(&self.to_new_task()?).await?),
        }
    }
}

fn date_input(millis: i64) -> String {
    Utc.timestamp_millis_opt(millis)
        .single()
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}
