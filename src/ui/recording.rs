//! In-process `TasksApi` that records every call, for view-layer tests

use std::sync::Mutex;

use async_trait::async_trait;

use super::client::{ClientError, TasksApi};
use crate::database::models::{NewTask, Task, TaskId, TaskPatch};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    List,
    Get(TaskId),
    Create(NewTask),
    Update(TaskId, TaskPatch),
    Remove(TaskId),
}

#[derive(Default)]
pub struct RecordingApi {
    pub tasks: Vec<Task>,
    pub fail_with: Option<u16>,
    calls: Mutex<Vec<Call>>,
}

impl RecordingApi {
    pub fn with_tasks(tasks: Vec<Task>) -> Self {
        Self { tasks, ..Default::default() }
    }

    pub fn failing(status: u16) -> Self {
        Self { fail_with: Some(status), ..Default::default() }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) -> Result<(), ClientError> {
        self.calls.lock().unwrap().push(call);
        match self.fail_with {
            Some(status) => Err(ClientError::Api {
                status,
                code: "INTERNAL_SERVER_ERROR".to_string(),
                message: "boom".to_string(),
            }),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl TasksApi for RecordingApi {
    async fn list(&self) -> Result<Vec<Task>, ClientError> {
        self.record(Call::List)?;
        Ok(self.tasks.clone())
    }

    async fn get(&self, id: &TaskId) -> Result<Task, ClientError> {
        self.record(Call::Get(id.clone()))?;
        self.tasks.iter().find(|t| &t.id == id).cloned().ok_or(ClientError::Api {
            status: 404,
            code: "NOT_FOUND".to_string(),
            message: "Not found".to_string(),
        })
    }

    async fn create(&self, task: &NewTask) -> Result<TaskId, ClientError> {
        self.record(Call::Create(task.clone()))?;
        Ok(TaskId::from("created"))
    }

    async fn update(&self, id: &TaskId, patch: &TaskPatch) -> Result<(), ClientError> {
        self.record(Call::Update(id.clone(), patch.clone()))
    }

    async fn remove(&self, id: &TaskId) -> Result<(), ClientError> {
        self.record(Call::Remove(id.clone()))
    }
}

pub fn task(id: &str, title: &str, status: crate::database::models::TaskStatus) -> Task {
    Task::new(
        TaskId::from(id),
        "user_a",
        NewTask {
            title: title.to_string(),
            description: Some(format!("{} notes", title)),
            status,
            due_date: Some(1_735_689_600_000),
            priority: crate::database::models::TaskPriority::High,
        },
        1_700_000_000_000,
    )
}
