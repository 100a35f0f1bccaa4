// handlers/protected/tasks/create.rs - POST /api/tasks handler

use axum::extract::{rejection::JsonRejection, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::auth::{require_user_id, RequestContext};
use crate::database::models::{NewTask, TaskId};
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct CreatedTask {
    pub id: TaskId,
}

/// POST /api/tasks - insert a task owned by the caller
///
/// Expected Input:
/// ```json
/// { "title": "Write report", "description": "Q3", "status": "To Do",
///   "dueDate": 1735689600000, "priority": "High" }
/// ```
pub async fn create(
    State(state): State<AppState>,
    ctx: RequestContext,
    payload: Result<Json<NewTask>, JsonRejection>,
) -> ApiResult<CreatedTask> {
    require_user_id(&ctx)?;
    let Json(fields) = payload?;

    let id = state.tasks.create(&ctx, fields).await?;
    Ok(ApiResponse::created(CreatedTask { id }))
}
