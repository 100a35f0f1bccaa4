// handlers/protected/tasks/get.rs - GET /api/tasks/:id handler

use axum::extract::{Path, State};

use crate::auth::{require_user_id, RequestContext};
use crate::database::models::{Task, TaskId};
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

/// GET /api/tasks/:id - 404 if absent, 403 if owned by someone else
pub async fn get(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<String>,
) -> ApiResult<Task> {
    require_user_id(&ctx)?;
    let task = state.tasks.get(&ctx, &TaskId::from(id)).await?;
    Ok(ApiResponse::success(task))
}
