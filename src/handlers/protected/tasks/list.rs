// handlers/protected/tasks/list.rs - GET /api/tasks handler

use axum::extract::State;

use crate::auth::{require_user_id, RequestContext};
use crate::database::models::Task;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

/// GET /api/tasks - every task owned by the caller
pub async fn list(State(state): State<AppState>, ctx: RequestContext) -> ApiResult<Vec<Task>> {
    require_user_id(&ctx)?;
    let tasks = state.tasks.list(&ctx).await?;
    Ok(ApiResponse::success(tasks))
}
