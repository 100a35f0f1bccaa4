// handlers/protected/tasks/remove.rs - DELETE /api/tasks/:id handler

use axum::extract::{Path, State};

use crate::auth::{require_user_id, RequestContext};
use crate::database::models::TaskId;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

/// DELETE /api/tasks/:id - permanent, no soft delete
pub async fn remove(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<String>,
) -> ApiResult<()> {
    require_user_id(&ctx)?;
    state.tasks.remove(&ctx, &TaskId::from(id)).await?;
    Ok(ApiResponse::success(()))
}
