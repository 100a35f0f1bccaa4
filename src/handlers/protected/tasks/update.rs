// handlers/protected/tasks/update.rs - PATCH /api/tasks/:id handler

use axum::extract::{rejection::JsonRejection, Path, State};
use axum::Json;

use crate::auth::{require_user_id, RequestContext};
use crate::database::models::{TaskId, TaskPatch};
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

/// PATCH /api/tasks/:id - change only the supplied fields
pub async fn update(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<String>,
    payload: Result<Json<TaskPatch>, JsonRejection>,
) -> ApiResult<()> {
    require_user_id(&ctx)?;
    let Json(patch) = payload?;

    state.tasks.update(&ctx, &TaskId::from(id), patch).await?;
    Ok(ApiResponse::success(()))
}
