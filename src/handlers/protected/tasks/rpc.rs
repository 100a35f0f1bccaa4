// handlers/protected/tasks/rpc.rs - POST /api/rpc/:function handler
//
// Function-call convention: the path names the function, the body is its
// JSON argument object. Same argument shapes and error semantics as the
// REST routes.

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use crate::auth::{require_user_id, RequestContext};
use crate::database::models::{NewTask, TaskId, TaskPatch};
use crate::error::ApiError;
use crate::handlers::protected::tasks::create::CreatedTask;
use crate::middleware::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
struct IdArgs {
    id: TaskId,
}

#[derive(Debug, Deserialize)]
struct UpdateArgs {
    id: TaskId,
    #[serde(flatten)]
    patch: TaskPatch,
}

/// POST /api/rpc/:function - dispatch `tasks.*` by name
pub async fn rpc(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(function): Path<String>,
    body: Bytes,
) -> Result<Response, ApiError> {
    require_user_id(&ctx)?;
    let args = parse_args(&body)?;
    let tasks = &state.tasks;

    let response = match function.as_str() {
        "tasks.list" => ApiResponse::success(tasks.list(&ctx).await?).into_response(),
        "tasks.get" => {
            let IdArgs { id } = decode_args(args)?;
            ApiResponse::success(tasks.get(&ctx, &id).await?).into_response()
        }
        "tasks.create" => {
            let fields: NewTask = decode_args(args)?;
            let id = tasks.create(&ctx, fields).await?;
            ApiResponse::created(CreatedTask { id }).into_response()
        }
        "tasks.update" => {
            let UpdateArgs { id, patch } = decode_args(args)?;
            tasks.update(&ctx, &id, patch).await?;
            ApiResponse::success(()).into_response()
        }
        "tasks.remove" => {
            let IdArgs { id } = decode_args(args)?;
            tasks.remove(&ctx, &id).await?;
            ApiResponse::success(()).into_response()
        }
        other => return Err(ApiError::not_found(format!("Unknown function '{}'", other))),
    };

    Ok(response)
}

/// An empty body is the empty argument object
fn parse_args(body: &[u8]) -> Result<Value, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Object(Default::default()));
    }
    serde_json::from_slice(body).map_err(|e| ApiError::invalid_json(e.to_string()))
}

fn decode_args<T: DeserializeOwned>(args: Value) -> Result<T, ApiError> {
    serde_json::from_value(args).map_err(|e| ApiError::validation_error(e.to_string(), None))
}
