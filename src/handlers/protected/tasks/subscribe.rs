// handlers/protected/tasks/subscribe.rs - GET /api/tasks/subscribe handler

use std::convert::Infallible;

use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use futures::{Stream, StreamExt};

use crate::auth::{require_user_id, RequestContext};
use crate::error::ApiError;
use crate::services::watch_tasks;
use crate::state::AppState;

/// GET /api/tasks/subscribe - live `tasks.list` as Server-Sent Events
///
/// Each `tasks` event carries the caller's complete list; clients replace
/// what they have rather than merging. A failed re-read is sent as an
/// `error` event carrying the usual error body.
pub async fn subscribe(
    State(state): State<AppState>,
    ctx: RequestContext,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, ApiError> {
    let user_id = require_user_id(&ctx)?;
    let updates = watch_tasks(state.tasks.clone(), ctx)?;
    tracing::debug!("Live query opened for {}", user_id);

    let events = updates.map(|result| {
        let event = match result {
            Ok(tasks) => Event::default().event("tasks").json_data(&tasks),
            Err(err) => Event::default().event("error").json_data(ApiError::from(err).to_json()),
        };
        Ok(event.unwrap_or_else(|e| {
            tracing::error!("Failed to encode live query event: {}", e);
            Event::default().event("error").data("failed to encode task list")
        }))
    });

    Ok(Sse::new(events).keep_alive(KeepAlive::default()))
}
