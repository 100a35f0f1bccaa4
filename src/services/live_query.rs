use std::sync::Arc;

use futures::stream::{self, Stream};
use tokio::sync::broadcast::{error::RecvError, Receiver};
use tracing::debug;

use crate::auth::{require_user_id, RequestContext};
use crate::database::error::TaskError;
use crate::database::models::Task;
use crate::database::repository::TaskRepository;
use crate::services::change_feed::TaskChange;

struct Watch {
    repo: Arc<TaskRepository>,
    ctx: RequestContext,
    user_id: String,
    changes: Receiver<TaskChange>,
    primed: bool,
}

/// Live `tasks.list`: yields the caller's list now, then a fresh list after
/// every committed write to one of the caller's rows.
///
/// The feed is subscribed before the first read so no write can fall between them.
pub fn watch_tasks(
    repo: Arc<TaskRepository>,
    ctx: RequestContext,
) -> Result<impl Stream<Item = Result<Vec<Task>, TaskError>>, TaskError> {
    let user_id = require_user_id(&ctx)?;
    let changes = repo.feed().subscribe();

    let state = Watch {
        repo,
        ctx,
        user_id,
        changes,
        primed: false,
    };

    Ok(stream::unfold(state, |mut watch| async move {
        if watch.primed {
            loop {
                match watch.changes.recv().await {
                    Ok(change) if change.user_id == watch.user_id => break,
                    Ok(_) => continue,
                    Err(RecvError::Lagged(skipped)) => {
                        debug!("Live query for {} lagged by {} changes, re-reading", watch.user_id, skipped);
                        break;
                    }
                    Err(RecvError::Closed) => return None,
                }
            }
        }
        watch.primed = true;

        let result = watch.repo.list(&watch.ctx).await;
        Some((result, watch))
    }))
}
