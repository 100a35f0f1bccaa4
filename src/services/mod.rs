pub mod change_feed;
pub mod live_query;

pub use change_feed::{ChangeFeed, ChangeKind, TaskChange};
pub use live_query::watch_tasks;
