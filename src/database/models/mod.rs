pub mod task;

pub use task::{NewTask, Task, TaskId, TaskPatch, TaskPriority, TaskStatus};
