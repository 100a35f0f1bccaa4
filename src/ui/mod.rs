//! Toolkit-independent view layer: view and dialog state, kanban moves, the
//! task form, confirmation-gated delete, text renderers and the API client.

pub mod client;
pub mod confirm;
pub mod form;
pub mod kanban;
pub mod render;
pub mod view;

#[cfg(test)]
pub(crate) mod recording;

pub use client::{ClientError, HttpTasksApi, TasksApi};
pub use confirm::{delete_with_confirmation, AssumeYes, Confirm, StdinConfirm, DELETE_PROMPT};
pub use form::{FormError, TaskForm};
pub use kanban::{drop_patch, group_columns, handle_drop, KanbanColumn};
pub use render::{render_detail, render_kanban, render_table};
pub use view::{BoardState, CreateDialog, DetailDialog, ViewMode};
