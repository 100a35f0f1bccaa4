use std::fmt;
use std::str::FromStr;

use crate::database::models::TaskId;

/// Which renderer shows the task list. Not persisted between runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    #[default]
    Kanban,
    Table,
}

impl ViewMode {
    pub fn toggle(self) -> Self {
        match self {
            ViewMode::Kanban => ViewMode::Table,
            ViewMode::Table => ViewMode::Kanban,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ViewMode::Kanban => "kanban",
            ViewMode::Table => "table",
        }
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ViewMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "kanban" | "board" => Ok(ViewMode::Kanban),
            "table" | "list" => Ok(ViewMode::Table),
            other => Err(format!("unknown view '{}', expected kanban or table", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CreateDialog {
    #[default]
    Closed,
    Open,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DetailDialog {
    #[default]
    Closed,
    Viewing(TaskId),
    Editing(TaskId),
}

impl DetailDialog {
    pub fn task_id(&self) -> Option<&TaskId> {
        match self {
            DetailDialog::Closed => None,
            DetailDialog::Viewing(id) | DetailDialog::Editing(id) => Some(id),
        }
    }
}

/// Dialog and view state of the board screen
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoardState {
    pub view: ViewMode,
    pub create: CreateDialog,
    pub detail: DetailDialog,
}

impl BoardState {
    pub fn toggle_view(&mut self) {
        self.view = self.view.toggle();
    }

    pub fn open_create(&mut self) {
        self.create = CreateDialog::Open;
    }

    pub fn close_create(&mut self) {
        self.create = CreateDialog::Closed;
    }

    pub fn open_detail(&mut self, id: TaskId) {
        self.detail = DetailDialog::Viewing(id);
    }

    pub fn close_detail(&mut self) {
        self.detail = DetailDialog::Closed;
    }

    /// Viewing -> Editing. Ignored unless a task is being viewed.
    pub fn begin_edit(&mut self) {
        if let DetailDialog::Viewing(id) = &self.detail {
            self.detail = DetailDialog::Editing(id.clone());
        }
    }

    pub fn cancel_edit(&mut self) {
        if let DetailDialog::Editing(id) = &self.detail {
            self.detail = DetailDialog::Viewing(id.clone());
        }
    }

    /// A successful form submit closes whichever dialog hosted the form
    pub fn on_saved(&mut self) {
        match self.detail {
            DetailDialog::Editing(_) => self.detail = DetailDialog::Closed,
            _ => self.create = CreateDialog::Closed,
        }
    }
}
