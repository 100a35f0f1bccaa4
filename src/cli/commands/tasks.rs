use std::io;

use clap::Subcommand;
use crossterm::cursor::MoveTo;
use crossterm::execute;
use crossterm::terminal::{Clear, ClearType};
use futures::StreamExt;
use serde_json::json;

use crate::cli::config::ClientSettings;
use crate::cli::utils::{output_data, output_success};
use crate::cli::OutputFormat;
use crate::database::models::{TaskId, TaskPriority, TaskStatus};
use crate::ui::{
    delete_with_confirmation, handle_drop, render_detail, render_kanban, render_table, AssumeYes, Confirm,
    StdinConfirm, TaskForm, TasksApi, ViewMode,
};

#[derive(Subcommand)]
pub enum TaskCommands {
    #[command(about = "List your tasks")]
    List {
        #[arg(long, default_value_t = ViewMode::Kanban, help = "kanban or table")]
        view: ViewMode,
    },

    #[command(about = "Show one task")]
    Show {
        #[arg(help = "Task ID")]
        id: String,
    },

    #[command(about = "Create a task")]
    Create {
        #[arg(help = "Title")]
        title: String,
        #[arg(long, help = "Description")]
        description: Option<String>,
        #[arg(long, default_value_t = TaskStatus::Todo, help = "To Do, In Progress or Done")]
        status: TaskStatus,
        #[arg(long, default_value_t = TaskPriority::Medium, help = "Low, Medium or High")]
        priority: TaskPriority,
        #[arg(long, help = "Due date as YYYY-MM-DD")]
        due: Option<String>,
    },

    #[command(about = "Edit a task; omitted options keep their value")]
    Edit {
        #[arg(help = "Task ID")]
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        status: Option<TaskStatus>,
        #[arg(long)]
        priority: Option<TaskPriority>,
        #[arg(long, help = "Due date as YYYY-MM-DD")]
        due: Option<String>,
    },

    #[command(about = "Move a task to another board column")]
    Move {
        #[arg(help = "Task ID")]
        id: String,
        #[arg(help = "Target column: To Do, In Progress or Done")]
        status: TaskStatus,
    },

    #[command(about = "Delete a task")]
    Delete {
        #[arg(help = "Task ID")]
        id: String,
        #[arg(long, short, help = "Skip the confirmation prompt")]
        yes: bool,
    },

    #[command(about = "Follow your task list live")]
    Watch {
        #[arg(long, default_value_t = ViewMode::Kanban, help = "kanban or table")]
        view: ViewMode,
    },
}

fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

fn render_list(tasks: &[crate::database::models::Task], view: ViewMode, color: bool) -> String {
    match view {
        ViewMode::Kanban => render_kanban(tasks, now_ms(), color),
        ViewMode::Table => render_table(tasks, now_ms(), color),
    }
}

pub async fn handle(cmd: TaskCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let api = ClientSettings::from_env().api()?;
    let color = output_format.use_color();

    match cmd {
        TaskCommands::List { view } => {
            let tasks = api.list().await?;
            output_data(&output_format, &tasks, || render_list(&tasks, view, color))
        }
        TaskCommands::Show { id } => {
            let task = api.get(&TaskId::from(id)).await?;
            output_data(&output_format, &task, || render_detail(&task, now_ms(), color))
        }
        TaskCommands::Create { title, description, status, priority, due } => {
            let mut form = TaskForm {
                title,
                description: description.unwrap_or_default(),
                status,
                priority,
                due_date: due.unwrap_or_default(),
                ..TaskForm::new()
            };
            let id = form.submit(&api, None).await?;
            output_success(&output_format, &format!("Created task {}", id), Some(json!({ "id": id })))
        }
        TaskCommands::Edit { id, title, description, status, priority, due } => {
            let id = TaskId::from(id);
            let task = api.get(&id).await?;

            let mut form = TaskForm::for_task(&task);
            if let Some(title) = title {
                form.title = title;
            }
            if let Some(description) = description {
                form.description = description;
            }
            if let Some(status) = status {
                form.status = status;
            }
            if let Some(priority) = priority {
                form.priority = priority;
            }
            if let Some(due) = due {
                form.due_date = due;
            }

            form.submit(&api, Some(&id)).await?;
            output_success(&output_format, &format!("Updated task {}", id), Some(json!({ "id": id })))
        }
        TaskCommands::Move { id, status } => {
            let id = TaskId::from(id);
            let tasks = api.list().await?;
            if !tasks.iter().any(|t| t.id == id) {
                anyhow::bail!("Task '{}' not found", id);
            }

            let moved = handle_drop(&api, &tasks, &id, Some(status.as_str())).await?;
            let message = if moved {
                format!("Moved task {} to {}", id, status)
            } else {
                format!("Task {} is already in {}", id, status)
            };
            output_success(&output_format, &message, Some(json!({ "id": id, "moved": moved })))
        }
        TaskCommands::Delete { id, yes } => {
            let id = TaskId::from(id);
            let mut confirm: Box<dyn Confirm> = if yes { Box::new(AssumeYes) } else { Box::new(StdinConfirm) };

            let removed = delete_with_confirmation(&api, confirm.as_mut(), &id).await?;
            let message = if removed {
                format!("Deleted task {}", id)
            } else {
                "Delete cancelled".to_string()
            };
            output_success(&output_format, &message, Some(json!({ "id": id, "deleted": removed })))
        }
        TaskCommands::Watch { view } => {
            let mut updates = api.watch().await?;
            while let Some(update) = updates.next().await {
                let tasks = update?;
                match output_format {
                    OutputFormat::Json => println!("{}", serde_json::to_string(&tasks)?),
                    OutputFormat::Text => {
                        if color {
                            execute!(io::stdout(), Clear(ClearType::All), MoveTo(0, 0))?;
                        }
                        print!("{}", render_list(&tasks, view, color));
                    }
                }
            }
            Ok(())
        }
    }
}
