//! Plain-text renderers for the table, kanban and detail views

use crate::database::models::Task;
use crate::presentation::{due_date, format_date, is_overdue, priority_color, status_color, BadgeColor};

use super::kanban::group_columns;

pub const EMPTY_TABLE: &str = "No tasks yet. Create your first task to get started!";
pub const EMPTY_COLUMN: &str = "No tasks";
pub const NO_DUE_DATE: &str = "No due date";

const HEADERS: [&str; 5] = ["ID", "Title", "Status", "Priority", "Due Date"];

fn due_label(task: &Task, now_ms: i64) -> (String, bool) {
    match due_date(task.due_date) {
        Some(due) if is_overdue(Some(due), now_ms) => (format!("{} (Overdue)", format_date(due)), true),
        Some(due) => (format_date(due), false),
        None => (NO_DUE_DATE.to_string(), false),
    }
}

fn pad(text: &str, width: usize) -> String {
    format!("{:<width$}", text, width = width)
}

pub fn render_table(tasks: &[Task], now_ms: i64, color: bool) -> String {
    if tasks.is_empty() {
        return format!("{}\n", EMPTY_TABLE);
    }

    let rows: Vec<([String; 5], bool, &Task)> = tasks
        .iter()
        .map(|task| {
            let (due, overdue) = due_label(task, now_ms);
            let cells = [
                task.id.to_string(),
                task.title.clone(),
                task.status.to_string(),
                task.priority.to_string(),
                due,
            ];
            (cells, overdue, task)
        })
        .collect();

    let mut widths = HEADERS.map(|h| h.chars().count());
    for (cells, _, _) in &rows {
        for (width, cell) in widths.iter_mut().zip(cells.iter()) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let header: Vec<String> = HEADERS.iter().zip(widths).map(|(h, w)| pad(h, w)).collect();
    let mut out = format!("{}\n", header.join("  ").trim_end());
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    out.push_str(&format!("{}\n", rule.join("  ")));

    for (cells, overdue, task) in rows {
        let line = [
            pad(&cells[0], widths[0]),
            pad(&cells[1], widths[1]),
            status_color(task.status).paint(&pad(&cells[2], widths[2]), color),
            priority_color(task.priority).paint(&pad(&cells[3], widths[3]), color),
            if overdue {
                BadgeColor::Red.paint(&cells[4], color)
            } else {
                cells[4].clone()
            },
        ];
        out.push_str(&format!("{}\n", line.join("  ").trim_end()));
    }
    out
}

pub fn render_kanban(tasks: &[Task], now_ms: i64, color: bool) -> String {
    let mut out = String::new();

    for column in group_columns(tasks) {
        let title = status_color(column.status).paint(column.status.as_str(), color);
        out.push_str(&format!("== {} ({}) ==\n", title, column.tasks.len()));

        if column.tasks.is_empty() {
            out.push_str(&format!("  {}\n", EMPTY_COLUMN));
        }
        for task in column.tasks {
            let priority = priority_color(task.priority).paint(task.priority.as_str(), color);
            out.push_str(&format!("  [{}] {}  {}\n", priority, task.title, task.id));
            if let Some(description) = task.description.as_deref() {
                out.push_str(&format!("      {}\n", first_line(description, 60)));
            }
            if due_date(task.due_date).is_some() {
                let (due, overdue) = due_label(task, now_ms);
                let due = if overdue { BadgeColor::Red.paint(&due, color) } else { due };
                out.push_str(&format!("      Due {}\n", due));
            }
        }
        out.push('\n');
    }
    out
}

pub fn render_detail(task: &Task, now_ms: i64, color: bool) -> String {
    let mut out = format!("{}\n", task.title);
    out.push_str(&format!(
        "{}  {}\n",
        status_color(task.status).paint(task.status.as_str(), color),
        priority_color(task.priority).paint(&format!("{} Priority", task.priority), color),
    ));

    if let Some(description) = task.description.as_deref() {
        out.push_str(&format!("\nDescription\n{}\n", description));
    }

    out.push('\n');
    if due_date(task.due_date).is_some() {
        let (due, overdue) = due_label(task, now_ms);
        let due = if overdue { BadgeColor::Red.paint(&due, color) } else { due };
        out.push_str(&format!("Due Date: {}\n", due));
    }
    out.push_str(&format!("Created:  {}\n", format_date(task.created_at)));
    out.push_str(&format!("ID:       {}\n", task.id));
    out
}

/// First line of `text`, cut to `max` characters
fn first_line(text: &str, max: usize) -> String {
    let line = text.lines().next().unwrap_or_default();
    if line.chars().count() > max {
        let cut: String = line.chars().take(max).collect();
        format!("{}...", cut)
    } else {
        line.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::TaskStatus;
    use crate::ui::recording::task;

    const JAN_2_2025: i64 = 1_735_776_000_000;

    #[test]
    fn empty_table_invites_first_task() {
        assert_eq!(render_table(&[], JAN_2_2025, false).trim_end(), EMPTY_TABLE);
    }

    #[test]
    fn table_marks_overdue_and_missing_due_dates() {
        let mut undated = task("b", "Beta", TaskStatus::Done);
        undated.due_date = None;
        let tasks = vec![task("a", "Alpha", TaskStatus::Todo), undated];

        let out = render_table(&tasks, JAN_2_2025, false);
        let lines: Vec<&str> = out.lines().collect();
        assert!(lines[0].starts_with("ID"));
        assert!(lines[2].contains("Jan 1, 2025 (Overdue)"));
        assert!(lines[3].contains(NO_DUE_DATE));
        assert!(!out.contains('\x1b'));
    }

    #[test]
    fn due_exactly_now_is_not_overdue() {
        let tasks = vec![task("a", "Alpha", TaskStatus::Todo)];
        let out = render_table(&tasks, 1_735_689_600_000, false);
        assert!(!out.contains("(Overdue)"));
    }

    #[test]
    fn kanban_lists_every_column_with_counts() {
        let tasks = vec![task("a", "Alpha", TaskStatus::Todo), task("c", "Gamma", TaskStatus::Todo)];
        let out = render_kanban(&tasks, 0, false);

        assert!(out.contains("== To Do (2) =="));
        assert!(out.contains("== In Progress (0) ==\n  No tasks"));
        assert!(out.contains("== Done (0) =="));
        assert!(out.find("Alpha") < out.find("Gamma"));
    }

    #[test]
    fn detail_shows_badges_and_dates() {
        let out = render_detail(&task("a", "Alpha", TaskStatus::InProgress), JAN_2_2025, false);
        assert!(out.starts_with("Alpha\nIn Progress  High Priority\n"));
        assert!(out.contains("Description\nAlpha notes"));
        assert!(out.contains("Due Date: Jan 1, 2025 (Overdue)"));
        assert!(out.contains("Created:  Nov 14, 2023"));
    }

    #[test]
    fn zero_due_date_renders_as_unset() {
        let mut zero = task("a", "Alpha", TaskStatus::Todo);
        zero.due_date = Some(0);

        let table = render_table(std::slice::from_ref(&zero), JAN_2_2025, false);
        assert!(table.contains(NO_DUE_DATE));
        assert!(!table.contains("Jan 1, 1970"));

        let kanban = render_kanban(std::slice::from_ref(&zero), JAN_2_2025, false);
        assert!(!kanban.contains("Due "));

        let detail = render_detail(&zero, JAN_2_2025, false);
        assert!(!detail.contains("Due Date:"));
        assert!(!detail.contains("(Overdue)"));
    }

    #[test]
    fn colour_wraps_badges() {
        let out = render_detail(&task("a", "Alpha", TaskStatus::InProgress), 0, true);
        assert!(out.contains(&BadgeColor::Blue.paint("In Progress", true)));
        assert!(out.contains(&BadgeColor::Red.paint("High Priority", true)));
    }
}
