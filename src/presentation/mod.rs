//! Display helpers shared by the table, kanban and detail renderers

use chrono::{TimeZone, Utc};
use crossterm::style::{Color, Stylize};

use crate::database::models::{TaskPriority, TaskStatus};

/// Render epoch milliseconds as a short US date, e.g. `Jan 5, 2025`
pub fn format_date(timestamp_ms: i64) -> String {
    match Utc.timestamp_millis_opt(timestamp_ms).single() {
        Some(datetime) => datetime.format("%b %-d, %Y").to_string(),
        None => "Invalid Date".to_string(),
    }
}

/// The due date to show, if any. A zero timestamp counts as unset.
pub fn due_date(due_date: Option<i64>) -> Option<i64> {
    due_date.filter(|&due| due != 0)
}

/// A due date is overdue only when set and strictly before `now_ms`
pub fn is_overdue(due_date: Option<i64>, now_ms: i64) -> bool {
    matches!(self::due_date(due_date), Some(due) if due < now_ms)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadgeColor {
    Red,
    Yellow,
    Green,
    Slate,
    Blue,
}

impl BadgeColor {
    /// Utility classes for a web badge
    pub fn class(self) -> &'static str {
        match self {
            BadgeColor::Red => "bg-red-100 text-red-800 dark:bg-red-900/30 dark:text-red-300",
            BadgeColor::Yellow => "bg-yellow-100 text-yellow-800 dark:bg-yellow-900/30 dark:text-yellow-300",
            BadgeColor::Green => "bg-green-100 text-green-800 dark:bg-green-900/30 dark:text-green-300",
            BadgeColor::Slate => "bg-slate-100 text-slate-800 dark:bg-slate-800 dark:text-slate-300",
            BadgeColor::Blue => "bg-blue-100 text-blue-800 dark:bg-blue-900/30 dark:text-blue-300",
        }
    }

    /// Terminal foreground colour
    pub fn color(self) -> Color {
        match self {
            BadgeColor::Red => Color::Red,
            BadgeColor::Yellow => Color::Yellow,
            BadgeColor::Green => Color::Green,
            BadgeColor::Slate => Color::Grey,
            BadgeColor::Blue => Color::Blue,
        }
    }

    /// Wrap `text` in this colour when `enabled`, plain otherwise
    pub fn paint(self, text: &str, enabled: bool) -> String {
        if enabled {
            text.with(self.color()).to_string()
        } else {
            text.to_string()
        }
    }
}

pub fn priority_color(priority: TaskPriority) -> BadgeColor {
    match priority {
        TaskPriority::High => BadgeColor::Red,
        TaskPriority::Medium => BadgeColor::Yellow,
        TaskPriority::Low => BadgeColor::Green,
    }
}

pub fn status_color(status: TaskStatus) -> BadgeColor {
    match status {
        TaskStatus::Todo => BadgeColor::Slate,
        TaskStatus::InProgress => BadgeColor::Blue,
        TaskStatus::Done => BadgeColor::Green,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_dates_in_short_us_form() {
        // 2025-01-05T00:00:00Z
        assert_eq!(format_date(1_736_035_200_000), "Jan 5, 2025");
        // 2024-12-25T23:59:59Z
        assert_eq!(format_date(1_735_171_199_000), "Dec 25, 2024");
    }

    #[test]
    fn out_of_range_timestamps_are_invalid() {
        assert_eq!(format_date(i64::MAX), "Invalid Date");
    }

    #[test]
    fn overdue_is_strictly_before_now() {
        let now = 1_700_000_000_000;
        assert!(is_overdue(Some(now - 1), now));
        assert!(!is_overdue(Some(now), now));
        assert!(!is_overdue(Some(now + 1), now));
        assert!(!is_overdue(None, now));
    }

    #[test]
    fn zero_due_date_counts_as_unset() {
        let now = 1_700_000_000_000;
        assert!(!is_overdue(Some(0), now));
        assert_eq!(due_date(Some(0)), None);
        assert_eq!(due_date(Some(now)), Some(now));
        assert!(is_overdue(Some(-1), now));
    }

    #[test]
    fn colours_follow_priority_and_status() {
        assert_eq!(priority_color(TaskPriority::High), BadgeColor::Red);
        assert_eq!(priority_color(TaskPriority::Medium), BadgeColor::Yellow);
        assert_eq!(priority_color(TaskPriority::Low), BadgeColor::Green);
        assert_eq!(status_color(TaskStatus::Todo), BadgeColor::Slate);
        assert_eq!(status_color(TaskStatus::InProgress), BadgeColor::Blue);
        assert_eq!(status_color(TaskStatus::Done), BadgeColor::Green);
        assert!(BadgeColor::Red.class().starts_with("bg-red-100"));
    }

    #[test]
    fn paint_is_plain_when_disabled() {
        assert_eq!(BadgeColor::Blue.paint("Done", false), "Done");
        assert_eq!(BadgeColor::Blue.paint("Done", true), "Done".with(Color::Blue).to_string());
        assert_eq!(BadgeColor::Slate.color(), Color::Grey);
    }
}
