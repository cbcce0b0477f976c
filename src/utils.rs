//! Some utility functions, that render the views as text

use chrono::{DateTime, Utc};

use crate::calendar::{count_label, CellContent, MonthView};
use crate::dashboard::{StatusCounts, Upcoming};
use crate::notification::Notification;
use crate::task::{status_color, Task, TaskStatus, DATE_FORMAT};

/// A one-line description of a task
pub fn format_task(task: &Task) -> String {
    let due = task.due_date()
        .map(|d| d.format(DATE_FORMAT).to_string())
        .unwrap_or_else(|| "no due date".to_string());
    format!("#{}\t[{}] {}\t(due {})", task.id(), format_status(task.status()), task.title(), due)
}

/// A status label, tagged with its display color
pub fn format_status(status: &TaskStatus) -> String {
    format!("{} {}", status.label(), status_color(status).to_hex_string())
}

pub fn print_task(task: &Task) {
    println!("    {}", format_task(task));
    if task.description().is_empty() == false {
        println!("    \t{}", task.description());
    }
}

pub fn print_tasks(tasks: &[&Task]) {
    if tasks.is_empty() {
        println!("    (no tasks)");
    }
    for task in tasks {
        print_task(task);
    }
}

/// Render a month view as a text grid.
///
/// Each week is a row of day numbers (`*` marks today, `.` the days of adjacent months, `+` the busy days),
/// followed by one line per busy day with its task titles, or its task count when it is crowded.
pub fn format_month(view: &MonthView) -> String {
    let mut out = format!("{:^34}\n", view.title());
    out.push_str(" Mon  Tue  Wed  Thu  Fri  Sat  Sun\n");

    for week in &view.weeks {
        let days: String = week.iter()
            .map(|cell| {
                let marker = if cell.is_today { '*' } else if cell.in_month { ' ' } else { '.' };
                let busy = if cell.content.task_count() > 0 { '+' } else { ' ' };
                format!("{}{}{} ", marker, cell.date.format("%d"), busy)
            })
            .collect();
        out.push_str(days.trim_end());
        out.push('\n');

        for cell in week {
            let content = match &cell.content {
                CellContent::Empty => continue,
                CellContent::Listed(tasks) => tasks.iter()
                    .map(|t| t.title())
                    .collect::<Vec<_>>()
                    .join(", "),
                CellContent::Count(n) => count_label(*n),
            };
            out.push_str(&format!("      {}: {}\n", cell.date.format("%b %d"), content));
        }
    }
    out
}

pub fn print_month(view: &MonthView) {
    print!("{}", format_month(view));
}

pub fn print_upcoming(upcoming: &Upcoming) {
    println!("Upcoming tasks");
    match upcoming {
        Upcoming::Empty => println!("    Nothing due from today on"),
        Upcoming::Tasks(tasks) => print_tasks(tasks),
    }
}

pub fn format_counts(counts: &StatusCounts) -> String {
    [TaskStatus::ToDo, TaskStatus::InProgress, TaskStatus::Done]
        .iter()
        .map(|s| format!("{}: {}", s.label(), counts.get(s)))
        .collect::<Vec<_>>()
        .join("  ")
}

/// Print the notifications that are still visible
pub fn print_notifications(notifications: &[Notification], now: DateTime<Utc>) {
    for notification in notifications.iter().filter(|n| n.is_expired(now) == false) {
        println!("{}", notification);
    }
}



#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use crate::calendar::project;

    #[test]
    fn task_line() {
        let task = Task::new(4, "Pay bills".into(), "".into(), TaskStatus::Done, NaiveDate::from_ymd_opt(2025, 1, 2), 1);
        assert_eq!(format_task(&task), "#4\t[Done #10b981] Pay bills\t(due 2025-01-02)");

        let task = Task::new(5, "Someday".into(), "".into(), TaskStatus::Other("LATER".into()), None, 1);
        assert_eq!(format_task(&task), "#5\t[LATER #6b7280] Someday\t(due no due date)");
    }

    fn tasks_on(day: NaiveDate, titles: &[&str]) -> Vec<Task> {
        titles.iter()
            .enumerate()
            .map(|(i, title)| Task::new(i as i64 + 1, title.to_string(), "".into(), TaskStatus::ToDo, Some(day), 1))
            .collect()
    }

    #[test]
    fn month_grid_text() {
        let day = NaiveDate::from_ymd_opt(2025, 6, 10).unwrap();
        let tasks = tasks_on(day, &["t1", "t2", "t3"]);
        let text = format_month(&project(day, &tasks, day));

        assert!(text.contains("June 2025"));
        assert!(text.contains("*10+"));
        assert!(text.contains("Jun 10: 3 tasks"));
        // June 2025 spans 6 weeks, plus the title, the weekday header and the busy day
        assert_eq!(text.lines().count(), 9);
    }

    #[test]
    fn listed_titles_are_complete() {
        let day = NaiveDate::from_ymd_opt(2025, 6, 10).unwrap();
        let tasks = tasks_on(day, &["Dentist appointment", "Groceries"]);
        let text = format_month(&project(day, &tasks, day));
        assert!(text.contains("Jun 10: Dentist appointment, Groceries"));
    }

    #[test]
    fn crowded_days_show_the_full_count() {
        let day = NaiveDate::from_ymd_opt(2025, 6, 10).unwrap();
        let titles: Vec<String> = (1..=12).map(|i| format!("task {}", i)).collect();
        let titles: Vec<&str> = titles.iter().map(|t| t.as_str()).collect();
        let tasks = tasks_on(day, &titles);
        let text = format_month(&project(day, &tasks, day));

        assert!(text.contains("Jun 10: 12 tasks"));
        assert!(text.contains("task 1") == false);
    }

    #[test]
    fn counters() {
        let counts = StatusCounts { to_do: 2, in_progress: 0, done: 1 };
        assert_eq!(format_counts(&counts), "To do: 2  In progress: 0  Done: 1");
    }
}
