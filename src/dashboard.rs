//! The dashboard views: upcoming tasks and per-status counters

use chrono::NaiveDate;

use crate::config::UPCOMING_LIMIT;
use crate::task::{Task, TaskStatus};

/// What the "upcoming tasks" widget shows
#[derive(Clone, Debug, PartialEq)]
pub enum Upcoming<'a> {
    /// Nothing is due today or later
    Empty,
    Tasks(Vec<&'a Task>),
}

impl<'a> Upcoming<'a> {
    pub fn tasks(&self) -> &[&'a Task] {
        match self {
            Upcoming::Empty => &[],
            Upcoming::Tasks(tasks) => tasks,
        }
    }
}

/// The tasks due today or later, soonest first, at most [`UPCOMING_LIMIT`] of them.
///
/// Tasks due the same day keep their relative order.
pub fn upcoming<'a, I>(tasks: I, today: NaiveDate) -> Upcoming<'a>
where
    I: IntoIterator<Item = &'a Task>,
{
    let mut selected: Vec<(NaiveDate, &'a Task)> = tasks.into_iter()
        .filter_map(|t| t.due_date().map(|due| (due, t)))
        .filter(|(due, _)| *due >= today)
        .collect();
    selected.sort_by_key(|(due, _)| *due);

    let selected: Vec<&'a Task> = selected.into_iter()
        .take(UPCOMING_LIMIT)
        .map(|(_, t)| t)
        .collect();

    if selected.is_empty() {
        Upcoming::Empty
    } else {
        Upcoming::Tasks(selected)
    }
}


/// How many tasks have each status
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StatusCounts {
    pub to_do: usize,
    pub in_progress: usize,
    pub done: usize,
}

impl StatusCounts {
    pub fn get(&self, status: &TaskStatus) -> usize {
        match status {
            TaskStatus::ToDo => self.to_do,
            TaskStatus::InProgress => self.in_progress,
            TaskStatus::Done => self.done,
            TaskStatus::Other(_) => 0,
        }
    }
}

/// Count tasks per status. Tasks with an unknown status are not counted
pub fn status_counts<'a, I>(tasks: I) -> StatusCounts
where
    I: IntoIterator<Item = &'a Task>,
{
    let mut counts = StatusCounts::default();
    for task in tasks {
        match task.status() {
            TaskStatus::ToDo => counts.to_do += 1,
            TaskStatus::InProgress => counts.in_progress += 1,
            TaskStatus::Done => counts.done += 1,
            TaskStatus::Other(other) => log::debug!("Not counting task {} with status {}", task.id(), other),
        }
    }
    counts
}
