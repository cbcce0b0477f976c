//! The task list filter: a free-text search combined with a status filter

use std::fmt::{Display, Formatter};

use crate::config::LIST_PAGE_SIZE;
use crate::task::{Task, TaskStatus};

/// Which statuses the list shows
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StatusFilter {
    All,
    Only(TaskStatus),
}

impl Default for StatusFilter {
    fn default() -> Self {
        StatusFilter::All
    }
}

impl From<&str> for StatusFilter {
    /// `all` (in any case) means every status, anything else is a status name
    fn from(raw: &str) -> Self {
        if raw.eq_ignore_ascii_case("all") {
            StatusFilter::All
        } else {
            StatusFilter::Only(TaskStatus::from(raw))
        }
    }
}

impl Display for StatusFilter {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        match self {
            StatusFilter::All => write!(f, "all"),
            StatusFilter::Only(status) => write!(f, "{}", status),
        }
    }
}

impl StatusFilter {
    pub fn matches(&self, status: &TaskStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(expected) => expected == status,
        }
    }
}


/// The filter state of the task list
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ListFilter {
    pub search: String,
    pub status: StatusFilter,
    /// Whether every card is shown, or only the first page
    pub show_all: bool,
}

impl ListFilter {
    pub fn new<S: ToString>(search: S, status: StatusFilter) -> Self {
        Self { search: search.to_string(), status, show_all: false }
    }

    /// Whether a task passes both the search and the status filter.
    ///
    /// The search term is matched case-insensitively against the title and the description.
    pub fn matches(&self, task: &Task) -> bool {
        let search_ok = if self.search.is_empty() {
            true
        } else {
            let needle = self.search.to_lowercase();
            task.title().to_lowercase().contains(&needle)
                || task.description().to_lowercase().contains(&needle)
        };
        search_ok && self.status.matches(task.status())
    }

    /// The tasks that pass this filter, in their original order
    pub fn apply<'a>(&self, tasks: &'a [Task]) -> Vec<&'a Task> {
        tasks.iter()
            .filter(|t| self.matches(t))
            .collect()
    }

    /// The filtered tasks that are actually displayed as cards: the first page, unless `show_all` is set
    pub fn visible<'a>(&self, tasks: &'a [Task]) -> Vec<&'a Task> {
        let filtered = self.apply(tasks);
        if self.show_all {
            filtered
        } else {
            filtered.into_iter().take(LIST_PAGE_SIZE).collect()
        }
    }

    /// Whether some filtered tasks are hidden behind "show all"
    pub fn has_more(&self, tasks: &[Task]) -> bool {
        self.apply(tasks).len() > LIST_PAGE_SIZE
    }

    /// The tasks the calendar and the dashboard are fed with.
    ///
    /// They show every task unless a status filter is set; the search term alone does not affect them.
    pub fn for_overviews<'a>(&self, tasks: &'a [Task]) -> Vec<&'a Task> {
        match self.status {
            StatusFilter::All => tasks.iter().collect(),
            StatusFilter::Only(_) => self.apply(tasks),
        }
    }
}



#[cfg(test)]
mod tests {
    use super::*;

    fn tasks() -> Vec<Task> {
        vec![
            Task::new(1, "Buy milk".into(), "".into(), TaskStatus::ToDo, None, 1),
            Task::new(2, "Pay bills".into(), "".into(), TaskStatus::Done, None, 1),
        ]
    }

    fn ids(tasks: Vec<&Task>) -> Vec<i64> {
        tasks.iter().map(|t| t.id()).collect()
    }

    #[test]
    fn search_and_status() {
        let tasks = tasks();
        assert_eq!(ids(ListFilter::new("milk", StatusFilter::All).apply(&tasks)), vec![1]);
        assert_eq!(ids(ListFilter::new("", StatusFilter::Only(TaskStatus::Done)).apply(&tasks)), vec![2]);
        assert!(ListFilter::new("groceries", StatusFilter::All).apply(&tasks).is_empty());
        assert_eq!(ids(ListFilter::default().apply(&tasks)), vec![1, 2]);
    }

    #[test]
    fn search_is_case_insensitive_and_covers_description() {
        let tasks = vec![Task::new(5, "Call".into(), "ask about the MILKMAN".into(), TaskStatus::InProgress, None, 1)];
        assert_eq!(ids(ListFilter::new("Milk", StatusFilter::All).apply(&tasks)), vec![5]);
        assert!(ListFilter::new("milk", StatusFilter::Only(TaskStatus::ToDo)).apply(&tasks).is_empty());
    }

    #[test]
    fn filtering_is_idempotent() {
        let tasks = tasks();
        let filter = ListFilter::new("b", StatusFilter::from("all"));
        let once: Vec<Task> = filter.apply(&tasks).into_iter().cloned().collect();
        let twice: Vec<Task> = filter.apply(&once).into_iter().cloned().collect();
        assert_eq!(once, twice);
        assert_eq!(filter.apply(&tasks), filter.apply(&tasks));
    }

    #[test]
    fn pagination() {
        let tasks: Vec<Task> = (1..=8).map(|id| Task::new(id, format!("t{}", id), "".into(), TaskStatus::ToDo, None, 1)).collect();
        let mut filter = ListFilter::default();
        assert_eq!(filter.visible(&tasks).len(), LIST_PAGE_SIZE);
        assert!(filter.has_more(&tasks));
        filter.show_all = true;
        assert_eq!(filter.visible(&tasks).len(), 8);
    }

    #[test]
    fn overviews_ignore_the_search_term() {
        let tasks = tasks();
        assert_eq!(ListFilter::new("milk", StatusFilter::All).for_overviews(&tasks).len(), 2);
        assert_eq!(ids(ListFilter::new("", StatusFilter::from("DONE")).for_overviews(&tasks)), vec![2]);
    }
}
