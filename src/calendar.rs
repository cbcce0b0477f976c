//! The calendar projector: it lays a task list out on a month grid.
//!
//! Weeks start on Monday. A month view is made of complete weeks, so it also contains
//! the trailing days of the previous month and the leading days of the next one.

use chrono::{Datelike, Duration, Months, NaiveDate};

use crate::config::CELL_LIST_LIMIT;
use crate::task::Task;

/// Seven consecutive days, from Monday to Sunday
pub type Week = [NaiveDate; 7];

/// The first day of the month `date` is in
pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.day0() as i64)
}

/// The last day of the month `date` is in
pub fn last_of_month(date: NaiveDate) -> NaiveDate {
    (28..=31).rev()
        .find_map(|day| NaiveDate::from_ymd_opt(date.year(), date.month(), day))
        .unwrap_or(date)
}

/// Shift a date by a number of months.
///
/// The day of month is kept when it exists in the target month, and is clamped to its last day otherwise
/// (e.g. one month after January 31st is February 28th or 29th).
pub fn shift_months(date: NaiveDate, delta: i32) -> NaiveDate {
    let shifted = if delta >= 0 {
        date.checked_add_months(Months::new(delta as u32))
    } else {
        date.checked_sub_months(Months::new(delta.unsigned_abs()))
    };
    shifted.unwrap_or(date)
}

/// The weeks to display for the month `anchor` is in: from the Monday on or before its first day,
/// to the Sunday on or after its last day
pub fn month_grid(anchor: NaiveDate) -> Vec<Week> {
    let first = first_of_month(anchor);
    let last = last_of_month(anchor);
    let start = first - Duration::days(first.weekday().num_days_from_monday() as i64);
    let end = last + Duration::days(6 - last.weekday().num_days_from_monday() as i64);

    let mut weeks = Vec::new();
    let mut monday = start;
    while monday <= end {
        let mut week = [monday; 7];
        for (offset, day) in week.iter_mut().enumerate() {
            *day = monday + Duration::days(offset as i64);
        }
        weeks.push(week);
        monday = monday + Duration::days(7);
    }
    weeks
}

/// The tasks that are due on this exact date
pub fn tasks_on<'a, I>(tasks: I, date: NaiveDate) -> Vec<&'a Task>
where
    I: IntoIterator<Item = &'a Task>,
{
    tasks.into_iter()
        .filter(|t| t.is_due_on(date))
        .collect()
}

/// Every task of a day, for the day detail view. Nothing is truncated there
pub fn day_detail<'a, I>(tasks: I, date: NaiveDate) -> Vec<&'a Task>
where
    I: IntoIterator<Item = &'a Task>,
{
    tasks_on(tasks, date)
}


/// What a calendar cell displays
#[derive(Clone, Debug, PartialEq)]
pub enum CellContent<'a> {
    Empty,
    /// Few enough tasks to show each of them
    Listed(Vec<&'a Task>),
    /// Too many tasks: only their count is shown
    Count(usize),
}

impl<'a> CellContent<'a> {
    fn from_tasks(tasks: Vec<&'a Task>) -> Self {
        match tasks.len() {
            0 => CellContent::Empty,
            n if n > CELL_LIST_LIMIT => CellContent::Count(n),
            _ => CellContent::Listed(tasks),
        }
    }

    /// How many tasks are due that day
    pub fn task_count(&self) -> usize {
        match self {
            CellContent::Empty => 0,
            CellContent::Listed(tasks) => tasks.len(),
            CellContent::Count(n) => *n,
        }
    }
}

/// The label shown in a cell that has too many tasks
pub fn count_label(count: usize) -> String {
    format!("{} tasks", count)
}

/// A day of the month view
#[derive(Clone, Debug, PartialEq)]
pub struct DayCell<'a> {
    pub date: NaiveDate,
    /// Whether this day belongs to the displayed month (and not to an adjacent one)
    pub in_month: bool,
    pub is_today: bool,
    pub content: CellContent<'a>,
}

/// A month laid out as complete weeks
#[derive(Clone, Debug, PartialEq)]
pub struct MonthView<'a> {
    pub anchor: NaiveDate,
    pub weeks: Vec<Vec<DayCell<'a>>>,
}

impl<'a> MonthView<'a> {
    /// e.g. `March 2025`
    pub fn title(&self) -> String {
        self.anchor.format("%B %Y").to_string()
    }

    pub fn cells(&self) -> impl Iterator<Item = &DayCell<'a>> {
        self.weeks.iter().flatten()
    }
}

/// Project a task list onto the month `anchor` is in
pub fn project<'a, I>(anchor: NaiveDate, tasks: I, today: NaiveDate) -> MonthView<'a>
where
    I: IntoIterator<Item = &'a Task>,
{
    let tasks: Vec<&'a Task> = tasks.into_iter().collect();
    let weeks = month_grid(anchor)
        .iter()
        .map(|week| {
            week.iter()
                .map(|&date| DayCell {
                    date,
                    in_month: date.month() == anchor.month() && date.year() == anchor.year(),
                    is_today: date == today,
                    content: CellContent::from_tasks(tasks_on(tasks.iter().copied(), date)),
                })
                .collect()
        })
        .collect();

    MonthView { anchor, weeks }
}


/// The navigation state of the calendar view
#[derive(Clone, Debug, PartialEq)]
pub struct CalendarState {
    /// Any day of the displayed month
    anchor: NaiveDate,
    selected_day: Option<NaiveDate>,
    detail_open: bool,
}

impl CalendarState {
    pub fn new(anchor: NaiveDate) -> Self {
        Self { anchor, selected_day: None, detail_open: false }
    }

    pub fn anchor(&self) -> NaiveDate                { self.anchor       }
    pub fn selected_day(&self) -> Option<NaiveDate>  { self.selected_day }
    pub fn is_detail_open(&self) -> bool             { self.detail_open  }

    pub fn next_month(&mut self) {
        self.anchor = shift_months(self.anchor, 1);
    }

    pub fn previous_month(&mut self) {
        self.anchor = shift_months(self.anchor, -1);
    }

    /// Select a day, and open its detail view
    pub fn select_day(&mut self, date: NaiveDate) {
        self.selected_day = Some(date);
        self.detail_open = true;
    }

    /// Close the detail view. The selected day is kept, so that a new task can be pre-filled with it
    pub fn close_detail(&mut self) {
        self.detail_open = false;
    }

    pub fn clear_selection(&mut self) {
        self.selected_day = None;
        self.detail_open = false;
    }
}



#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;
    use crate::task::TaskStatus;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn task(id: i64, title: &str, due: NaiveDate) -> Task {
        Task::new(id, title.to_string(), String::new(), TaskStatus::ToDo, Some(due), 1)
    }

    #[test]
    fn grids_are_complete_weeks() {
        for year in 1999..2031 {
            for month in 1..=12 {
                let anchor = date(year, month, 15);
                let weeks = month_grid(anchor);
                let days: Vec<NaiveDate> = weeks.iter().flatten().cloned().collect();

                assert!(weeks.len() >= 4 && weeks.len() <= 6);
                assert_eq!(days.len() % 7, 0);
                assert_eq!(days[0].weekday(), Weekday::Mon);
                assert_eq!(days[days.len() - 1].weekday(), Weekday::Sun);
                assert!(days[0] <= first_of_month(anchor));
                assert!(*days.last().unwrap() >= last_of_month(anchor));
                for pair in days.windows(2) {
                    assert_eq!(pair[1] - pair[0], Duration::days(1));
                }
            }
        }
    }

    #[test]
    fn february_2021_fits_four_weeks() {
        // Feb 1st 2021 is a Monday, Feb 28th a Sunday
        let weeks = month_grid(date(2021, 2, 10));
        assert_eq!(weeks.len(), 4);
        assert_eq!(weeks[0][0], date(2021, 2, 1));
        assert_eq!(weeks[3][6], date(2021, 2, 28));
    }

    #[test]
    fn adjacent_month_days() {
        // March 1st 2025 is a Saturday
        let no_tasks: Vec<Task> = Vec::new();
        let view = project(date(2025, 3, 1), &no_tasks, date(2025, 3, 4));
        let first = &view.weeks[0][0];
        assert_eq!(first.date, date(2025, 2, 24));
        assert!(first.in_month == false);
        assert_eq!(view.cells().filter(|c| c.in_month).count(), 31);
        assert_eq!(view.cells().filter(|c| c.is_today).count(), 1);
        assert_eq!(view.title(), "March 2025");
    }

    #[test]
    fn buckets_use_exact_date_equality() {
        let json = r#"[{"id": 1, "title": "late", "description": "", "status": "TO_DO", "dueDate": "2024-05-01T23:59:00", "userId": 1},
                       {"id": 2, "title": "next", "description": "", "status": "TO_DO", "dueDate": "2024-05-02", "userId": 1}]"#;
        let tasks: Vec<Task> = serde_json::from_str(json).unwrap();

        let may_first: Vec<i64> = tasks_on(&tasks, date(2024, 5, 1)).iter().map(|t| t.id()).collect();
        assert_eq!(may_first, vec![1]);
        let may_second: Vec<i64> = tasks_on(&tasks, date(2024, 5, 2)).iter().map(|t| t.id()).collect();
        assert_eq!(may_second, vec![2]);
        assert!(tasks_on(&tasks, date(2024, 4, 30)).is_empty());
    }

    #[test]
    fn crowded_days_only_show_a_count() {
        let day = date(2025, 6, 10);
        let tasks = vec![
            task(1, "a", day), task(2, "b", day), task(3, "c", day),
            task(4, "d", date(2025, 6, 11)), task(5, "e", date(2025, 6, 11)),
            task(6, "f", date(2025, 6, 12)),
        ];
        let view = project(day, &tasks, day);
        let cell = |d: NaiveDate| view.cells().find(|c| c.date == d).unwrap().content.clone();

        assert_eq!(cell(day), CellContent::Count(3));
        assert_eq!(count_label(3), "3 tasks");
        match cell(date(2025, 6, 11)) {
            CellContent::Listed(listed) => {
                let titles: Vec<&str> = listed.iter().map(|t| t.title()).collect();
                assert_eq!(titles, vec!["d", "e"]);
            },
            other => panic!("unexpected content {:?}", other),
        }
        assert_eq!(cell(date(2025, 6, 12)).task_count(), 1);
        assert_eq!(cell(date(2025, 6, 13)), CellContent::Empty);

        // The detail view is never truncated
        assert_eq!(day_detail(&tasks, day).len(), 3);
    }

    #[test]
    fn month_navigation_clamps() {
        assert_eq!(shift_months(date(2025, 1, 31), 1), date(2025, 2, 28));
        assert_eq!(shift_months(date(2024, 1, 31), 1), date(2024, 2, 29));
        assert_eq!(shift_months(date(2025, 3, 31), -1), date(2025, 2, 28));
        assert_eq!(shift_months(date(2025, 5, 31), -1), date(2025, 4, 30));
        assert_eq!(shift_months(date(2025, 12, 15), 1), date(2026, 1, 15));

        let mut state = CalendarState::new(date(2025, 10, 31));
        state.previous_month();
        assert_eq!(state.anchor(), date(2025, 9, 30));
        state.next_month();
        assert_eq!(state.anchor(), date(2025, 10, 30));
    }

    #[test]
    fn day_selection() {
        let mut state = CalendarState::new(date(2025, 10, 1));
        state.select_day(date(2025, 10, 9));
        assert!(state.is_detail_open());
        state.close_detail();
        assert_eq!(state.selected_day(), Some(date(2025, 10, 9)));
        state.clear_selection();
        assert_eq!(state.selected_day(), None);
    }
}
