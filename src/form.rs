//! The task form, used both to add and to edit a task

use chrono::NaiveDate;

use crate::task::{Task, TaskDraft, TaskId, TaskStatus, DATE_FORMAT};

pub const TITLE_MIN_LENGTH: usize = 3;

/// Whether the form creates a task or edits an existing one
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormMode {
    Add,
    Edit(TaskId),
}

/// The validation errors of each field. `None` means the field is valid
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FieldErrors {
    pub title: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<String>,
}

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    pub fn count(&self) -> usize {
        [&self.title, &self.description, &self.due_date]
            .iter()
            .filter(|e| e.is_some())
            .count()
    }
}


/// A task form.
///
/// Values are edited freely; they are only validated on [`TaskForm::submit`].
#[derive(Clone, Debug, PartialEq)]
pub struct TaskForm {
    mode: FormMode,
    open: bool,
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    /// As typed, `YYYY-MM-DD`
    pub due_date: String,
    errors: FieldErrors,
}

impl Default for TaskForm {
    fn default() -> Self {
        Self {
            mode: FormMode::Add,
            open: false,
            title: String::new(),
            description: String::new(),
            status: TaskStatus::ToDo,
            due_date: String::new(),
            errors: FieldErrors::default(),
        }
    }
}

impl TaskForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> FormMode          { self.mode    }
    pub fn is_open(&self) -> bool           { self.open    }
    pub fn errors(&self) -> &FieldErrors    { &self.errors }

    /// Open a blank form, with its due date pre-filled if a calendar day is selected
    pub fn open_add(&mut self, selected_day: Option<NaiveDate>) {
        *self = Self {
            open: true,
            due_date: selected_day.map(|d| d.format(DATE_FORMAT).to_string()).unwrap_or_default(),
            ..Self::default()
        };
    }

    /// Open the form on an existing task
    pub fn open_edit(&mut self, task: &Task) {
        *self = Self {
            mode: FormMode::Edit(task.id()),
            open: true,
            title: task.title().to_string(),
            description: task.description().to_string(),
            status: task.status().clone(),
            due_date: task.due_date().map(|d| d.format(DATE_FORMAT).to_string()).unwrap_or_default(),
            errors: FieldErrors::default(),
        };
    }

    pub fn close(&mut self) {
        *self = Self::default();
    }

    fn parsed_due_date(&self) -> Result<NaiveDate, chrono::ParseError> {
        NaiveDate::parse_from_str(self.due_date.trim(), DATE_FORMAT)
    }

    /// Check every field, and report every error at once
    pub fn validate(&self, today: NaiveDate) -> FieldErrors {
        let mut errors = FieldErrors::default();

        let title = self.title.trim();
        if title.is_empty() {
            errors.title = Some("Title is required".to_string());
        } else if title.chars().count() < TITLE_MIN_LENGTH {
            errors.title = Some(format!("Title must be at least {} characters long", TITLE_MIN_LENGTH));
        }

        if self.description.trim().is_empty() {
            errors.description = Some("Description is required".to_string());
        }

        if self.due_date.trim().is_empty() {
            errors.due_date = Some("Due date is required".to_string());
        } else {
            match self.parsed_due_date() {
                Err(_) => errors.due_date = Some("Due date must be a valid date (YYYY-MM-DD)".to_string()),
                Ok(date) if date < today => errors.due_date = Some("Due date cannot be before today".to_string()),
                Ok(_) => (),
            }
        }

        errors
    }

    /// Validate the form.
    ///
    /// Returns the normalized task when every field is valid. Otherwise the errors are kept in the form, and `None` is returned.
    pub fn submit(&mut self, today: NaiveDate) -> Option<TaskDraft> {
        self.errors = self.validate(today);
        if self.errors.is_empty() == false {
            log::debug!("Task form has {} invalid field(s)", self.errors.count());
            return None;
        }

        let due_date = self.parsed_due_date().ok()?;
        Some(TaskDraft {
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
            status: self.status.clone(),
            due_date,
        })
    }
}



#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 9, 15).unwrap()
    }

    #[test]
    fn every_error_is_reported() {
        let mut form = TaskForm::new();
        form.open_add(None);
        form.title = "ab".to_string();
        form.description = "   ".to_string();
        form.due_date = (today() - Duration::days(1)).format(DATE_FORMAT).to_string();

        assert_eq!(form.submit(today()), None);
        let errors = form.errors();
        assert_eq!(errors.count(), 3);
        assert!(errors.title.as_deref().unwrap().contains("at least 3"));
        assert_eq!(errors.description.as_deref(), Some("Description is required"));
        assert_eq!(errors.due_date.as_deref(), Some("Due date cannot be before today"));
    }

    #[test]
    fn missing_fields() {
        let errors = TaskForm::new().validate(today());
        assert_eq!(errors.title.as_deref(), Some("Title is required"));
        assert_eq!(errors.due_date.as_deref(), Some("Due date is required"));

        let mut form = TaskForm::new();
        form.due_date = "15/09/2025".to_string();
        assert!(form.validate(today()).due_date.unwrap().contains("valid date"));
        // Only a bare date is accepted from the form, unlike the server replies
        form.due_date = "2025-09-15Tjunk".to_string();
        assert!(form.validate(today()).due_date.unwrap().contains("valid date"));
        form.due_date = " 2025-09-15 ".to_string();
        assert_eq!(form.validate(today()).due_date, None);
    }

    #[test]
    fn valid_submission() {
        let mut form = TaskForm::new();
        form.open_add(Some(today()));
        assert_eq!(form.due_date, "2025-09-15");
        form.title = "  Buy milk ".to_string();
        form.description = "semi-skimmed".to_string();
        form.status = TaskStatus::InProgress;

        let draft = form.submit(today()).unwrap();
        assert_eq!(draft, TaskDraft {
            title: "Buy milk".to_string(),
            description: "semi-skimmed".to_string(),
            status: TaskStatus::InProgress,
            due_date: today(),
        });
        assert!(form.errors().is_empty());
    }

    #[test]
    fn switching_task_resets_the_form() {
        let task = Task::new(9, "Existing".into(), "desc".into(), TaskStatus::Done, Some(today()), 1);
        let mut form = TaskForm::new();
        form.open_add(None);
        form.submit(today());
        assert!(form.errors().is_empty() == false);

        form.open_edit(&task);
        assert_eq!(form.mode(), FormMode::Edit(9));
        assert!(form.errors().is_empty());
        assert_eq!(form.title, "Existing");
        assert_eq!(form.status, TaskStatus::Done);

        form.close();
        form.open_add(None);
        assert_eq!(form.mode(), FormMode::Add);
        assert_eq!(form.title, "");
        assert_eq!(form.status, TaskStatus::ToDo);
    }
}
