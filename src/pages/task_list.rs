//! The main screen: the task cards, the calendar, the upcoming tasks and the task form.
//!
//! The loaded task list is the single source of truth of this page. Every view is derived from it,
//! and every mutation is followed by a full reload of it.

use chrono::NaiveDate;

use crate::calendar::{self, CalendarState, MonthView};
use crate::dashboard::{self, StatusCounts, Upcoming};
use crate::error::ApiError;
use crate::filter::{ListFilter, StatusFilter};
use crate::form::{FormMode, TaskForm};
use crate::quick_change::{QuickChange, StatusChanger};
use crate::router::Route;
use crate::task::{Task, TaskDraft, TaskId, TaskStatus};
use crate::traits::TaskSource;
use crate::user::User;

use super::Context;

pub struct TaskListPage<S> {
    ctx: Context<S>,
    user: Option<User>,
    tasks: Vec<Task>,
    loading: bool,
    filter: ListFilter,
    calendar: CalendarState,
    form: TaskForm,
    status_changer: StatusChanger,
    open_status_menu: Option<TaskId>,
}

impl<S> TaskListPage<S>
where
    S: TaskSource + Send + Sync,
{
    /// Create the page. The calendar starts on the month of `today`
    pub fn new(ctx: Context<S>, today: NaiveDate) -> Self {
        Self {
            ctx,
            user: None,
            tasks: Vec::new(),
            loading: false,
            filter: ListFilter::default(),
            calendar: CalendarState::new(today),
            form: TaskForm::new(),
            status_changer: StatusChanger::new(),
            open_status_menu: None,
        }
    }

    pub fn user(&self) -> Option<&User>             { self.user.as_ref()     }
    pub fn tasks(&self) -> &[Task]                  { &self.tasks            }
    pub fn is_loading(&self) -> bool                { self.loading           }
    pub fn filter(&self) -> &ListFilter             { &self.filter           }
    pub fn calendar(&self) -> &CalendarState        { &self.calendar         }
    pub fn form(&self) -> &TaskForm                 { &self.form             }
    pub fn form_mut(&mut self) -> &mut TaskForm     { &mut self.form         }
    pub fn status_changer(&self) -> &StatusChanger  { &self.status_changer   }
    pub fn open_status_menu(&self) -> Option<TaskId> { self.open_status_menu }

    /// Load the logged-in user and their tasks.
    ///
    /// Returns the route to redirect to when nobody is logged in
    pub async fn load(&mut self) -> Option<Route> {
        match self.ctx.session.current_user() {
            None => {
                log::debug!("No session, the task list cannot be displayed");
                Some(Route::Login)
            },
            Some(user) => {
                self.user = Some(user);
                self.refresh().await;
                None
            },
        }
    }

    /// Reload the whole task list from the server.
    ///
    /// On failure the previously loaded list is kept, and the error is notified
    pub async fn refresh(&mut self) {
        let user_id = match self.ctx.session.user_id() {
            Err(_) => return,
            Ok(id) => id,
        };

        self.loading = true;
        let result = self.ctx.source.get_user_tasks(user_id).await;
        self.loading = false;

        match result {
            Ok(tasks) => {
                log::debug!("Loaded {} tasks of user {}", tasks.len(), user_id);
                self.tasks = tasks;
            },
            Err(err) => {
                self.ctx.notifications.report(&err);
            },
        }
    }


    // Derived views

    /// Change the search term and the status filter
    pub fn set_filter(&mut self, search: &str, status: StatusFilter) {
        self.filter = ListFilter { show_all: self.filter.show_all, ..ListFilter::new(search, status) };
    }

    /// Toggle between the first page of cards and every card
    pub fn toggle_show_all(&mut self) {
        self.filter.show_all = !self.filter.show_all;
    }

    /// Every task that passes the filter
    pub fn filtered(&self) -> Vec<&Task> {
        self.filter.apply(&self.tasks)
    }

    /// The cards that are actually displayed
    pub fn visible_cards(&self) -> Vec<&Task> {
        self.filter.visible(&self.tasks)
    }

    pub fn has_more_cards(&self) -> bool {
        self.filter.has_more(&self.tasks)
    }

    pub fn status_counts(&self) -> StatusCounts {
        dashboard::status_counts(&self.tasks)
    }

    pub fn upcoming(&self, today: NaiveDate) -> Upcoming<'_> {
        dashboard::upcoming(self.filter.for_overviews(&self.tasks), today)
    }

    pub fn month_view(&self, today: NaiveDate) -> MonthView<'_> {
        calendar::project(self.calendar.anchor(), self.filter.for_overviews(&self.tasks), today)
    }

    /// The tasks of the selected calendar day, if a day is selected
    pub fn day_detail(&self) -> Option<Vec<&Task>> {
        let day = self.calendar.selected_day()?;
        Some(calendar::day_detail(self.filter.for_overviews(&self.tasks), day))
    }


    // Calendar navigation

    pub fn next_month(&mut self) {
        self.calendar.next_month();
    }

    pub fn previous_month(&mut self) {
        self.calendar.previous_month();
    }

    pub fn select_day(&mut self, date: NaiveDate) {
        self.calendar.select_day(date);
    }

    pub fn close_day_detail(&mut self) {
        self.calendar.close_detail();
    }


    // Task form

    /// Open a blank form. Its due date is the selected calendar day, if any
    pub fn open_add_form(&mut self) {
        self.calendar.close_detail();
        self.form.open_add(self.calendar.selected_day());
    }

    /// Open the form on a loaded task. Returns `false` if it is not loaded
    pub fn open_edit_form(&mut self, id: TaskId) -> bool {
        match self.tasks.iter().find(|t| t.id() == id) {
            None => {
                log::warn!("Task {} is not loaded, it cannot be edited", id);
                false
            },
            Some(task) => {
                if let Some(due) = task.due_date() {
                    self.calendar.select_day(due);
                    self.calendar.close_detail();
                }
                self.form.open_edit(task);
                true
            },
        }
    }

    pub fn close_form(&mut self) {
        self.form.close();
    }

    /// Validate the form, then create or update the task.
    ///
    /// Nothing is sent when the form is invalid: its errors are kept in the form. Returns whether the task was saved
    pub async fn submit_form(&mut self, today: NaiveDate) -> bool {
        let draft = match self.form.submit(today) {
            None => return false,
            Some(draft) => draft,
        };

        let result = match self.form.mode() {
            FormMode::Add => self.create(draft).await,
            FormMode::Edit(id) => self.update(id, draft).await,
        };

        match result {
            Err(err) => {
                self.ctx.notifications.report(&err);
                false
            },
            Ok(message) => {
                self.ctx.notifications.success(message);
                self.form.close();
                self.refresh().await;
                true
            },
        }
    }

    async fn create(&self, draft: TaskDraft) -> Result<&'static str, ApiError> {
        let user_id = self.ctx.session.user_id()?;
        let created = self.ctx.source.create_task(&draft.for_user(user_id)).await?;
        log::info!("Created task {}", created.id());
        Ok("Task added successfully")
    }

    async fn update(&self, id: TaskId, draft: TaskDraft) -> Result<&'static str, ApiError> {
        // The task keeps its owner
        let user_id = match self.tasks.iter().find(|t| t.id() == id) {
            Some(task) => task.user_id(),
            None => self.ctx.session.user_id()?,
        };
        self.ctx.source.update_task(id, &draft.for_user(user_id)).await?;
        log::info!("Updated task {}", id);
        Ok("Task updated successfully")
    }


    // Other mutations

    /// Delete a task. Returns whether it was deleted
    pub async fn delete_task(&mut self, id: TaskId) -> bool {
        match self.ctx.source.delete_task(id).await {
            Err(err) => {
                self.ctx.notifications.report(&err);
                false
            },
            Ok(()) => {
                log::info!("Deleted task {}", id);
                self.ctx.notifications.success("Task deleted successfully");
                self.refresh().await;
                true
            },
        }
    }

    pub fn toggle_status_menu(&mut self, id: TaskId) {
        self.open_status_menu = match self.open_status_menu {
            Some(open) if open == id => None,
            _ => Some(id),
        };
    }

    pub fn close_status_menu(&mut self) {
        self.open_status_menu = None;
    }

    /// Send an inline status change, and notify its outcome.
    ///
    /// This only borrows the page, so that changes of different tasks can run side by side.
    /// The loaded list is left untouched: on failure the previous status is still displayed
    pub async fn send_status_change(&self, id: TaskId, status: TaskStatus) -> Result<QuickChange, ApiError> {
        let result = self.status_changer
            .change(self.ctx.source.as_ref(), &self.tasks, id, status)
            .await;

        match &result {
            Ok(QuickChange::Updated(_)) => {
                self.ctx.notifications.success("Task status updated");
            },
            Ok(QuickChange::Skipped) | Ok(QuickChange::NotLoaded) => (),
            Ok(QuickChange::Unselectable) => {
                self.ctx.notifications.error("Please select a valid status");
            },
            Err(err) => {
                self.ctx.notifications.report(err);
            },
        }
        result
    }

    /// Change the status of a task inline, then reload the list once the server accepted it
    pub async fn change_status(&mut self, id: TaskId, status: TaskStatus) -> Result<QuickChange, ApiError> {
        let result = self.send_status_change(id, status).await;
        if let Ok(QuickChange::Updated(_)) = result {
            self.refresh().await;
            if self.open_status_menu == Some(id) {
                self.open_status_menu = None;
            }
        }
        result
    }

    /// Forget the logged-in user
    pub fn logout(&mut self) -> Route {
        if let Err(err) = self.ctx.session.logout() {
            self.ctx.notifications.report(&err);
        }
        self.user = None;
        self.tasks.clear();
        Route::Login
    }
}
