//! Inline status changes, without opening the task form.
//!
//! At most one status change per task can be in flight. Changes of different tasks may overlap.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::error::ApiError;
use crate::task::{Task, TaskId, TaskStatus};
use crate::traits::TaskSource;

/// The outcome of a quick change
#[derive(Clone, Debug, PartialEq)]
pub enum QuickChange {
    /// The server accepted the new status
    Updated(Task),
    /// A change of this task was already in flight: nothing was sent
    Skipped,
    /// The task is not in the loaded list: nothing was sent
    NotLoaded,
    /// The new status is not one a user can pick: nothing was sent
    Unselectable,
}


/// Marks a task as being updated, until it is dropped
pub struct UpdateGuard {
    id: TaskId,
    updating: Arc<Mutex<HashSet<TaskId>>>,
}

impl Drop for UpdateGuard {
    fn drop(&mut self) {
        let mut updating = self.updating.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        updating.remove(&self.id);
    }
}


/// Tracks which tasks have a status change in flight.
///
/// Cloning it gives another handle on the same set, so that every view disables the same controls.
#[derive(Clone, Debug, Default)]
pub struct StatusChanger {
    updating: Arc<Mutex<HashSet<TaskId>>>,
}

impl StatusChanger {
    pub fn new() -> Self {
        Self::default()
    }

    fn updating(&self) -> MutexGuard<'_, HashSet<TaskId>> {
        self.updating.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Whether the status control of this task should be disabled
    pub fn is_updating(&self, id: TaskId) -> bool {
        self.updating().contains(&id)
    }

    /// Mark a task as being updated. Returns `None` if it already is
    pub fn begin(&self, id: TaskId) -> Option<UpdateGuard> {
        if self.updating().insert(id) == false {
            return None;
        }
        Some(UpdateGuard { id, updating: self.updating.clone() })
    }

    /// Send the full record of a loaded task, with only its status changed.
    ///
    /// The caller is expected to refresh its task list afterwards; the local list is never patched.
    pub async fn change<S>(&self, source: &S, tasks: &[Task], id: TaskId, status: TaskStatus) -> Result<QuickChange, ApiError>
    where
        S: TaskSource + Sync + ?Sized,
    {
        if TaskStatus::SELECTABLE.contains(&status) == false {
            log::warn!("Refusing to set task {} to the unknown status {}", id, status);
            return Ok(QuickChange::Unselectable);
        }

        let _guard = match self.begin(id) {
            None => {
                log::debug!("A status change of task {} is already in flight", id);
                return Ok(QuickChange::Skipped);
            },
            Some(guard) => guard,
        };

        let task = match tasks.iter().find(|t| t.id() == id) {
            None => {
                log::warn!("Task {} is not loaded, not changing its status", id);
                return Ok(QuickChange::NotLoaded);
            },
            Some(task) => task,
        };

        log::debug!("Changing the status of task {} from {} to {}", id, task.status(), status);
        let updated = source.update_task(id, &task.with_status(status)).await?;
        Ok(QuickChange::Updated(updated))
    }
}
