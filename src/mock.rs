//! An in-memory stand-in for the backend server.
//!
//! It behaves like the real REST API (account checks, per-user task lists, error bodies),
//! and its failures can be scripted with a [`MockBehaviour`].

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use serde_json::json;
use tokio::sync::Notify;

use crate::error::ApiError;
use crate::mock_behaviour::{MockBehaviour, Operation};
use crate::traits::{TaskSource, UserSource};
use crate::task::{Task, TaskId, TaskPayload};
use crate::user::{User, UserId, Credentials, Registration, ProfileUpdate};


#[derive(Default, Debug)]
struct MockState {
    users: BTreeMap<UserId, (User, String)>,
    tasks: BTreeMap<TaskId, Task>,
    last_id: i64,
    behaviour: MockBehaviour,
    held_updates: HashMap<TaskId, Arc<Notify>>,
    request_count: usize,
}

impl MockState {
    fn next_id(&mut self) -> i64 {
        self.last_id += 1;
        self.last_id
    }

    fn email_in_use(&self, email: &str, except: Option<UserId>) -> bool {
        self.users.values().any(|(u, _)| u.email == email && Some(u.id) != except)
    }
}

/// Builds the error the backend replies with for a failed business rule
fn backend_error(message: &str) -> ApiError {
    ApiError::Status {
        status: 400,
        body: Some(json!({
            "status": 400,
            "exception": { "message": message },
        })),
    }
}


/// A mocked server, that stores everything in memory
#[derive(Clone, Default, Debug)]
pub struct MockServer {
    state: Arc<Mutex<MockState>>,
}

impl MockServer {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        // A panicking test thread must not hide the server state from the other ones
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Change how the server will behave for the next requests
    pub fn set_behaviour(&self, behaviour: MockBehaviour) {
        self.state().behaviour = behaviour;
    }

    /// Create an account directly on the server
    pub fn add_user(&self, full_name: &str, email: &str, password: &str) -> User {
        let mut state = self.state();
        let id = state.next_id();
        let user = User { id, full_name: full_name.to_string(), email: email.to_string() };
        state.users.insert(id, (user.clone(), password.to_string()));
        user
    }

    /// Store a task directly on the server
    pub fn add_task(&self, payload: TaskPayload) -> Task {
        let mut state = self.state();
        let id = state.next_id();
        let task = Task::new(id, payload.title, payload.description, payload.status, payload.due_date, payload.user_id);
        state.tasks.insert(id, task.clone());
        task
    }

    /// Returns the task as currently stored by the server
    pub fn task(&self, id: TaskId) -> Option<Task> {
        self.state().tasks.get(&id).cloned()
    }

    /// How many requests this server has received so far
    pub fn request_count(&self) -> usize {
        self.state().request_count
    }

    /// Make every update of this task wait until the returned handle is notified
    pub fn hold_updates(&self, id: TaskId) -> Arc<Notify> {
        let notify = Arc::new(Notify::new());
        self.state().held_updates.insert(id, notify.clone());
        notify
    }
}

#[async_trait]
impl TaskSource for MockServer {
    async fn get_user_tasks(&self, user_id: UserId) -> Result<Vec<Task>, ApiError> {
        let mut state = self.state();
        state.request_count += 1;
        state.behaviour.check(Operation::GetUserTasks)?;
        if state.users.contains_key(&user_id) == false {
            return Err(backend_error("User not found"));
        }
        Ok(state.tasks.values()
            .filter(|t| t.user_id() == user_id)
            .cloned()
            .collect())
    }

    async fn create_task(&self, task: &TaskPayload) -> Result<Task, ApiError> {
        {
            let mut state = self.state();
            state.request_count += 1;
            state.behaviour.check(Operation::CreateTask)?;
            if state.users.contains_key(&task.user_id) == false {
                return Err(backend_error("User not found"));
            }
        }
        Ok(self.add_task(task.clone()))
    }

    async fn update_task(&self, id: TaskId, task: &TaskPayload) -> Result<Task, ApiError> {
        let held = {
            let mut state = self.state();
            state.request_count += 1;
            state.held_updates.remove(&id)
        };
        if let Some(notify) = held {
            log::debug!("Mock server: holding the update of task {}", id);
            notify.notified().await;
        }

        let mut state = self.state();
        state.behaviour.check(Operation::UpdateTask)?;
        if state.tasks.contains_key(&id) == false {
            return Err(backend_error("Task not found"));
        }
        let updated = Task::new(id, task.title.clone(), task.description.clone(), task.status.clone(), task.due_date, task.user_id);
        state.tasks.insert(id, updated.clone());
        Ok(updated)
    }

    async fn delete_task(&self, id: TaskId) -> Result<(), ApiError> {
        let mut state = self.state();
        state.request_count += 1;
        state.behaviour.check(Operation::DeleteTask)?;
        match state.tasks.remove(&id) {
            Some(_) => Ok(()),
            None => Err(backend_error("Task not found")),
        }
    }
}

#[async_trait]
impl UserSource for MockServer {
    async fn login(&self, credentials: &Credentials) -> Result<User, ApiError> {
        let mut state = self.state();
        state.request_count += 1;
        state.behaviour.check(Operation::Login)?;
        let (user, password) = state.users.values()
            .find(|(u, _)| u.email == credentials.email)
            .ok_or_else(|| backend_error("Email not found"))?;
        if password != &credentials.password {
            return Err(backend_error("Wrong password"));
        }
        Ok(user.clone())
    }

    async fn register(&self, registration: &Registration) -> Result<User, ApiError> {
        {
            let mut state = self.state();
            state.request_count += 1;
            state.behaviour.check(Operation::Register)?;
            if state.email_in_use(&registration.email, None) {
                return Err(backend_error("This email address is already in use"));
            }
        }
        Ok(self.add_user(&registration.full_name, &registration.email, &registration.password))
    }

    async fn update_profile(&self, id: UserId, update: &ProfileUpdate) -> Result<User, ApiError> {
        let mut state = self.state();
        state.request_count += 1;
        state.behaviour.check(Operation::UpdateProfile)?;
        if state.email_in_use(&update.email, Some(id)) {
            return Err(backend_error("This email address is already in use"));
        }
        let (user, password) = state.users.get_mut(&id)
            .ok_or_else(|| backend_error("User not found"))?;

        if let Some(new_password) = update.new_password.as_ref().filter(|p| p.is_empty() == false) {
            match update.current_password.as_deref() {
                None | Some("") => return Err(backend_error("Current password is required")),
                Some(current) if current != password.as_str() => return Err(backend_error("Wrong password")),
                Some(_) => *password = new_password.clone(),
            }
        }
        user.full_name = update.full_name.clone();
        user.email = update.email.clone();
        Ok(user.clone())
    }
}
