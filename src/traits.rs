//! The services the backend exposes.
//!
//! They are implemented by the HTTP [`Client`](crate::client::Client), and by the in-memory [`MockServer`](crate::mock::MockServer) used in tests.

use async_trait::async_trait;

use crate::error::ApiError;
use crate::task::{Task, TaskId, TaskPayload};
use crate::user::{User, UserId, Credentials, Registration, ProfileUpdate};

#[async_trait]
pub trait TaskSource {
    /// Returns every task that belongs to a user
    async fn get_user_tasks(&self, user_id: UserId) -> Result<Vec<Task>, ApiError>;
    /// Create a task, and returns it as stored by the server
    async fn create_task(&self, task: &TaskPayload) -> Result<Task, ApiError>;
    /// Replace every field of an existing task
    async fn update_task(&self, id: TaskId, task: &TaskPayload) -> Result<Task, ApiError>;
    async fn delete_task(&self, id: TaskId) -> Result<(), ApiError>;
}

#[async_trait]
pub trait UserSource {
    async fn login(&self, credentials: &Credentials) -> Result<User, ApiError>;
    /// Create an account. This does not log the user in
    async fn register(&self, registration: &Registration) -> Result<User, ApiError>;
    async fn update_profile(&self, id: UserId, update: &ProfileUpdate) -> Result<User, ApiError>;
}
