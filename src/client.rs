//! This module provides a client to connect to the task manager REST API

use async_trait::async_trait;
use reqwest::Method;
use reqwest::header::CONTENT_TYPE;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use url::Url;

use crate::config::Settings;
use crate::error::ApiError;
use crate::traits::{TaskSource, UserSource};
use crate::task::{Task, TaskId, TaskPayload};
use crate::user::{User, UserId, Credentials, Registration, ProfileUpdate};


/// A source that fetches its data from the backend server.
///
/// Every request is sent relative to a fixed base URL, with a JSON content type.
#[derive(Clone, Debug)]
pub struct Client {
    base_url: Url,
    http: reqwest::Client,
}

impl Client {
    /// Create a client. This does not start a connection
    pub fn new<S: AsRef<str>>(base_url: S) -> Result<Self, ApiError> {
        let mut base_url = Url::parse(base_url.as_ref())?;
        // Make sure relative paths are appended to the base path instead of replacing its last segment
        if base_url.path().ends_with('/') == false {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(Self{
            base_url,
            http: reqwest::Client::new(),
        })
    }

    /// Create a client for the configured API base URL
    pub fn from_settings(settings: &Settings) -> Result<Self, ApiError> {
        Self::new(&settings.api_base_url)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The full URL of an API path such as `/tasks/save`
    pub fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    async fn request<B: Serialize + ?Sized>(&self, method: Method, path: &str, body: Option<&B>) -> Result<reqwest::Response, ApiError> {
        let url = self.endpoint(path)?;
        log::debug!("Sending {} {}", method, url);

        let mut builder = self.http
            .request(method, url)
            .header(CONTENT_TYPE, "application/json");
        if let Some(body) = body {
            builder = builder.body(serde_json::to_vec(body)?);
        }
        let response = builder.send().await?;

        let status = response.status();
        if status.is_success() == false {
            let text = response.text().await.unwrap_or_default();
            log::debug!("Request to {} failed with status {}: {}", path, status, text);
            return Err(status_error(status.as_u16(), &text));
        }
        Ok(response)
    }

    async fn fetch<B, T>(&self, method: Method, path: &str, body: Option<&B>) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.request(method, path, body).await?;
        let text = response.text().await?;
        Ok(serde_json::from_str(&text)?)
    }
}

/// The error of a reply with a non-success status. Its body is kept when it is valid JSON
fn status_error(status: u16, body: &str) -> ApiError {
    ApiError::Status {
        status,
        body: serde_json::from_str(body).ok(),
    }
}

/// Read a task list reply. Anything but a JSON array is read as an empty list
fn tasks_from_reply(reply: Value) -> Result<Vec<Task>, ApiError> {
    match reply {
        Value::Array(_) => Ok(serde_json::from_value(reply)?),
        other => {
            log::warn!("Expected a list of tasks, got {}. Using an empty list", other);
            Ok(Vec::new())
        },
    }
}

#[async_trait]
impl TaskSource for Client {
    async fn get_user_tasks(&self, user_id: UserId) -> Result<Vec<Task>, ApiError> {
        let reply: Value = self.fetch::<(), _>(Method::GET, &format!("tasks/user/{}", user_id), None).await?;
        tasks_from_reply(reply)
    }

    async fn create_task(&self, task: &TaskPayload) -> Result<Task, ApiError> {
        self.fetch(Method::POST, "tasks/save", Some(task)).await
    }

    async fn update_task(&self, id: TaskId, task: &TaskPayload) -> Result<Task, ApiError> {
        self.fetch(Method::PUT, &format!("tasks/update/{}", id), Some(task)).await
    }

    async fn delete_task(&self, id: TaskId) -> Result<(), ApiError> {
        self.request::<()>(Method::DELETE, &format!("tasks/delete/{}", id), None).await?;
        Ok(())
    }
}

#[async_trait]
impl UserSource for Client {
    async fn login(&self, credentials: &Credentials) -> Result<User, ApiError> {
        self.fetch(Method::POST, "users/login", Some(credentials)).await
    }

    async fn register(&self, registration: &Registration) -> Result<User, ApiError> {
        self.fetch(Method::POST, "users/save", Some(registration)).await
    }

    async fn update_profile(&self, id: UserId, update: &ProfileUpdate) -> Result<User, ApiError> {
        self.fetch(Method::PUT, &format!("users/profile/{}", id), Some(update)).await
    }
}
