//! Support for library configuration options

use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use once_cell::sync::Lazy;

/// The base URL of the backend REST API. Every service path is appended to it.
/// Feel free to override it when initing this library, or use [`Settings::from_env`].
pub static API_BASE_URL: Lazy<Arc<Mutex<String>>> = Lazy::new(|| Arc::new(Mutex::new("http://localhost:8080/api".to_string())));

/// The folder where the local key/value store (and hence the session) is kept.
/// Feel free to override it when initing this library.
pub static DATA_FOLDER: Lazy<Arc<Mutex<PathBuf>>> = Lazy::new(|| Arc::new(Mutex::new(PathBuf::from("taskpad_data"))));

/// Environment variable that overrides [`API_BASE_URL`]
pub const API_URL_ENV: &str = "TASKPAD_API_URL";
/// Environment variable that overrides [`DATA_FOLDER`]
pub const DATA_DIR_ENV: &str = "TASKPAD_DATA_DIR";

/// The storage key the logged-in user is stored under
pub const SESSION_KEY: &str = "user";

/// How many tasks the "upcoming tasks" dashboard shows at most
pub const UPCOMING_LIMIT: usize = 5;
/// A calendar cell lists at most this many tasks, and shows a count above it
pub const CELL_LIST_LIMIT: usize = 2;
/// How many cards the task list shows before "show all" is toggled
pub const LIST_PAGE_SIZE: usize = 6;
/// How long a notification stays visible
pub const NOTIFICATION_TTL: Duration = Duration::from_secs(6);


/// A snapshot of the current settings
#[derive(Clone, Debug, PartialEq)]
pub struct Settings {
    pub api_base_url: String,
    pub data_folder: PathBuf,
}

impl Settings {
    /// Read the settings currently stored in the process-wide statics
    pub fn current() -> Self {
        let api_base_url = API_BASE_URL.lock().map(|s| s.clone()).unwrap_or_default();
        let data_folder = DATA_FOLDER.lock().map(|p| p.clone()).unwrap_or_default();
        Self { api_base_url, data_folder }
    }

    /// Override the process-wide statics with the environment variables that are set, and return the resulting settings
    pub fn from_env() -> Self {
        if let Ok(url) = std::env::var(API_URL_ENV) {
            log::debug!("Using API base URL {} from {}", url, API_URL_ENV);
            if let Ok(mut current) = API_BASE_URL.lock() {
                *current = url;
            }
        }
        if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
            log::debug!("Using data folder {} from {}", dir, DATA_DIR_ENV);
            if let Ok(mut current) = DATA_FOLDER.lock() {
                *current = PathBuf::from(dir);
            }
        }
        Self::current()
    }
}
