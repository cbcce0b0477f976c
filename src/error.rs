//! Errors, and their normalization into user-facing notices

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// The message shown when nothing more precise can be extracted from an error
pub const GENERIC_MESSAGE: &str = "An error occurred";

/// Everything that can go wrong when talking to the backend
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request could not be sent, or its response could not be read
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),
    /// The server replied with an error status. Its body is kept when it is valid JSON
    #[error("server replied with HTTP status {status}")]
    Status { status: u16, body: Option<Value> },
    #[error("unable to decode the server response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),
    #[error("no user is logged in")]
    NotAuthenticated,
    /// Anything else
    #[error("{0}")]
    Unexpected(String),
}

impl From<String> for ApiError {
    fn from(msg: String) -> Self {
        ApiError::Unexpected(msg)
    }
}
impl From<&str> for ApiError {
    fn from(msg: &str) -> Self {
        ApiError::Unexpected(msg.to_string())
    }
}


/// How severe a notice is
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
    Success,
}

impl Display for Severity {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Info => write!(f, "info"),
            Severity::Success => write!(f, "success"),
        }
    }
}

/// A message ready to be displayed to the user
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Notice {
    pub message: String,
    pub severity: Severity,
}

impl Notice {
    pub fn new<S: ToString>(message: S, severity: Severity) -> Self {
        Self { message: message.to_string(), severity }
    }
    pub fn error<S: ToString>(message: S) -> Self   { Self::new(message, Severity::Error) }
    pub fn success<S: ToString>(message: S) -> Self { Self::new(message, Severity::Success) }
}

impl From<&ApiError> for Notice {
    fn from(err: &ApiError) -> Self {
        normalize(err)
    }
}


/// Turn any error into a notice.
///
/// For error statuses, the JSON body of the reply is looked up for a nested `exception.message`,
/// then for a top-level `message`, and [`GENERIC_MESSAGE`] is used when neither exists.
pub fn normalize(err: &ApiError) -> Notice {
    let message = match err {
        ApiError::Status { body: Some(body), .. } => {
            message_from_body(body).unwrap_or_else(|| GENERIC_MESSAGE.to_string())
        },
        ApiError::Status { body: None, .. } => GENERIC_MESSAGE.to_string(),
        ApiError::Transport(_) | ApiError::Decode(_) => GENERIC_MESSAGE.to_string(),
        ApiError::Url(_) | ApiError::NotAuthenticated | ApiError::Unexpected(_) => err.to_string(),
    };
    Notice::error(message)
}

fn message_from_body(body: &Value) -> Option<String> {
    let nested = body.get("exception").and_then(|exc| exc.get("message"));
    match nested {
        Some(Value::String(msg)) if msg.is_empty() == false => return Some(msg.clone()),
        // Field validation errors come as a map of field -> message
        Some(Value::Object(fields)) if fields.is_empty() == false => {
            let msgs: Vec<&str> = fields.values().filter_map(|v| v.as_str()).collect();
            if msgs.is_empty() == false {
                return Some(msgs.join("; "));
            }
        },
        _ => (),
    }

    match body.get("message") {
        Some(Value::String(msg)) if msg.is_empty() == false => Some(msg.clone()),
        _ => None,
    }
}
