//! To-do tasks, as exchanged with the backend

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use chrono::NaiveDate;
use csscolorparser::Color;

use crate::user::UserId;

/// The backend identifier of a task
pub type TaskId = i64;

/// The format of a due date on the wire (an ISO calendar date, without time)
pub const DATE_FORMAT: &str = "%Y-%m-%d";


/// The status of a task.
///
/// The backend only knows about `TO_DO`, `IN_PROGRESS` and `DONE`, but any other value it may send is kept verbatim,
/// so that sending the full record back in an update does not alter it.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TaskStatus {
    ToDo,
    InProgress,
    Done,
    Other(String),
}

impl TaskStatus {
    /// The statuses a user can pick from
    pub const SELECTABLE: [TaskStatus; 3] = [TaskStatus::ToDo, TaskStatus::InProgress, TaskStatus::Done];

    /// The wire representation of this status
    pub fn as_str(&self) -> &str {
        match self {
            TaskStatus::ToDo => "TO_DO",
            TaskStatus::InProgress => "IN_PROGRESS",
            TaskStatus::Done => "DONE",
            TaskStatus::Other(raw) => raw,
        }
    }

    /// A human-readable label
    pub fn label(&self) -> &str {
        match self {
            TaskStatus::ToDo => "To do",
            TaskStatus::InProgress => "In progress",
            TaskStatus::Done => "Done",
            TaskStatus::Other(raw) => raw,
        }
    }
}

impl Default for TaskStatus {
    fn default() -> Self {
        TaskStatus::ToDo
    }
}

impl From<&str> for TaskStatus {
    fn from(raw: &str) -> Self {
        match raw {
            "TO_DO" => TaskStatus::ToDo,
            "IN_PROGRESS" => TaskStatus::InProgress,
            "DONE" => TaskStatus::Done,
            other => TaskStatus::Other(other.to_string()),
        }
    }
}

impl Display for TaskStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        write!(f, "{}", self.as_str())
    }
}

/// Used to support serde
impl Serialize for TaskStatus {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}
/// Used to support serde
impl<'de> Deserialize<'de> for TaskStatus {
    fn deserialize<D>(deserializer: D) -> Result<TaskStatus, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(TaskStatus::from(raw.as_str()))
    }
}

/// The color a status is displayed with.
///
/// Every view (calendar cells, dashboard, task cards) uses this same mapping.
pub fn status_color(status: &TaskStatus) -> Color {
    match status {
        TaskStatus::ToDo       => Color::from_rgb_u8(0xef, 0x44, 0x44),
        TaskStatus::InProgress => Color::from_rgb_u8(0xf5, 0x9e, 0x0b),
        TaskStatus::Done       => Color::from_rgb_u8(0x10, 0xb9, 0x81),
        TaskStatus::Other(_)   => Color::from_rgb_u8(0x6b, 0x72, 0x80),
    }
}


/// Parse a due date as sent by the backend.
///
/// Only the calendar date matters: a full date-time is accepted and its time part is ignored.
pub fn parse_date(raw: &str) -> Result<NaiveDate, chrono::ParseError> {
    let raw = raw.trim();
    let date_part = raw.split('T').next().unwrap_or(raw);
    NaiveDate::parse_from_str(date_part, DATE_FORMAT)
}

mod due_date_format {
    use super::*;

    pub fn serialize<S>(date: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match date {
            Some(date) => serializer.serialize_str(&date.format(DATE_FORMAT).to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        match raw {
            None => Ok(None),
            Some(s) if s.trim().is_empty() => Ok(None),
            Some(s) => parse_date(&s)
                .map(Some)
                .map_err(|err| serde::de::Error::custom(format!("invalid due date {:?}: {}", s, err))),
        }
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.unwrap_or_default())
}


/// A to-do task
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    id: TaskId,
    title: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    description: String,
    status: TaskStatus,
    /// Only the date part is meaningful. Some tasks may have none.
    #[serde(default, with = "due_date_format")]
    due_date: Option<NaiveDate>,
    user_id: UserId,
}

impl Task {
    pub fn new(id: TaskId, title: String, description: String, status: TaskStatus, due_date: Option<NaiveDate>, user_id: UserId) -> Self {
        Self { id, title, description, status, due_date, user_id }
    }

    pub fn id(&self) -> TaskId                 { self.id               }
    pub fn title(&self) -> &str                { &self.title           }
    pub fn description(&self) -> &str          { &self.description     }
    pub fn status(&self) -> &TaskStatus        { &self.status          }
    pub fn due_date(&self) -> Option<NaiveDate> { self.due_date        }
    pub fn user_id(&self) -> UserId            { self.user_id          }

    /// Whether this task is due on this exact calendar date
    pub fn is_due_on(&self, date: NaiveDate) -> bool {
        self.due_date == Some(date)
    }

    /// The full record of this task, ready to be sent back to the server
    pub fn to_payload(&self) -> TaskPayload {
        TaskPayload {
            title: self.title.clone(),
            description: self.description.clone(),
            status: self.status.clone(),
            due_date: self.due_date,
            user_id: self.user_id,
        }
    }

    /// The full record of this task, with only its status changed
    pub fn with_status(&self, status: TaskStatus) -> TaskPayload {
        TaskPayload { status, ..self.to_payload() }
    }
}


/// The content of a task form, before it is assigned to a user
#[derive(Clone, Debug, PartialEq)]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub due_date: NaiveDate,
}

impl TaskDraft {
    /// Attach the owner of the task, to build the body of a create or update request
    pub fn for_user(self, user_id: UserId) -> TaskPayload {
        TaskPayload {
            title: self.title,
            description: self.description,
            status: self.status,
            due_date: Some(self.due_date),
            user_id,
        }
    }
}

/// The body of the `save` and `update` task requests
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskPayload {
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    #[serde(default, with = "due_date_format")]
    pub due_date: Option<NaiveDate>,
    pub user_id: UserId,
}
