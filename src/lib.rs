//! This crate provides a client for a personal task manager.
//!
//! All persistence and business rules live in a backend service reached over a JSON REST API. This crate is the client side of it:
//! it provides an HTTP client in the [`client`] module, which implements the task and user services described in the [`traits`] module.
//!
//! On top of these services, the crate holds every piece of client-side logic: \
//! the [`calendar`] projector that buckets tasks into a month grid, the [`dashboard`] and [`filter`] views that derive subsets of the task list,
//! the [`form`] that validates task edits, the [`quick_change`] helper that updates a task status inline, \
//! and the [`session`] context that remembers the logged-in user across runs.
//!
//! The [`pages`] module wires all of them together, the way the screens of a task manager application would.

pub mod traits;
pub mod config;

mod task;
pub use task::{Task, TaskId, TaskStatus, TaskDraft, TaskPayload};
pub use task::status_color;
mod user;
pub use user::{User, UserId, Credentials, Registration, ProfileUpdate};

pub mod error;
pub use error::{ApiError, Notice, Severity};

pub mod client;
pub use client::Client;
pub mod mock;
pub mod mock_behaviour;

pub mod storage;
pub mod session;
pub use session::Session;
pub mod notification;
pub use notification::Notifications;

pub mod calendar;
pub mod dashboard;
pub mod filter;
pub mod form;
pub mod quick_change;
pub mod router;
pub mod pages;

pub mod utils;
