//! The notification channel: short-lived messages displayed as toasts

use std::collections::VecDeque;
use std::fmt::{Display, Error, Formatter};
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use uuid::Uuid;

use crate::config::NOTIFICATION_TTL;
use crate::error::{normalize, ApiError, Notice, Severity};

static GLOBAL: Lazy<Notifications> = Lazy::new(Notifications::new);


/// A notice waiting to be displayed
#[derive(Clone, Debug, PartialEq)]
pub struct Notification {
    pub id: Uuid,
    pub notice: Notice,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    /// Whether this notification should have disappeared at `now`
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        let ttl = chrono::Duration::from_std(NOTIFICATION_TTL).unwrap_or_else(|_| chrono::Duration::seconds(6));
        now - self.created_at >= ttl
    }
}

impl Display for Notification {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        write!(f, "[{}] {}", self.notice.severity, self.notice.message)
    }
}


/// See [`Notifications::subscribe`]
pub type NotificationReceiver = tokio::sync::watch::Receiver<Option<Notification>>;

/// A queue of notifications, shared by every view.
///
/// Cloning it gives another handle to the same queue.
#[derive(Clone)]
pub struct Notifications {
    queue: Arc<Mutex<VecDeque<Notification>>>,
    latest: Arc<tokio::sync::watch::Sender<Option<Notification>>>,
}

impl Default for Notifications {
    fn default() -> Self {
        Self::new()
    }
}

impl Notifications {
    /// Create a new, independent queue
    pub fn new() -> Self {
        let (sender, _) = tokio::sync::watch::channel(None);
        Self {
            queue: Arc::new(Mutex::new(VecDeque::new())),
            latest: Arc::new(sender),
        }
    }

    /// The process-wide queue
    pub fn global() -> Self {
        GLOBAL.clone()
    }

    fn queue(&self) -> MutexGuard<'_, VecDeque<Notification>> {
        self.queue.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Queue a notice. Returns the id of the created notification
    pub fn push(&self, notice: Notice) -> Uuid {
        if notice.severity == Severity::Error {
            log::error!("{}", notice.message);
        } else {
            log::info!("{}", notice.message);
        }

        let notification = Notification {
            id: Uuid::new_v4(),
            notice,
            created_at: Utc::now(),
        };
        let id = notification.id;
        self.queue().push_back(notification.clone());
        let _ = self.latest.send(Some(notification));
        id
    }

    pub fn success<S: ToString>(&self, message: S) -> Uuid {
        self.push(Notice::success(message))
    }

    pub fn error<S: ToString>(&self, message: S) -> Uuid {
        self.push(Notice::error(message))
    }

    /// Normalize an error and queue it
    pub fn report(&self, err: &ApiError) -> Uuid {
        self.push(normalize(err))
    }

    /// Remove a notification before it expires
    pub fn dismiss(&self, id: Uuid) -> bool {
        let mut queue = self.queue();
        let len_before = queue.len();
        queue.retain(|n| n.id != id);
        queue.len() != len_before
    }

    /// Returns the notifications that are still visible at `now`, and forgets the expired ones
    pub fn active(&self, now: DateTime<Utc>) -> Vec<Notification> {
        let mut queue = self.queue();
        queue.retain(|n| n.is_expired(now) == false);
        queue.iter().cloned().collect()
    }

    /// Take every pending notification out of the queue
    pub fn drain(&self) -> Vec<Notification> {
        self.queue().drain(..).collect()
    }

    /// Get the latest notification whenever one is pushed
    pub fn subscribe(&self) -> NotificationReceiver {
        self.latest.subscribe()
    }
}
