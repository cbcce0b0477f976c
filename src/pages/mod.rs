//! Page controllers.
//!
//! Each page holds the state of one screen, and turns user actions into calls to the services.
//! Failures never bubble up from a page: they are normalized and pushed to the notification channel,
//! the way a screen would show them as toasts.

use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::router::{self, Resolution, Route};
use crate::session::{Session, SessionReceiver};
use crate::notification::Notifications;

pub mod login;
pub mod register;
pub mod profile;
pub mod task_list;

pub use login::LoginPage;
pub use register::RegisterPage;
pub use profile::ProfilePage;
pub use task_list::TaskListPage;

/// Minimum length of a new password
pub const PASSWORD_MIN_LENGTH: usize = 6;

static EMAIL_RE: Lazy<Option<Regex>> = Lazy::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$")
        .map_err(|err| log::error!("Invalid email pattern: {}", err))
        .ok()
});

/// Whether an email address looks well-formed (`something@domain.tld`)
pub fn is_valid_email(email: &str) -> bool {
    match EMAIL_RE.as_ref() {
        Some(re) => re.is_match(email),
        None => false,
    }
}


/// What every page needs: the services, the session and the notification channel.
///
/// Cloning it gives other handles to the same objects.
pub struct Context<S> {
    pub source: Arc<S>,
    pub session: Arc<Session>,
    pub notifications: Notifications,
}

impl<S> Clone for Context<S> {
    fn clone(&self) -> Self {
        Self {
            source: self.source.clone(),
            session: self.session.clone(),
            notifications: self.notifications.clone(),
        }
    }
}

impl<S> Context<S> {
    pub fn new(source: Arc<S>, session: Arc<Session>, notifications: Notifications) -> Self {
        Self { source, session, notifications }
    }
}


/// The application shell: the current route, kept consistent with the session
pub struct App {
    route: Route,
    session: Arc<Session>,
    session_changes: SessionReceiver,
}

impl App {
    pub fn new(session: Arc<Session>) -> Self {
        let route = Route::home(session.is_authenticated());
        let session_changes = session.subscribe();
        Self { route, session, session_changes }
    }

    pub fn route(&self) -> Route {
        self.route
    }

    /// Visit a path, going through the authentication gate
    pub fn navigate(&mut self, path: &str) -> Resolution {
        let resolution = router::resolve(path, self.session.is_authenticated());
        if let Resolution::Redirect(target) = resolution {
            log::debug!("Redirecting from {} to {}", path, target);
        }
        self.route = resolution.route();
        resolution
    }

    /// Re-check the current route after a login or a logout happened elsewhere.
    ///
    /// Returns the new resolution, or `None` if the session did not change since the last call
    pub fn sync_with_session(&mut self) -> Option<Resolution> {
        match self.session_changes.has_changed() {
            Ok(true) => {
                self.session_changes.borrow_and_update();
                let path = self.route.path();
                Some(self.navigate(path))
            },
            Ok(false) => None,
            Err(_) => None,
        }
    }
}
