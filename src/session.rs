//! The session context: who is logged in.
//!
//! The logged-in user is stored verbatim (as JSON) in a local [`Storage`], under [`SESSION_KEY`].
//! Its mere presence means the user is authenticated: the server is never asked to validate it.
//! The store is read once when the session is loaded, then every change goes through this context,
//! which notifies its subscribers.

use std::sync::Arc;

use tokio::sync::watch;

use crate::config::SESSION_KEY;
use crate::error::ApiError;
use crate::storage::Storage;
use crate::user::{User, UserId};

/// See [`Session::subscribe`]
pub type SessionReceiver = watch::Receiver<Option<User>>;

/// The session context
pub struct Session {
    storage: Arc<dyn Storage + Send + Sync>,
    sender: watch::Sender<Option<User>>,
    /// Keeps the channel open even when nobody subscribed, and holds the current user
    current: watch::Receiver<Option<User>>,
}

impl Session {
    /// Load the session from its backing store
    pub fn load(storage: Arc<dyn Storage + Send + Sync>) -> Self {
        let user = match storage.get(SESSION_KEY) {
            Err(err) => {
                log::warn!("Unable to read the stored session: {}. Starting logged out", err);
                None
            },
            Ok(None) => None,
            Ok(Some(raw)) => match serde_json::from_str::<User>(&raw) {
                Ok(user) => {
                    log::info!("Resuming the session of {}", user.email);
                    Some(user)
                },
                Err(err) => {
                    log::warn!("Invalid stored session ({}). Starting logged out", err);
                    None
                },
            },
        };

        let (sender, current) = watch::channel(user);
        Self { storage, sender, current }
    }

    /// Returns the logged-in user, if any
    pub fn current_user(&self) -> Option<User> {
        self.current.borrow().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.current.borrow().is_some()
    }

    /// Returns the id of the logged-in user, or an error when nobody is logged in
    pub fn user_id(&self) -> Result<UserId, ApiError> {
        self.current.borrow()
            .as_ref()
            .map(|u| u.id)
            .ok_or(ApiError::NotAuthenticated)
    }

    /// Get notified whenever the logged-in user changes (login, logout, profile update)
    pub fn subscribe(&self) -> SessionReceiver {
        self.sender.subscribe()
    }

    /// Store a user as the logged-in one
    pub fn login(&self, user: User) -> Result<(), ApiError> {
        log::info!("{} is now logged in", user.email);
        self.store(user)
    }

    /// Replace the stored user, e.g. after a profile update
    pub fn update_user(&self, user: User) -> Result<(), ApiError> {
        log::debug!("Updating the stored session of {}", user.email);
        self.store(user)
    }

    /// Forget the logged-in user
    pub fn logout(&self) -> Result<(), ApiError> {
        self.storage.remove(SESSION_KEY)
            .map_err(|err| ApiError::Unexpected(format!("Unable to remove the session: {}", err)))?;
        log::info!("Logged out");
        let _ = self.sender.send(None);
        Ok(())
    }

    fn store(&self, user: User) -> Result<(), ApiError> {
        let raw = serde_json::to_string(&user)?;
        self.storage.set(SESSION_KEY, &raw)
            .map_err(|err| ApiError::Unexpected(format!("Unable to store the session: {}", err)))?;
        let _ = self.sender.send(Some(user));
        Ok(())
    }
}



#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    fn ada() -> User {
        User { id: 3, full_name: "Ada Lovelace".to_string(), email: "ada@example.com".to_string() }
    }

    #[test]
    fn login_persists_and_logout_removes() {
        let storage = Arc::new(MemoryStorage::new());
        let session = Session::load(storage.clone());
        assert!(session.is_authenticated() == false);
        assert!(matches!(session.user_id(), Err(ApiError::NotAuthenticated)));

        session.login(ada()).unwrap();
        assert_eq!(session.user_id().unwrap(), 3);

        // A new session resumes from the store
        let resumed = Session::load(storage.clone());
        assert_eq!(resumed.current_user(), Some(ada()));

        session.logout().unwrap();
        assert_eq!(storage.get(SESSION_KEY).unwrap(), None);
        assert!(Session::load(storage).is_authenticated() == false);
    }

    #[test]
    fn garbage_is_not_a_session() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set(SESSION_KEY, "{not json").unwrap();
        assert!(Session::load(storage).is_authenticated() == false);
    }

    #[test]
    fn subscribers_are_notified() {
        let session = Session::load(Arc::new(MemoryStorage::new()));
        let mut receiver = session.subscribe();

        session.login(ada()).unwrap();
        assert!(receiver.has_changed().unwrap());
        assert_eq!(*receiver.borrow_and_update(), Some(ada()));

        session.logout().unwrap();
        assert!(receiver.has_changed().unwrap());
        assert_eq!(*receiver.borrow_and_update(), None);
    }
}
