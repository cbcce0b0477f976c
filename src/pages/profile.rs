//! The profile screen: name, email and password of the logged-in user

use crate::error::ApiError;
use crate::router::Route;
use crate::traits::UserSource;
use crate::user::{ProfileUpdate, User, UserId};

use super::{Context, PASSWORD_MIN_LENGTH};

pub struct ProfilePage<S> {
    ctx: Context<S>,
    user: Option<User>,
    pub full_name: String,
    pub email: String,
    pub current_password: String,
    pub new_password: String,
    show_password_fields: bool,
    loading: bool,
}

impl<S> ProfilePage<S>
where
    S: UserSource + Send + Sync,
{
    pub fn new(ctx: Context<S>) -> Self {
        Self {
            ctx,
            user: None,
            full_name: String::new(),
            email: String::new(),
            current_password: String::new(),
            new_password: String::new(),
            show_password_fields: false,
            loading: false,
        }
    }

    pub fn user(&self) -> Option<&User>          { self.user.as_ref()        }
    pub fn is_loading(&self) -> bool             { self.loading              }
    pub fn shows_password_fields(&self) -> bool  { self.show_password_fields }

    /// Fill the form from the session.
    ///
    /// Returns the route to redirect to when nobody is logged in
    pub fn load(&mut self) -> Option<Route> {
        match self.ctx.session.current_user() {
            None => Some(Route::Login),
            Some(user) => {
                self.full_name = user.full_name.clone();
                self.email = user.email.clone();
                self.current_password.clear();
                self.new_password.clear();
                self.user = Some(user);
                None
            },
        }
    }

    /// Up to two initials of the logged-in user
    pub fn initials(&self) -> String {
        self.user.as_ref().map(|u| u.initials()).unwrap_or_default()
    }

    pub fn toggle_password_fields(&mut self) {
        self.show_password_fields = !self.show_password_fields;
    }

    /// Build the update request. Password fields are only checked (and sent) when their section is open
    pub fn validate(&self) -> Result<ProfileUpdate, String> {
        let mut update = ProfileUpdate {
            full_name: self.full_name.clone(),
            email: self.email.clone(),
            ..ProfileUpdate::default()
        };

        if self.show_password_fields {
            if self.current_password.is_empty() || self.new_password.is_empty() {
                return Err("Password fields cannot be empty".to_string());
            }
            if self.new_password.chars().count() < PASSWORD_MIN_LENGTH {
                return Err(format!("The new password must be at least {} characters long", PASSWORD_MIN_LENGTH));
            }
            update.current_password = Some(self.current_password.clone());
            update.new_password = Some(self.new_password.clone());
        }
        Ok(update)
    }

    /// Send the profile update. Returns whether it succeeded
    pub async fn submit(&mut self) -> bool {
        let id = match &self.user {
            None => return false,
            Some(user) => user.id,
        };

        let update = match self.validate() {
            Err(message) => {
                self.ctx.notifications.error(message);
                return false;
            },
            Ok(u) => u,
        };

        self.loading = true;
        let result = self.update(id, &update).await;
        self.loading = false;

        match result {
            Err(err) => {
                self.ctx.notifications.report(&err);
                false
            },
            Ok(user) => {
                self.user = Some(user);
                self.ctx.notifications.success("Profile updated successfully");
                if self.show_password_fields {
                    self.show_password_fields = false;
                    self.current_password.clear();
                    self.new_password.clear();
                }
                true
            },
        }
    }

    async fn update(&self, id: UserId, update: &ProfileUpdate) -> Result<User, ApiError> {
        let user = self.ctx.source.update_profile(id, update).await?;
        self.ctx.session.update_user(user.clone())?;
        Ok(user)
    }

    /// Forget the logged-in user
    pub fn logout(&mut self) -> Route {
        if let Err(err) = self.ctx.session.logout() {
            self.ctx.notifications.report(&err);
        }
        self.user = None;
        Route::Login
    }
}
