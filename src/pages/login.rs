//! The login screen

use crate::error::ApiError;
use crate::router::Route;
use crate::traits::UserSource;
use crate::user::Credentials;

use super::{is_valid_email, Context};

pub struct LoginPage<S> {
    ctx: Context<S>,
    pub email: String,
    pub password: String,
    loading: bool,
}

impl<S> LoginPage<S>
where
    S: UserSource + Send + Sync,
{
    pub fn new(ctx: Context<S>) -> Self {
        Self { ctx, email: String::new(), password: String::new(), loading: false }
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Check the fields in order, and stop at the first invalid one
    pub fn validate(&self) -> Result<Credentials, String> {
        if self.email.is_empty() {
            return Err("Email is required".to_string());
        }
        if is_valid_email(&self.email) == false {
            return Err("Please enter a valid email address".to_string());
        }
        if self.password.is_empty() {
            return Err("Password is required".to_string());
        }
        Ok(Credentials { email: self.email.clone(), password: self.password.clone() })
    }

    /// Log in.
    ///
    /// Returns the route to navigate to on success. Every failure is reported as a notification
    pub async fn submit(&mut self) -> Option<Route> {
        let credentials = match self.validate() {
            Err(message) => {
                self.ctx.notifications.error(message);
                return None;
            },
            Ok(c) => c,
        };

        self.loading = true;
        let result = self.log_in(&credentials).await;
        self.loading = false;

        match result {
            Ok(()) => {
                self.ctx.notifications.success("Login successful");
                Some(Route::Tasks)
            },
            Err(err) => {
                self.ctx.notifications.report(&err);
                None
            },
        }
    }

    async fn log_in(&self, credentials: &Credentials) -> Result<(), ApiError> {
        log::debug!("Logging in as {}", credentials.email);
        let user = self.ctx.source.login(credentials).await?;
        self.ctx.session.login(user)
    }
}
