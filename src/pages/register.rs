//! The registration screen

use crate::router::Route;
use crate::traits::UserSource;
use crate::user::Registration;

use super::{is_valid_email, Context, PASSWORD_MIN_LENGTH};

pub struct RegisterPage<S> {
    ctx: Context<S>,
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    loading: bool,
}

impl<S> RegisterPage<S>
where
    S: UserSource + Send + Sync,
{
    pub fn new(ctx: Context<S>) -> Self {
        Self {
            ctx,
            full_name: String::new(),
            email: String::new(),
            password: String::new(),
            confirm_password: String::new(),
            loading: false,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Check the fields in order, and stop at the first invalid one
    pub fn validate(&self) -> Result<Registration, String> {
        if self.full_name.trim().is_empty() {
            return Err("Full name is required".to_string());
        }
        if self.email.is_empty() {
            return Err("Email is required".to_string());
        }
        if is_valid_email(&self.email) == false {
            return Err("Please enter a valid email address".to_string());
        }
        if self.password.is_empty() {
            return Err("Password is required".to_string());
        }
        if self.password.chars().count() < PASSWORD_MIN_LENGTH {
            return Err(format!("Password must be at least {} characters long", PASSWORD_MIN_LENGTH));
        }
        if self.password != self.confirm_password {
            return Err("Passwords do not match".to_string());
        }

        Ok(Registration {
            full_name: self.full_name.clone(),
            email: self.email.clone(),
            password: self.password.clone(),
        })
    }

    /// Create the account.
    ///
    /// This does not log the new user in: on success, the login screen is the route to navigate to.
    pub async fn submit(&mut self) -> Option<Route> {
        let registration = match self.validate() {
            Err(message) => {
                self.ctx.notifications.error(message);
                return None;
            },
            Ok(r) => r,
        };

        self.loading = true;
        let result = self.ctx.source.register(&registration).await;
        self.loading = false;

        match result {
            Ok(user) => {
                log::info!("Registered {} with id {}", user.email, user.id);
                self.ctx.notifications.success("Registration successful, you can now log in");
                Some(Route::Login)
            },
            Err(err) => {
                self.ctx.notifications.report(&err);
                None
            },
        }
    }
}
