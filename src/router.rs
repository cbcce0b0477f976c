//! Routes, and the authentication gate in front of them

use std::fmt::{Display, Formatter};

/// The screens of the application
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Route {
    Login,
    Register,
    Tasks,
    Profile,
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Route::Login => "/login",
            Route::Register => "/register",
            Route::Tasks => "/tasks",
            Route::Profile => "/profile",
        }
    }

    /// Whether this route requires a logged-in user
    pub fn is_protected(&self) -> bool {
        matches!(self, Route::Tasks | Route::Profile)
    }

    /// Parse a path. Unknown paths return `None`
    pub fn from_path(path: &str) -> Option<Self> {
        let path = path.trim_end_matches('/');
        match path {
            "/login" => Some(Route::Login),
            "/register" => Some(Route::Register),
            "/tasks" => Some(Route::Tasks),
            "/profile" => Some(Route::Profile),
            _ => None,
        }
    }

    /// Where to go by default
    pub fn home(authenticated: bool) -> Self {
        if authenticated { Route::Tasks } else { Route::Login }
    }
}

impl Display for Route {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        write!(f, "{}", self.path())
    }
}


/// What happens when a path is visited
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Resolution {
    Render(Route),
    Redirect(Route),
}

impl Resolution {
    /// The route that ends up displayed
    pub fn route(&self) -> Route {
        match self {
            Resolution::Render(r) | Resolution::Redirect(r) => *r,
        }
    }
}

/// Decide what to display for a path.
///
/// Protected routes redirect to the login screen when nobody is logged in, and the login and
/// registration screens redirect to the task list when somebody is. Unknown paths go home.
pub fn resolve(path: &str, authenticated: bool) -> Resolution {
    let route = match Route::from_path(path) {
        None => return Resolution::Redirect(Route::home(authenticated)),
        Some(route) => route,
    };

    match (route.is_protected(), authenticated) {
        (true, false) => Resolution::Redirect(Route::Login),
        (false, true) => Resolution::Redirect(Route::Tasks),
        _ => Resolution::Render(route),
    }
}
