//! Users and the bodies of the account requests

use serde::{Deserialize, Serialize};

/// The backend identifier of a user
pub type UserId = i64;

/// A user, as returned by the backend after a login, a registration or a profile update
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub full_name: String,
    pub email: String,
}

impl User {
    /// Up to two uppercased initials of the full name, e.g. `JD` for `John Doe`
    pub fn initials(&self) -> String {
        self.full_name
            .split(' ')
            .filter_map(|word| word.chars().next())
            .flat_map(|c| c.to_uppercase())
            .take(2)
            .collect()
    }
}

/// The body of a login request
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// The body of a registration request
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub full_name: String,
    pub email: String,
    pub password: String,
}

/// The body of a profile update request.
///
/// Password fields are only sent when the user changes their password.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    pub full_name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_password: Option<String>,
}
