// Principal & Account Domain Model

use serde::{Deserialize, Serialize};

/// Access role of a logged-in user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Admin => write!(f, "admin"),
        }
    }
}

/// The logged-in user's identity, persisted as the session record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Principal {
    pub name: String,
    pub email: String,
    pub role: Role,
    pub logged_in: bool,
}

/// A registered account.
///
/// The password is stored in plaintext. This mirrors the documented
/// behavior of the store this system targets and is out of scope to fix
/// here; a real deployment would hash and salt server-side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAccount {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
    pub created_at: i64,
}
