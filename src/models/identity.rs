//! Identity model and role types

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Identity roles (closed set, stored lowercase)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum Role {
    Student,
    Leader,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Leader => "leader",
            Role::Admin => "admin",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "student" => Ok(Role::Student),
            "leader" => Ok(Role::Leader),
            "admin" => Ok(Role::Admin),
            _ => Err(format!("Invalid role: {}", s)),
        }
    }
}

/// Identity record from the credential store.
///
/// `password_salt` and `password_hash` are either both present (password
/// must verify) or both absent (passwordless login is accepted). `points`
/// is a stored integer owned by external gamification collaborators; the
/// core only persists it.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Identity {
    pub id: Uuid,
    pub display_name: String,
    pub group_tag: String,
    pub role: Role,
    #[serde(skip_serializing, default)]
    pub password_salt: Option<String>,
    #[serde(skip_serializing, default)]
    pub password_hash: Option<String>,
    pub points: i64,
}

impl Identity {
    /// Whether this identity carries a stored credential.
    pub fn has_credential(&self) -> bool {
        self.password_salt.is_some() && self.password_hash.is_some()
    }
}
