use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{Email, Role, User, UserId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoleRef {
    pub id: i64,
    pub name: String,
}

impl From<Role> for RoleRef {
    fn from(role: Role) -> Self {
        Self {
            id: role.id(),
            name: role.name().to_string(),
        }
    }
}

/// Profile of a single user. Never carries the password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserDetails {
    pub id: UserId,
    pub name: String,
    pub surname: String,
    pub email: Email,
    pub role: RoleRef,
    pub created_at: DateTime<Utc>,
    pub last_updated_at: Option<DateTime<Utc>>,
}

impl From<&User> for UserDetails {
    fn from(user: &User) -> Self {
        Self {
            id: user.id(),
            name: user.name().to_string(),
            surname: user.surname().to_string(),
            email: user.email().clone(),
            role: user.role().into(),
            created_at: user.created_at(),
            last_updated_at: user.last_updated_at(),
        }
    }
}

/// Row of a user listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserSummary {
    pub id: UserId,
    pub full_name: String,
    pub role: RoleRef,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id(),
            full_name: user.full_name(),
            role: user.role().into(),
        }
    }
}
