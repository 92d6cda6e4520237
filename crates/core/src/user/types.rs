//! User and role types.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Email, Password, PasswordHasher, UserError};
use crate::error::ServiceError;

/// Maximum length of a user's name.
pub const NAME_MAX_LENGTH: usize = 100;

/// Maximum length of a user's surname.
pub const SURNAME_MAX_LENGTH: usize = 150;

/// Surrogate user identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub i64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Privilege level of a user.
///
/// Declaration order is the privilege order, so `Role::General < Role::Analyst`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    General,
    Analyst,
    Administrator,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::General, Role::Analyst, Role::Administrator];

    /// Stable numeric id, as persisted.
    pub fn id(&self) -> i64 {
        match self {
            Role::Administrator => 1,
            Role::General => 2,
            Role::Analyst => 3,
        }
    }

    pub fn from_id(id: i64) -> Option<Self> {
        match id {
            1 => Some(Role::Administrator),
            2 => Some(Role::General),
            3 => Some(Role::Analyst),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Role::General => "General",
            Role::Analyst => "Analyst",
            Role::Administrator => "Administrator",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A persisted user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub(crate) id: UserId,
    pub(crate) role: Role,
    pub(crate) name: String,
    pub(crate) surname: String,
    pub(crate) email: Email,
    pub(crate) password_hash: String,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) last_updated_at: Option<DateTime<Utc>>,
}

impl User {
    /// Rehydrate a user from storage.
    #[allow(clippy::too_many_arguments)]
    pub fn restore(
        id: UserId,
        role: Role,
        name: String,
        surname: String,
        email: Email,
        password_hash: String,
        created_at: DateTime<Utc>,
        last_updated_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            id,
            role,
            name,
            surname,
            email,
            password_hash,
            created_at,
            last_updated_at,
        }
    }

    pub fn id(&self) -> UserId {
        self.id
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn surname(&self) -> &str {
        &self.surname
    }

    pub fn email(&self) -> &Email {
        &self.email
    }

    pub fn password_hash(&self) -> &str {
        &self.password_hash
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn last_updated_at(&self) -> Option<DateTime<Utc>> {
        self.last_updated_at
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.name, self.surname)
    }

    pub fn change_name(&mut self, name: &str, surname: &str) -> Result<(), UserError> {
        let name = validate_name(name)?;
        let surname = validate_surname(surname)?;
        self.name = name;
        self.surname = surname;
        self.last_updated_at = Some(Utc::now());
        Ok(())
    }

    /// Replace the stored hash. Re-using the current password is refused.
    pub fn change_password(
        &mut self,
        password: &Password,
        hasher: &dyn PasswordHasher,
    ) -> Result<(), ServiceError> {
        if hasher.verify(password.expose(), &self.password_hash) {
            return Err(UserError::CannotChangePassword.into());
        }
        self.password_hash = hasher.hash(password.expose())?;
        self.last_updated_at = Some(Utc::now());
        Ok(())
    }

    pub fn verify_password(&self, password: &str, hasher: &dyn PasswordHasher) -> bool {
        hasher.verify(password, &self.password_hash)
    }
}

/// A user that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub(crate) role: Role,
    pub(crate) name: String,
    pub(crate) surname: String,
    pub(crate) email: Email,
    pub(crate) password_hash: String,
    pub(crate) created_at: DateTime<Utc>,
}

impl NewUser {
    /// Names are validated before the password is hashed.
    pub fn new(
        role: Role,
        name: &str,
        surname: &str,
        email: Email,
        password: &Password,
        hasher: &dyn PasswordHasher,
    ) -> Result<Self, ServiceError> {
        let name = validate_name(name)?;
        let surname = validate_surname(surname)?;
        Ok(Self {
            role,
            name,
            surname,
            email,
            password_hash: hasher.hash(password.expose())?,
            created_at: Utc::now(),
        })
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn email(&self) -> &Email {
        &self.email
    }

    /// Attach the id assigned by the store.
    pub fn into_user(self, id: UserId) -> User {
        User {
            id,
            role: self.role,
            name: self.name,
            surname: self.surname,
            email: self.email,
            password_hash: self.password_hash,
            created_at: self.created_at,
            last_updated_at: None,
        }
    }
}

fn validate_name(name: &str) -> Result<String, UserError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(UserError::NameRequired);
    }
    if name.chars().count() > NAME_MAX_LENGTH {
        return Err(UserError::NameTooLong);
    }
    Ok(name.to_string())
}

fn validate_surname(surname: &str) -> Result<String, UserError> {
    let surname = surname.trim();
    if surname.is_empty() {
        return Err(UserError::SurnameRequired);
    }
    if surname.chars().count() > SURNAME_MAX_LENGTH {
        return Err(UserError::SurnameTooLong);
    }
    Ok(surname.to_string())
}
