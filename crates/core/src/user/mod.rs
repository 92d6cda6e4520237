//! Users, roles and credentials.

mod email;
mod error;
mod password;
mod store;
mod types;
mod views;

pub use email::{Email, EMAIL_MAX_LENGTH};
pub use error::{AuthenticationError, EmailError, PasswordError, UserError};
pub use password::{
    Argon2PasswordHasher, HashError, Password, PasswordHasher, PASSWORD_MIN_LENGTH,
};
pub use store::UserRepository;
pub use types::{NewUser, Role, User, UserId, NAME_MAX_LENGTH, SURNAME_MAX_LENGTH};
pub use views::{RoleRef, UserDetails, UserSummary};
