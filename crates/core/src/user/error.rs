//! Error catalogue for users, credentials and authentication.

use thiserror::Error;

use crate::error::ErrorKind;

/// Email validation failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EmailError {
    #[error("The email is required.")]
    NullOrEmpty,

    #[error("The email is longer than allowed.")]
    LongerThanAllowed,

    #[error("The email format is invalid.")]
    InvalidFormat,
}

impl EmailError {
    pub fn code(&self) -> &'static str {
        match self {
            EmailError::NullOrEmpty => "Email.NullOrEmpty",
            EmailError::LongerThanAllowed => "Email.LongerThanAllowed",
            EmailError::InvalidFormat => "Email.InvalidFormat",
        }
    }
}

/// Password policy failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PasswordError {
    #[error("The password is required.")]
    NullOrEmpty,

    #[error("The password is too short.")]
    TooShort,

    #[error("The password requires at least one uppercase letter.")]
    MissingUppercaseLetter,

    #[error("The password requires at least one lowercase letter.")]
    MissingLowercaseLetter,

    #[error("The password requires at least one digit.")]
    MissingDigit,

    #[error("The password requires at least one non-alphanumeric.")]
    MissingNonAlphaNumeric,
}

impl PasswordError {
    pub fn code(&self) -> &'static str {
        match self {
            PasswordError::NullOrEmpty => "Password.NullOrEmpty",
            PasswordError::TooShort => "Password.TooShort",
            PasswordError::MissingUppercaseLetter => "Password.MissingUppercaseLetter",
            PasswordError::MissingLowercaseLetter => "Password.MissingLowercaseLetter",
            PasswordError::MissingDigit => "Password.MissingDigit",
            PasswordError::MissingNonAlphaNumeric => "Password.MissingNonAlphaNumeric",
        }
    }
}

/// User errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UserError {
    #[error("The user with the specified identifier was not found.")]
    NotFound,

    #[error("The current user does not have the permissions to perform that operation.")]
    InvalidPermissions,

    #[error("The specified email is already in use.")]
    DuplicateEmail,

    #[error("The password cannot be changed to the specified password.")]
    CannotChangePassword,

    #[error("The name is required.")]
    NameRequired,

    #[error("The name is longer than allowed.")]
    NameTooLong,

    #[error("The surname is required.")]
    SurnameRequired,

    #[error("The surname is longer than allowed.")]
    SurnameTooLong,

    #[error(transparent)]
    Email(#[from] EmailError),

    #[error(transparent)]
    Password(#[from] PasswordError),
}

impl UserError {
    pub fn code(&self) -> &'static str {
        match self {
            UserError::NotFound => "User.NotFound",
            UserError::InvalidPermissions => "User.InvalidPermissions",
            UserError::DuplicateEmail => "User.DuplicateEmail",
            UserError::CannotChangePassword => "User.CannotChangePassword",
            UserError::NameRequired => "User.NameRequired",
            UserError::NameTooLong => "User.NameTooLong",
            UserError::SurnameRequired => "User.SurnameRequired",
            UserError::SurnameTooLong => "User.SurnameTooLong",
            UserError::Email(e) => e.code(),
            UserError::Password(e) => e.code(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            UserError::NotFound => ErrorKind::NotFound,
            UserError::InvalidPermissions => ErrorKind::InvalidPermission,
            _ => ErrorKind::BusinessRule,
        }
    }
}

/// Authentication errors.
///
/// Deliberately coarse: callers learn that the pair was rejected, never which
/// half of it was wrong.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthenticationError {
    #[error("The specified email or password are incorrect.")]
    InvalidEmailOrPassword,
}

impl AuthenticationError {
    pub fn code(&self) -> &'static str {
        match self {
            AuthenticationError::InvalidEmailOrPassword => "Authentication.InvalidEmailOrPassword",
        }
    }

    pub fn kind(&self) -> ErrorKind {
        ErrorKind::BusinessRule
    }
}
