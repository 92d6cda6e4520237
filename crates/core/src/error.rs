//! Error taxonomy shared by the services.

use thiserror::Error;

use crate::category::CategoryError;
use crate::ticket::TicketError;
use crate::user::{AuthenticationError, EmailError, HashError, PasswordError, UserError};

/// The three classes of expected failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NotFound,
    InvalidPermission,
    BusinessRule,
}

/// Collaborator failures. Always fatal for the current use case.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(String),

    #[error("unit of work rejected: {0}")]
    Rejected(String),
}

impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        StoreError::Database(e.to_string())
    }
}

/// Everything a use case can fail with.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Ticket(#[from] TicketError),

    #[error(transparent)]
    User(#[from] UserError),

    #[error(transparent)]
    Category(#[from] CategoryError),

    #[error(transparent)]
    Authentication(#[from] AuthenticationError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Hashing(#[from] HashError),
}

impl From<EmailError> for ServiceError {
    fn from(e: EmailError) -> Self {
        ServiceError::User(UserError::Email(e))
    }
}

impl From<PasswordError> for ServiceError {
    fn from(e: PasswordError) -> Self {
        ServiceError::User(UserError::Password(e))
    }
}

impl ServiceError {
    /// `None` for fatal store and hashing failures.
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            ServiceError::Ticket(e) => Some(e.kind()),
            ServiceError::User(e) => Some(e.kind()),
            ServiceError::Category(e) => Some(e.kind()),
            ServiceError::Authentication(e) => Some(e.kind()),
            ServiceError::Store(_) | ServiceError::Hashing(_) => None,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ServiceError::Ticket(e) => e.code(),
            ServiceError::User(e) => e.code(),
            ServiceError::Category(e) => e.code(),
            ServiceError::Authentication(e) => e.code(),
            ServiceError::Store(_) => "Store.Failure",
            ServiceError::Hashing(_) => "Password.HashingFailed",
        }
    }

    pub fn is_fatal(&self) -> bool {
        self.kind().is_none()
    }
}
