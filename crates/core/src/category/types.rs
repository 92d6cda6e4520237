use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::ErrorKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryId(pub i64);

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PriorityId(pub i64);

/// How urgently tickets of a category should be handled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Priority {
    pub id: PriorityId,
    pub name: String,
    /// Target resolution time in hours.
    pub sla_hours: u32,
}

/// Reference data. Categories are never created through the services.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub description: Option<String>,
    pub priority: Priority,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CategoryError {
    #[error("The category with the specified identifier was not found.")]
    NotFound,
}

impl CategoryError {
    pub fn code(&self) -> &'static str {
        match self {
            CategoryError::NotFound => "Category.NotFound",
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            CategoryError::NotFound => ErrorKind::NotFound,
        }
    }
}
