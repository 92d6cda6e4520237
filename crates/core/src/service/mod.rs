//! Use-case services.

mod authentication;
mod category;
mod status;
mod ticket;
mod user;

use std::sync::Arc;

pub use authentication::AuthenticationService;
pub use category::CategoryService;
pub use status::{StatusView, TicketStatusService};
pub use ticket::TicketService;
pub use user::UserService;

use crate::category::{Category, CategoryError, CategoryId};
use crate::error::ServiceError;
use crate::store::Collaborators;
use crate::user::{PasswordHasher, User, UserError, UserId};

/// Every service, built over one set of collaborators.
#[derive(Clone)]
pub struct Services {
    pub tickets: TicketService,
    pub users: UserService,
    pub categories: CategoryService,
    pub statuses: TicketStatusService,
    pub authentication: AuthenticationService,
}

impl Services {
    pub fn new(collaborators: Collaborators, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self {
            tickets: TicketService::new(collaborators.clone()),
            users: UserService::new(collaborators.clone(), hasher.clone()),
            categories: CategoryService::new(collaborators.categories.clone()),
            statuses: TicketStatusService,
            authentication: AuthenticationService::new(collaborators.users.clone(), hasher),
        }
    }
}

async fn load_user(collaborators: &Collaborators, id: UserId) -> Result<User, ServiceError> {
    collaborators
        .users
        .get_by_id(id)
        .await?
        .ok_or_else(|| UserError::NotFound.into())
}

async fn load_category(
    collaborators: &Collaborators,
    id: CategoryId,
) -> Result<Category, ServiceError> {
    collaborators
        .categories
        .get_by_id(id)
        .await?
        .ok_or_else(|| CategoryError::NotFound.into())
}
