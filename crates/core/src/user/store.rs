//! User repository trait.

use async_trait::async_trait;

use super::{Email, User, UserId};
use crate::error::StoreError;
use crate::store::{Page, PageRequest};

/// Read access to users.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn get_by_id(&self, id: UserId) -> Result<Option<User>, StoreError>;

    async fn get_by_email(&self, email: &Email) -> Result<Option<User>, StoreError>;

    async fn is_email_unique(&self, email: &Email) -> Result<bool, StoreError> {
        Ok(self.get_by_email(email).await?.is_none())
    }

    /// Users ordered by name, then surname.
    async fn list(&self, page: &PageRequest) -> Result<Page<User>, StoreError>;
}
