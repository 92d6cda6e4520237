use async_trait::async_trait;

use super::{Category, CategoryId};
use crate::error::StoreError;

/// Read access to the category catalogue.
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    async fn get_by_id(&self, id: CategoryId) -> Result<Option<Category>, StoreError>;

    /// All categories ordered by id.
    async fn list_all(&self) -> Result<Vec<Category>, StoreError>;
}
