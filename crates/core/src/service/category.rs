use std::sync::Arc;

use tracing::debug;

use crate::category::{Category, CategoryError, CategoryId, CategoryRepository};
use crate::error::ServiceError;

/// Read-only access to the category catalogue.
#[derive(Clone)]
pub struct CategoryService {
    categories: Arc<dyn CategoryRepository>,
}

impl CategoryService {
    pub fn new(categories: Arc<dyn CategoryRepository>) -> Self {
        Self { categories }
    }

    pub async fn get_categories(&self) -> Result<Vec<Category>, ServiceError> {
        let categories = self.categories.list_all().await?;
        debug!(count = categories.len(), "Categories listed");
        Ok(categories)
    }

    pub async fn get_category_by_id(&self, id: CategoryId) -> Result<Category, ServiceError> {
        self.categories
            .get_by_id(id)
            .await?
            .ok_or_else(|| CategoryError::NotFound.into())
    }
}
