use async_trait::async_trait;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, thiserror::Error)]
pub enum CategoryError {
    #[error("Category name is required")]
    Invalid,
    #[error("Category already exists")]
    Duplicate,
    #[error("Storage error: {0}")]
    StorageError(String),
}

#[async_trait]
pub trait CategoryStore: Send + Sync {
    async fn list(&self) -> Result<Vec<Category>, CategoryError>;
    /// Insert a category. Must return `CategoryError::Duplicate` if the name is taken.
    async fn insert(&self, name: &str) -> Result<Category, CategoryError>;
}

pub struct CategoryService<S: CategoryStore> {
    store: S,
}

impl<S: CategoryStore> CategoryService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub async fn list(&self) -> Result<Vec<Category>, CategoryError> {
        self.store.list().await
    }

    pub async fn create(&self, name: &str) -> Result<Category, CategoryError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CategoryError::Invalid);
        }

        let category = self.store.insert(name).await?;
        tracing::info!(id = category.id, name = %category.name, "Category created");
        Ok(category)
    }
}
