//! Storage abstraction for catalog entities.
//!
//! Absence is never an error at this layer: lookups return `None` or `false`.
//! Errors are reserved for the store itself failing or rejecting a write.

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{Category, NewCategory, NewProduct, Product, StockError};

pub mod memory;
pub mod postgres;

pub use memory::{MemoryCategoryRepository, MemoryProductRepository};
pub use postgres::{PgCategoryRepository, PgProductRepository};

#[derive(Debug, Error)]
pub enum RepositoryError {
    /// A unique key (SKU, category code) is already taken.
    #[error("unique constraint violated: {0}")]
    Conflict(String),

    /// `save` targeted a row that no longer exists.
    #[error("record {0} does not exist")]
    NotFound(i64),

    #[error("ORM error: {0}")]
    Orm(#[from] sea_orm::DbErr),

    /// The stock change would break a stock rule; nothing was written.
    #[error(transparent)]
    Stock(#[from] StockError),

    #[error("store lock poisoned")]
    Poisoned,
}

pub type RepoResult<T> = Result<T, RepositoryError>;

#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Assigns an identity and write timestamps.
    async fn insert(&self, product: NewProduct) -> RepoResult<Product>;
    /// Replaces the stored row with the same id and refreshes `updated_at`.
    async fn save(&self, product: Product) -> RepoResult<Product>;
    async fn find_by_id(&self, id: i64) -> RepoResult<Option<Product>>;
    async fn find_all(&self) -> RepoResult<Vec<Product>>;
    /// Returns whether a row was removed.
    async fn delete_by_id(&self, id: i64) -> RepoResult<bool>;
    async fn exists_by_id(&self, id: i64) -> RepoResult<bool>;
    async fn exists_by_sku(&self, sku: &str) -> RepoResult<bool>;
    async fn find_by_sku(&self, sku: &str) -> RepoResult<Option<Product>>;
    /// Case-insensitive exact match on the category label.
    async fn find_by_category(&self, category: &str) -> RepoResult<Vec<Product>>;
    /// Case-insensitive substring match on name, description, category or SKU.
    async fn find_by_keyword(&self, keyword: &str) -> RepoResult<Vec<Product>>;
    async fn find_available(&self) -> RepoResult<Vec<Product>>;
    /// Inclusive on both ends.
    async fn find_by_price_between(&self, min: f64, max: f64) -> RepoResult<Vec<Product>>;
    /// Applies `delta` to the stock as one read-modify-write; concurrent
    /// adjustments of the same row never lose an update. `None` if the row is missing.
    async fn adjust_stock(&self, id: i64, delta: i32) -> RepoResult<Option<Product>>;
}

#[async_trait]
pub trait CategoryRepository: Send + Sync {
    async fn insert(&self, category: NewCategory) -> RepoResult<Category>;
    async fn save(&self, category: Category) -> RepoResult<Category>;
    async fn find_by_id(&self, id: i64) -> RepoResult<Option<Category>>;
    async fn find_all(&self) -> RepoResult<Vec<Category>>;
    async fn delete_by_id(&self, id: i64) -> RepoResult<bool>;
    async fn exists_by_id(&self, id: i64) -> RepoResult<bool>;
    async fn exists_by_code(&self, code: &str) -> RepoResult<bool>;
    async fn find_by_code(&self, code: &str) -> RepoResult<Option<Category>>;
}
