use std::sync::Arc;

use crate::{
    db::OrmConn,
    repository::{
        MemoryCategoryRepository, MemoryProductRepository, PgCategoryRepository,
        PgProductRepository,
    },
    services::{CategoryService, ProductService},
};

#[derive(Clone)]
pub struct AppState {
    pub products: ProductService,
    pub categories: CategoryService,
}

impl AppState {
    pub fn new(products: ProductService, categories: CategoryService) -> Self {
        Self {
            products,
            categories,
        }
    }

    /// Catalog kept in process memory; contents are lost on shutdown.
    pub fn in_memory() -> Self {
        Self::new(
            ProductService::new(Arc::new(MemoryProductRepository::new())),
            CategoryService::new(Arc::new(MemoryCategoryRepository::new())),
        )
    }

    pub fn postgres(orm: OrmConn) -> Self {
        Self::new(
            ProductService::new(Arc::new(PgProductRepository::new(orm.clone()))),
            CategoryService::new(Arc::new(PgCategoryRepository::new(orm))),
        )
    }
}
