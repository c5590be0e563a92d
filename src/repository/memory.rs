use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use chrono::Utc;

use super::{CategoryRepository, ProductRepository, RepoResult, RepositoryError};
use crate::models::{Category, NewCategory, NewProduct, Product};

/// Rows keyed by id plus the next id to hand out.
#[derive(Debug)]
struct Table<T> {
    rows: BTreeMap<i64, T>,
    next_id: i64,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
            next_id: 1,
        }
    }
}

impl<T: Clone> Table<T> {
    fn allocate_id(&mut self) -> i64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn select<P>(&self, predicate: P) -> Vec<T>
    where
        P: Fn(&T) -> bool,
    {
        self.rows.values().filter(|row| predicate(row)).cloned().collect()
    }
}

fn read<T>(lock: &RwLock<Table<T>>) -> RepoResult<RwLockReadGuard<'_, Table<T>>> {
    lock.read().map_err(|_| RepositoryError::Poisoned)
}

fn write<T>(lock: &RwLock<Table<T>>) -> RepoResult<RwLockWriteGuard<'_, Table<T>>> {
    lock.write().map_err(|_| RepositoryError::Poisoned)
}

fn contains_ignore_case(haystack: &str, needle_lower: &str) -> bool {
    haystack.to_lowercase().contains(needle_lower)
}

/// In-process product store. Writers are serialized by the lock, so the SKU
/// check and the insert happen atomically.
#[derive(Debug, Default)]
pub struct MemoryProductRepository {
    table: RwLock<Table<Product>>,
}

impl MemoryProductRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProductRepository for MemoryProductRepository {
    async fn insert(&self, product: NewProduct) -> RepoResult<Product> {
        let mut table = write(&self.table)?;
        if table.rows.values().any(|p| p.sku == product.sku) {
            return Err(RepositoryError::Conflict(format!("sku {}", product.sku)));
        }
        let id = table.allocate_id();
        let stored = product.into_product(id, Utc::now());
        table.rows.insert(id, stored.clone());
        Ok(stored)
    }

    async fn save(&self, mut product: Product) -> RepoResult<Product> {
        let mut table = write(&self.table)?;
        if table
            .rows
            .values()
            .any(|p| p.sku == product.sku && p.id != product.id)
        {
            return Err(RepositoryError::Conflict(format!("sku {}", product.sku)));
        }
        let slot = table
            .rows
            .get_mut(&product.id)
            .ok_or(RepositoryError::NotFound(product.id))?;
        product.audit = slot.audit.touched(Utc::now());
        *slot = product.clone();
        Ok(product)
    }

    async fn find_by_id(&self, id: i64) -> RepoResult<Option<Product>> {
        Ok(read(&self.table)?.rows.get(&id).cloned())
    }

    async fn find_all(&self) -> RepoResult<Vec<Product>> {
        Ok(read(&self.table)?.select(|_| true))
    }

    async fn delete_by_id(&self, id: i64) -> RepoResult<bool> {
        Ok(write(&self.table)?.rows.remove(&id).is_some())
    }

    async fn exists_by_id(&self, id: i64) -> RepoResult<bool> {
        Ok(read(&self.table)?.rows.contains_key(&id))
    }

    async fn exists_by_sku(&self, sku: &str) -> RepoResult<bool> {
        Ok(read(&self.table)?.rows.values().any(|p| p.sku == sku))
    }

    async fn find_by_sku(&self, sku: &str) -> RepoResult<Option<Product>> {
        Ok(read(&self.table)?
            .rows
            .values()
            .find(|p| p.sku == sku)
            .cloned())
    }

    async fn find_by_category(&self, category: &str) -> RepoResult<Vec<Product>> {
        let wanted = category.to_lowercase();
        Ok(read(&self.table)?.select(|p| {
            p.category
                .as_deref()
                .is_some_and(|c| c.to_lowercase() == wanted)
        }))
    }

    async fn find_by_keyword(&self, keyword: &str) -> RepoResult<Vec<Product>> {
        let needle = keyword.to_lowercase();
        Ok(read(&self.table)?.select(|p| {
            contains_ignore_case(&p.name, &needle)
                || p.description
                    .as_deref()
                    .is_some_and(|d| contains_ignore_case(d, &needle))
                || p.category
                    .as_deref()
                    .is_some_and(|c| contains_ignore_case(c, &needle))
                || contains_ignore_case(&p.sku, &needle)
        }))
    }

    async fn find_available(&self) -> RepoResult<Vec<Product>> {
        Ok(read(&self.table)?.select(|p| p.available))
    }

    async fn find_by_price_between(&self, min: f64, max: f64) -> RepoResult<Vec<Product>> {
        Ok(read(&self.table)?.select(|p| p.price >= min && p.price <= max))
    }

    async fn adjust_stock(&self, id: i64, delta: i32) -> RepoResult<Option<Product>> {
        let mut table = write(&self.table)?;
        let Some(slot) = table.rows.get_mut(&id) else {
            return Ok(None);
        };
        let mut next = slot.clone();
        next.apply_stock_delta(delta)?;
        next.audit = slot.audit.touched(Utc::now());
        *slot = next.clone();
        Ok(Some(next))
    }
}

#[derive(Debug, Default)]
pub struct MemoryCategoryRepository {
    table: RwLock<Table<Category>>,
}

impl MemoryCategoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CategoryRepository for MemoryCategoryRepository {
    async fn insert(&self, category: NewCategory) -> RepoResult<Category> {
        let mut table = write(&self.table)?;
        if table.rows.values().any(|c| c.code == category.code) {
            return Err(RepositoryError::Conflict(format!("code {}", category.code)));
        }
        let id = table.allocate_id();
        let stored = category.into_category(id, Utc::now());
        table.rows.insert(id, stored.clone());
        Ok(stored)
    }

    async fn save(&self, mut category: Category) -> RepoResult<Category> {
        let mut table = write(&self.table)?;
        if table
            .rows
            .values()
            .any(|c| c.code == category.code && c.id != category.id)
        {
            return Err(RepositoryError::Conflict(format!("code {}", category.code)));
        }
        let slot = table
            .rows
            .get_mut(&category.id)
            .ok_or(RepositoryError::NotFound(category.id))?;
        category.audit = slot.audit.touched(Utc::now());
        *slot = category.clone();
        Ok(category)
    }

    async fn find_by_id(&self, id: i64) -> RepoResult<Option<Category>> {
        Ok(read(&self.table)?.rows.get(&id).cloned())
    }

    async fn find_all(&self) -> RepoResult<Vec<Category>> {
        Ok(read(&self.table)?.select(|_| true))
    }

    async fn delete_by_id(&self, id: i64) -> RepoResult<bool> {
        Ok(write(&self.table)?.rows.remove(&id).is_some())
    }

    async fn exists_by_id(&self, id: i64) -> RepoResult<bool> {
        Ok(read(&self.table)?.rows.contains_key(&id))
    }

    async fn exists_by_code(&self, code: &str) -> RepoResult<bool> {
        Ok(read(&self.table)?.rows.values().any(|c| c.code == code))
    }

    async fn find_by_code(&self, code: &str) -> RepoResult<Option<Category>> {
        Ok(read(&self.table)?
            .rows
            .values()
            .find(|c| c.code == code)
            .cloned())
    }
}
