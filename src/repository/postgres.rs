use async_trait::async_trait;
use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::sea_query::{Expr, Func, LockType};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DbErr, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, SqlErr, TransactionTrait,
};

use super::{CategoryRepository, ProductRepository, RepoResult, RepositoryError};
use crate::{
    db::OrmConn,
    entity::{
        categories::{
            ActiveModel as CategoryActive, Column as CategoryColumn, Model as CategoryModel,
        },
        products::{ActiveModel as ProductActive, Column, Model as ProductModel},
        Categories, Products,
    },
    models::{AuditFields, Category, NewCategory, NewProduct, Product},
};

/// Maps unique-key violations to `Conflict` and missing update targets to `NotFound`.
fn map_write_err(err: DbErr, id: Option<i64>) -> RepositoryError {
    if let Some(SqlErr::UniqueConstraintViolation(detail)) = err.sql_err() {
        return RepositoryError::Conflict(detail);
    }
    match (err, id) {
        (DbErr::RecordNotUpdated, Some(id)) => RepositoryError::NotFound(id),
        (err, _) => RepositoryError::Orm(err),
    }
}

/// `%`, `_` and `\` in user input are matched literally.
fn ilike_pattern(keyword: &str) -> String {
    let mut escaped = String::with_capacity(keyword.len() + 2);
    escaped.push('%');
    for ch in keyword.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped.push('%');
    escaped
}

pub struct PgProductRepository {
    orm: OrmConn,
}

impl PgProductRepository {
    pub fn new(orm: OrmConn) -> Self {
        Self { orm }
    }
}

#[async_trait]
impl ProductRepository for PgProductRepository {
    async fn insert(&self, product: NewProduct) -> RepoResult<Product> {
        let now = Utc::now();
        let active = ProductActive {
            id: NotSet,
            name: Set(product.name),
            description: Set(product.description),
            sku: Set(product.sku),
            price: Set(product.price),
            stock_quantity: Set(product.stock_quantity),
            category: Set(product.category),
            available: Set(product.available),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };
        let model = active
            .insert(&self.orm)
            .await
            .map_err(|err| map_write_err(err, None))?;
        Ok(product_from_entity(model))
    }

    async fn save(&self, product: Product) -> RepoResult<Product> {
        let id = product.id;
        let active = ProductActive {
            id: Set(product.id),
            name: Set(product.name),
            description: Set(product.description),
            sku: Set(product.sku),
            price: Set(product.price),
            stock_quantity: Set(product.stock_quantity),
            category: Set(product.category),
            available: Set(product.available),
            created_at: NotSet,
            updated_at: Set(Utc::now().into()),
        };
        let model = active
            .update(&self.orm)
            .await
            .map_err(|err| map_write_err(err, Some(id)))?;
        Ok(product_from_entity(model))
    }

    async fn find_by_id(&self, id: i64) -> RepoResult<Option<Product>> {
        let model = Products::find_by_id(id).one(&self.orm).await?;
        Ok(model.map(product_from_entity))
    }

    async fn find_all(&self) -> RepoResult<Vec<Product>> {
        let items = Products::find()
            .order_by_asc(Column::Id)
            .all(&self.orm)
            .await?
            .into_iter()
            .map(product_from_entity)
            .collect();
        Ok(items)
    }

    async fn delete_by_id(&self, id: i64) -> RepoResult<bool> {
        let result = Products::delete_by_id(id).exec(&self.orm).await?;
        Ok(result.rows_affected > 0)
    }

    async fn exists_by_id(&self, id: i64) -> RepoResult<bool> {
        let count = Products::find_by_id(id).count(&self.orm).await?;
        Ok(count > 0)
    }

    async fn exists_by_sku(&self, sku: &str) -> RepoResult<bool> {
        let count = Products::find()
            .filter(Column::Sku.eq(sku))
            .count(&self.orm)
            .await?;
        Ok(count > 0)
    }

    async fn find_by_sku(&self, sku: &str) -> RepoResult<Option<Product>> {
        let model = Products::find()
            .filter(Column::Sku.eq(sku))
            .one(&self.orm)
            .await?;
        Ok(model.map(product_from_entity))
    }

    async fn find_by_category(&self, category: &str) -> RepoResult<Vec<Product>> {
        let lowered = Expr::expr(Func::lower(Expr::col(Column::Category)));
        self.select(Condition::all().add(lowered.eq(category.to_lowercase())))
            .await
    }

    async fn find_by_keyword(&self, keyword: &str) -> RepoResult<Vec<Product>> {
        let pattern = ilike_pattern(keyword);
        let condition = Condition::any()
            .add(Expr::col(Column::Name).ilike(pattern.clone()))
            .add(Expr::col(Column::Description).ilike(pattern.clone()))
            .add(Expr::col(Column::Category).ilike(pattern.clone()))
            .add(Expr::col(Column::Sku).ilike(pattern));
        self.select(condition).await
    }

    async fn find_available(&self) -> RepoResult<Vec<Product>> {
        self.select(Condition::all().add(Column::Available.eq(true)))
            .await
    }

    async fn find_by_price_between(&self, min: f64, max: f64) -> RepoResult<Vec<Product>> {
        self.select(Condition::all().add(Column::Price.between(min, max)))
            .await
    }

    async fn adjust_stock(&self, id: i64, delta: i32) -> RepoResult<Option<Product>> {
        // Row stays locked until commit; an early return drops the transaction and rolls back.
        let txn = self.orm.begin().await?;
        let model = Products::find_by_id(id)
            .lock(LockType::Update)
            .one(&txn)
            .await?;
        let model = match model {
            Some(m) => m,
            None => return Ok(None),
        };

        let mut product = product_from_entity(model.clone());
        product.apply_stock_delta(delta)?;

        let mut active: ProductActive = model.into();
        active.stock_quantity = Set(product.stock_quantity);
        active.updated_at = Set(Utc::now().into());
        let updated = active.update(&txn).await?;

        txn.commit().await?;
        Ok(Some(product_from_entity(updated)))
    }
}

impl PgProductRepository {
    async fn select(&self, condition: Condition) -> RepoResult<Vec<Product>> {
        let items = Products::find()
            .filter(condition)
            .order_by_asc(Column::Id)
            .all(&self.orm)
            .await?
            .into_iter()
            .map(product_from_entity)
            .collect();
        Ok(items)
    }
}

pub struct PgCategoryRepository {
    orm: OrmConn,
}

impl PgCategoryRepository {
    pub fn new(orm: OrmConn) -> Self {
        Self { orm }
    }
}

#[async_trait]
impl CategoryRepository for PgCategoryRepository {
    async fn insert(&self, category: NewCategory) -> RepoResult<Category> {
        let now = Utc::now();
        let active = CategoryActive {
            id: NotSet,
            name: Set(category.name),
            code: Set(category.code),
            description: Set(category.description),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };
        let model = active
            .insert(&self.orm)
            .await
            .map_err(|err| map_write_err(err, None))?;
        Ok(category_from_entity(model))
    }

    async fn save(&self, category: Category) -> RepoResult<Category> {
        let id = category.id;
        let active = CategoryActive {
            id: Set(category.id),
            name: Set(category.name),
            code: Set(category.code),
            description: Set(category.description),
            created_at: NotSet,
            updated_at: Set(Utc::now().into()),
        };
        let model = active
            .update(&self.orm)
            .await
            .map_err(|err| map_write_err(err, Some(id)))?;
        Ok(category_from_entity(model))
    }

    async fn find_by_id(&self, id: i64) -> RepoResult<Option<Category>> {
        let model = Categories::find_by_id(id).one(&self.orm).await?;
        Ok(model.map(category_from_entity))
    }

    async fn find_all(&self) -> RepoResult<Vec<Category>> {
        let items = Categories::find()
            .order_by_asc(CategoryColumn::Id)
            .all(&self.orm)
            .await?
            .into_iter()
            .map(category_from_entity)
            .collect();
        Ok(items)
    }

    async fn delete_by_id(&self, id: i64) -> RepoResult<bool> {
        let result = Categories::delete_by_id(id).exec(&self.orm).await?;
        Ok(result.rows_affected > 0)
    }

    async fn exists_by_id(&self, id: i64) -> RepoResult<bool> {
        let count = Categories::find_by_id(id).count(&self.orm).await?;
        Ok(count > 0)
    }

    async fn exists_by_code(&self, code: &str) -> RepoResult<bool> {
        let count = Categories::find()
            .filter(CategoryColumn::Code.eq(code))
            .count(&self.orm)
            .await?;
        Ok(count > 0)
    }

    async fn find_by_code(&self, code: &str) -> RepoResult<Option<Category>> {
        let model = Categories::find()
            .filter(CategoryColumn::Code.eq(code))
            .one(&self.orm)
            .await?;
        Ok(model.map(category_from_entity))
    }
}

fn product_from_entity(model: ProductModel) -> Product {
    Product {
        id: model.id,
        name: model.name,
        description: model.description,
        sku: model.sku,
        price: model.price,
        stock_quantity: model.stock_quantity,
        category: model.category,
        available: model.available,
        audit: AuditFields {
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        },
    }
}

fn category_from_entity(model: CategoryModel) -> Category {
    Category {
        id: model.id,
        name: model.name,
        code: model.code,
        description: model.description,
        audit: AuditFields {
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        },
    }
}
