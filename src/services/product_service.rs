use std::sync::Arc;

use super::validation;
use crate::{
    dto::products::{CreateProductRequest, UpdateProductRequest},
    error::{AppError, AppResult},
    models::{NewProduct, Product},
    repository::{ProductRepository, RepositoryError},
};

fn not_found(id: i64) -> AppError {
    AppError::NotFound(format!("Product not found with id: {id}"))
}

fn duplicate_sku(sku: &str) -> AppError {
    AppError::Validation(format!("Product with SKU {sku} already exists"))
}

/// Catalog rules for products, on top of any [`ProductRepository`].
#[derive(Clone)]
pub struct ProductService {
    repo: Arc<dyn ProductRepository>,
}

impl ProductService {
    pub fn new(repo: Arc<dyn ProductRepository>) -> Self {
        Self { repo }
    }

    pub async fn find_all(&self) -> AppResult<Vec<Product>> {
        tracing::info!("fetching all products");
        Ok(self.repo.find_all().await?)
    }

    pub async fn find_by_id(&self, id: i64) -> AppResult<Option<Product>> {
        tracing::info!(id, "fetching product");
        Ok(self.repo.find_by_id(id).await?)
    }

    pub async fn find_by_sku(&self, sku: &str) -> AppResult<Option<Product>> {
        tracing::info!(sku, "fetching product by sku");
        Ok(self.repo.find_by_sku(sku).await?)
    }

    pub async fn create(&self, payload: CreateProductRequest) -> AppResult<Product> {
        tracing::info!(name = %payload.name, sku = %payload.sku, "creating product");

        let draft = NewProduct {
            name: validation::required_text("Name", &payload.name)?,
            description: validation::description(payload.description)?,
            sku: validation::required_text("SKU", &payload.sku)?,
            price: validation::price(payload.price)?,
            stock_quantity: validation::stock_quantity(payload.stock_quantity)?,
            category: payload.category,
            available: payload.available,
        };

        if self.repo.exists_by_sku(&draft.sku).await? {
            tracing::warn!(sku = %draft.sku, "duplicate sku rejected");
            return Err(duplicate_sku(&draft.sku));
        }

        let sku = draft.sku.clone();
        match self.repo.insert(draft).await {
            Ok(product) => {
                tracing::info!(id = product.id, sku = %product.sku, "product created");
                Ok(product)
            }
            // Lost a race with a concurrent create of the same SKU.
            Err(RepositoryError::Conflict(_)) => Err(duplicate_sku(&sku)),
            Err(err) => Err(err.into()),
        }
    }

    /// Replaces every mutable field. `id`, `sku` and `created_at` are kept.
    pub async fn update(&self, id: i64, payload: UpdateProductRequest) -> AppResult<Product> {
        tracing::info!(id, "updating product");

        // A missing product is reported before anything about the payload.
        let mut product = self.repo.find_by_id(id).await?.ok_or_else(|| not_found(id))?;
        product.name = validation::required_text("Name", &payload.name)?;
        product.description = validation::description(payload.description)?;
        product.price = validation::price(payload.price)?;
        product.stock_quantity = validation::stock_quantity(payload.stock_quantity)?;
        product.category = payload.category;
        product.available = payload.available;

        self.persist(product).await
    }

    pub async fn delete_by_id(&self, id: i64) -> AppResult<()> {
        tracing::info!(id, "deleting product");

        if !self.repo.exists_by_id(id).await? {
            return Err(not_found(id));
        }
        if !self.repo.delete_by_id(id).await? {
            return Err(not_found(id));
        }
        Ok(())
    }

    pub async fn find_by_category(&self, category: &str) -> AppResult<Vec<Product>> {
        tracing::info!(category, "fetching products by category");
        Ok(self.repo.find_by_category(category).await?)
    }

    pub async fn find_by_keyword(&self, keyword: &str) -> AppResult<Vec<Product>> {
        tracing::info!(keyword, "searching products");
        Ok(self.repo.find_by_keyword(keyword).await?)
    }

    pub async fn find_available(&self) -> AppResult<Vec<Product>> {
        tracing::info!("fetching available products");
        Ok(self.repo.find_available().await?)
    }

    pub async fn find_by_price_between(&self, min: f64, max: f64) -> AppResult<Vec<Product>> {
        tracing::info!(min, max, "fetching products by price range");

        let min = validation::price(min)?;
        let max = validation::price(max)?;
        if min > max {
            return Err(AppError::Validation(
                "Minimum price must not exceed maximum price".into(),
            ));
        }
        Ok(self.repo.find_by_price_between(min, max).await?)
    }

    /// Receives (`delta > 0`) or withdraws (`delta < 0`) stock.
    pub async fn adjust_stock(&self, id: i64, delta: i32) -> AppResult<Product> {
        tracing::info!(id, delta, "adjusting product stock");

        if delta == 0 {
            return Err(AppError::Validation("delta must not be 0".into()));
        }

        match self.repo.adjust_stock(id, delta).await {
            Ok(Some(product)) => {
                tracing::info!(id, stock = ?product.stock_quantity, "product stock adjusted");
                Ok(product)
            }
            Ok(None) => Err(not_found(id)),
            Err(RepositoryError::Stock(err)) => {
                tracing::warn!(id, delta, error = %err, "stock adjustment refused");
                Err(err.into())
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn persist(&self, product: Product) -> AppResult<Product> {
        let id = product.id;
        let sku = product.sku.clone();
        match self.repo.save(product).await {
            Ok(saved) => Ok(saved),
            Err(RepositoryError::NotFound(_)) => Err(not_found(id)),
            Err(RepositoryError::Conflict(_)) => Err(duplicate_sku(&sku)),
            Err(err) => Err(err.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MemoryProductRepository;

    fn service() -> ProductService {
        ProductService::new(Arc::new(MemoryProductRepository::new()))
    }

    fn laptop() -> CreateProductRequest {
        CreateProductRequest {
            name: "Laptop".into(),
            description: None,
            sku: "LAP-001".into(),
            price: 999.99,
            stock_quantity: None,
            category: None,
            available: true,
        }
    }

    fn create(
        name: &str,
        sku: &str,
        description: Option<&str>,
        category: Option<&str>,
    ) -> CreateProductRequest {
        CreateProductRequest {
            name: name.into(),
            description: description.map(Into::into),
            sku: sku.into(),
            price: 10.0,
            stock_quantity: Some(1),
            category: category.map(Into::into),
            available: true,
        }
    }

    fn changes(name: &str, price: f64) -> UpdateProductRequest {
        UpdateProductRequest {
            name: name.into(),
            description: None,
            price,
            stock_quantity: None,
            category: None,
            available: true,
        }
    }

    #[tokio::test]
    async fn laptop_lifecycle() {
        let service = service();

        let created = service.create(laptop()).await.unwrap();
        assert_eq!(created.id, 1);
        assert_eq!(created.price, 999.99);

        let err = service.create(laptop()).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        let message = err.to_string();
        assert!(message.contains("SKU"));
        assert!(message.contains("already exists"));

        let updated = service
            .update(created.id, changes("Updated", 1099.99))
            .await
            .unwrap();
        assert_eq!(updated.name, "Updated");
        assert_eq!(updated.price, 1099.99);
        assert_eq!(updated.sku, "LAP-001");
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.audit.created_at, created.audit.created_at);

        service.delete_by_id(created.id).await.unwrap();
        assert!(service.find_by_id(created.id).await.unwrap().is_none());

        let err = service.delete_by_id(created.id).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        assert!(err.to_string().contains("not found"));
    }

    #[tokio::test]
    async fn negative_price_is_rejected_before_storage() {
        let service = service();
        let mut request = laptop();
        request.price = -100.0;

        let err = service.create(request).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert!(err.to_string().contains("Price"));
        assert!(service.find_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_rejects_negative_price() {
        let service = service();
        let created = service.create(laptop()).await.unwrap();
        let err = service
            .update(created.id, changes("Laptop", -1.0))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Price"));
        let stored = service.find_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(stored.price, 999.99);
    }

    #[tokio::test]
    async fn update_of_missing_product_is_not_found() {
        let err = service()
            .update(999, changes("Ghost", 1.0))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        assert!(err.to_string().contains("not found"));
    }

    #[tokio::test]
    async fn missing_product_wins_over_bad_payload() {
        let service = service();
        let err = service
            .update(999, changes("X", -1.0))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));

        let err = service.update(999, changes("  ", 1.0)).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn concurrent_withdrawals_never_oversell() {
        let service = service();
        let mut request = laptop();
        request.stock_quantity = Some(10);
        let id = service.create(request).await.unwrap().id;

        let handles: Vec<_> = (0..25)
            .map(|_| {
                let service = service.clone();
                tokio::spawn(async move { service.adjust_stock(id, -1).await })
            })
            .collect();

        let mut sold = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => sold += 1,
                Err(err) => assert!(err.to_string().contains("Insufficient stock")),
            }
        }
        assert_eq!(sold, 10);
        let stored = service.find_by_id(id).await.unwrap().unwrap();
        assert_eq!(stored.stock_quantity, Some(0));
    }

    #[tokio::test]
    async fn update_replaces_every_mutable_field() {
        let service = service();
        let mut request = laptop();
        request.description = Some("14 inch".into());
        request.stock_quantity = Some(3);
        request.category = Some("computers".into());
        let created = service.create(request).await.unwrap();

        let updated = service
            .update(
                created.id,
                UpdateProductRequest {
                    name: "Laptop Pro".into(),
                    description: None,
                    price: 1500.0,
                    stock_quantity: Some(7),
                    category: Some("premium".into()),
                    available: false,
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.description, None);
        assert_eq!(updated.stock_quantity, Some(7));
        assert_eq!(updated.category.as_deref(), Some("premium"));
        assert!(!updated.available);
        assert_eq!(updated.sku, "LAP-001");
    }

    #[tokio::test]
    async fn sku_is_marked_as_existing_after_create() {
        let repo = Arc::new(MemoryProductRepository::new());
        let service = ProductService::new(repo.clone());
        service.create(laptop()).await.unwrap();
        assert!(repo.exists_by_sku("LAP-001").await.unwrap());
        assert!(service.find_by_sku("LAP-001").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn keyword_search_spans_name_description_category_and_sku() {
        let service = service();
        service.create(create("iPhone 15", "APL-15", None, None)).await.unwrap();
        service
            .create(create("Case", "CASE-1", Some("Fits any PHONE"), None))
            .await
            .unwrap();
        service
            .create(create("Charger", "CHG-1", None, Some("Phone accessories")))
            .await
            .unwrap();
        service.create(create("Cable", "PHONE-USB", None, None)).await.unwrap();
        service
            .create(create("Laptop", "LAP-9", Some("No match"), Some("computers")))
            .await
            .unwrap();

        let found = service.find_by_keyword("phone").await.unwrap();
        let skus: Vec<_> = found.iter().map(|p| p.sku.as_str()).collect();
        assert_eq!(skus, ["APL-15", "CASE-1", "CHG-1", "PHONE-USB"]);
    }

    #[tokio::test]
    async fn blank_name_and_negative_stock_are_rejected() {
        let service = service();
        let mut request = laptop();
        request.name = "  ".into();
        assert!(service.create(request).await.is_err());

        let mut request = laptop();
        request.stock_quantity = Some(-2);
        let err = service.create(request).await.unwrap_err();
        assert!(err.to_string().contains("Stock"));
    }

    #[tokio::test]
    async fn price_range_validates_bounds() {
        let service = service();
        service.create(laptop()).await.unwrap();
        assert!(service.find_by_price_between(10.0, 1.0).await.is_err());
        assert!(service.find_by_price_between(-1.0, 1.0).await.is_err());
        assert_eq!(service.find_by_price_between(900.0, 1000.0).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn available_filter_skips_withdrawn_products() {
        let service = service();
        service.create(laptop()).await.unwrap();
        let mut hidden = create("Old", "OLD-1", None, None);
        hidden.available = false;
        service.create(hidden).await.unwrap();

        let available = service.find_available().await.unwrap();
        assert_eq!(available.len(), 1);
        assert_eq!(available[0].sku, "LAP-001");
    }

    #[tokio::test]
    async fn stock_adjustments_never_go_negative() {
        let service = service();
        let created = service.create(laptop()).await.unwrap();

        let received = service.adjust_stock(created.id, 5).await.unwrap();
        assert_eq!(received.stock_quantity, Some(5));

        let withdrawn = service.adjust_stock(created.id, -2).await.unwrap();
        assert_eq!(withdrawn.stock_quantity, Some(3));

        let err = service.adjust_stock(created.id, -4).await.unwrap_err();
        assert!(err.to_string().contains("Insufficient stock"));
        assert!(service.adjust_stock(created.id, 0).await.is_err());
        assert!(matches!(
            service.adjust_stock(42, 1).await.unwrap_err(),
            AppError::NotFound(_)
        ));
    }
}
