use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, patch},
};

use crate::{
    dto::products::{
        CreateProductRequest, KeywordQuery, PriceRangeQuery, StockAdjustRequest,
        UpdateProductRequest,
    },
    error::{AppError, AppResult},
    middleware::{AppJson, AppPath, AppQuery},
    models::Product,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_products).post(create_product))
        .route("/search", get(search_products))
        .route("/available", get(list_available_products))
        .route("/price-range", get(list_products_by_price))
        .route("/category/{category}", get(list_products_by_category))
        .route("/sku/{sku}", get(get_product_by_sku))
        .route(
            "/{id}",
            get(get_product).put(update_product).delete(delete_product),
        )
        .route("/{id}/stock", patch(adjust_stock))
}

#[utoipa::path(
    get,
    path = "/api/v1/products",
    responses(
        (status = 200, description = "List products", body = Vec<Product>)
    ),
    tag = "Products"
)]
pub async fn list_products(State(state): State<AppState>) -> AppResult<Json<Vec<Product>>> {
    Ok(Json(state.products.find_all().await?))
}

#[utoipa::path(
    get,
    path = "/api/v1/products/{id}",
    params(
        ("id" = i64, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Get product", body = Product),
        (status = 404, description = "Product not found"),
    ),
    tag = "Products"
)]
pub async fn get_product(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
) -> AppResult<Json<Product>> {
    match state.products.find_by_id(id).await? {
        Some(product) => Ok(Json(product)),
        None => Err(AppError::NotFound(format!("Product not found with id: {id}"))),
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/products",
    request_body = CreateProductRequest,
    responses(
        (status = 201, description = "Create product", body = Product),
        (status = 400, description = "SKU already exists or invalid field"),
    ),
    tag = "Products"
)]
pub async fn create_product(
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateProductRequest>,
) -> AppResult<(StatusCode, Json<Product>)> {
    let product = state.products.create(payload).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

#[utoipa::path(
    put,
    path = "/api/v1/products/{id}",
    params(
        ("id" = i64, Path, description = "Product ID")
    ),
    request_body = UpdateProductRequest,
    responses(
        (status = 200, description = "Updated product", body = Product),
        (status = 400, description = "Invalid field"),
        (status = 404, description = "Product not found"),
    ),
    tag = "Products"
)]
pub async fn update_product(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
    AppJson(payload): AppJson<UpdateProductRequest>,
) -> AppResult<Json<Product>> {
    Ok(Json(state.products.update(id, payload).await?))
}

#[utoipa::path(
    delete,
    path = "/api/v1/products/{id}",
    params(
        ("id" = i64, Path, description = "Product ID")
    ),
    responses(
        (status = 204, description = "Deleted product"),
        (status = 404, description = "Product not found"),
    ),
    tag = "Products"
)]
pub async fn delete_product(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
) -> AppResult<StatusCode> {
    state.products.delete_by_id(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/v1/products/search",
    params(KeywordQuery),
    responses(
        (status = 200, description = "Products matching the keyword", body = Vec<Product>)
    ),
    tag = "Products"
)]
pub async fn search_products(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<KeywordQuery>,
) -> AppResult<Json<Vec<Product>>> {
    Ok(Json(state.products.find_by_keyword(&query.keyword).await?))
}

#[utoipa::path(
    get,
    path = "/api/v1/products/category/{category}",
    params(
        ("category" = String, Path, description = "Category label, case-insensitive")
    ),
    responses(
        (status = 200, description = "Products in the category", body = Vec<Product>)
    ),
    tag = "Products"
)]
pub async fn list_products_by_category(
    State(state): State<AppState>,
    AppPath(category): AppPath<String>,
) -> AppResult<Json<Vec<Product>>> {
    Ok(Json(state.products.find_by_category(&category).await?))
}

#[utoipa::path(
    get,
    path = "/api/v1/products/sku/{sku}",
    params(
        ("sku" = String, Path, description = "Stock keeping unit")
    ),
    responses(
        (status = 200, description = "Get product by SKU", body = Product),
        (status = 404, description = "Product not found"),
    ),
    tag = "Products"
)]
pub async fn get_product_by_sku(
    State(state): State<AppState>,
    AppPath(sku): AppPath<String>,
) -> AppResult<Json<Product>> {
    match state.products.find_by_sku(&sku).await? {
        Some(product) => Ok(Json(product)),
        None => Err(AppError::NotFound(format!("Product not found with SKU: {sku}"))),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/products/available",
    responses(
        (status = 200, description = "Products flagged as available", body = Vec<Product>)
    ),
    tag = "Products"
)]
pub async fn list_available_products(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<Product>>> {
    Ok(Json(state.products.find_available().await?))
}

#[utoipa::path(
    get,
    path = "/api/v1/products/price-range",
    params(PriceRangeQuery),
    responses(
        (status = 200, description = "Products priced within the range", body = Vec<Product>),
        (status = 400, description = "Invalid range"),
    ),
    tag = "Products"
)]
pub async fn list_products_by_price(
    State(state): State<AppState>,
    AppQuery(range): AppQuery<PriceRangeQuery>,
) -> AppResult<Json<Vec<Product>>> {
    Ok(Json(
        state
            .products
            .find_by_price_between(range.min, range.max)
            .await?,
    ))
}

#[utoipa::path(
    patch,
    path = "/api/v1/products/{id}/stock",
    params(
        ("id" = i64, Path, description = "Product ID")
    ),
    request_body = StockAdjustRequest,
    responses(
        (status = 200, description = "Stock adjusted", body = Product),
        (status = 400, description = "Zero delta or insufficient stock"),
        (status = 404, description = "Product not found"),
    ),
    tag = "Products"
)]
pub async fn adjust_stock(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
    AppJson(payload): AppJson<StockAdjustRequest>,
) -> AppResult<Json<Product>> {
    Ok(Json(state.products.adjust_stock(id, payload.delta).await?))
}
