use utoipa::{OpenApi, openapi::OpenApi as OpenApiSpec};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{categories, products},
    models::{AuditFields, Category, Product},
    response::{ApiResponse, ErrorData},
    routes::{categories as category_routes, health, products as product_routes},
};

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        product_routes::list_products,
        product_routes::get_product,
        product_routes::create_product,
        product_routes::update_product,
        product_routes::delete_product,
        product_routes::search_products,
        product_routes::list_products_by_category,
        product_routes::get_product_by_sku,
        product_routes::list_available_products,
        product_routes::list_products_by_price,
        product_routes::adjust_stock,
        category_routes::list_categories,
        category_routes::get_category,
        category_routes::get_category_by_code,
        category_routes::create_category,
        category_routes::update_category,
        category_routes::delete_category
    ),
    components(
        schemas(
            AuditFields,
            Product,
            Category,
            products::CreateProductRequest,
            products::UpdateProductRequest,
            products::StockAdjustRequest,
            categories::CreateCategoryRequest,
            categories::UpdateCategoryRequest,
            health::HealthData,
            ApiResponse<health::HealthData>,
            ErrorData,
            ApiResponse<ErrorData>
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Products", description = "Product catalog endpoints"),
        (name = "Categories", description = "Category endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
