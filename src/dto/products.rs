use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

fn default_available() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateProductRequest {
    pub name: String,
    pub description: Option<String>,
    pub sku: String,
    pub price: f64,
    pub stock_quantity: Option<i32>,
    pub category: Option<String>,
    #[serde(default = "default_available")]
    pub available: bool,
}

/// Replacement values for every mutable product field.
/// A `sku` sent here is ignored; SKUs never change after creation.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdateProductRequest {
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub stock_quantity: Option<i32>,
    pub category: Option<String>,
    #[serde(default = "default_available")]
    pub available: bool,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct KeywordQuery {
    /// Matched against name, description, category and SKU.
    pub keyword: String,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PriceRangeQuery {
    pub min: f64,
    pub max: f64,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct StockAdjustRequest {
    /// Positive to receive stock, negative to withdraw it.
    pub delta: i32,
}
