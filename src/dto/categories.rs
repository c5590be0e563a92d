use serde::Deserialize;
use utoipa::ToSchema;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateCategoryRequest {
    pub name: String,
    pub code: String,
    pub description: Option<String>,
}

/// `code` is fixed at creation; one sent here is ignored.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdateCategoryRequest {
    pub name: String,
    pub description: Option<String>,
}
