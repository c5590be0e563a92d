use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::get,
};

use crate::{
    dto::categories::{CreateCategoryRequest, UpdateCategoryRequest},
    error::{AppError, AppResult},
    middleware::{AppJson, AppPath},
    models::Category,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_categories).post(create_category))
        .route("/code/{code}", get(get_category_by_code))
        .route(
            "/{id}",
            get(get_category).put(update_category).delete(delete_category),
        )
}

#[utoipa::path(
    get,
    path = "/api/v1/categories",
    responses(
        (status = 200, description = "List categories", body = Vec<Category>)
    ),
    tag = "Categories"
)]
pub async fn list_categories(State(state): State<AppState>) -> AppResult<Json<Vec<Category>>> {
    Ok(Json(state.categories.find_all().await?))
}

#[utoipa::path(
    get,
    path = "/api/v1/categories/{id}",
    params(
        ("id" = i64, Path, description = "Category ID")
    ),
    responses(
        (status = 200, description = "Get category", body = Category),
        (status = 404, description = "Category not found"),
    ),
    tag = "Categories"
)]
pub async fn get_category(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
) -> AppResult<Json<Category>> {
    match state.categories.find_by_id(id).await? {
        Some(category) => Ok(Json(category)),
        None => Err(AppError::NotFound(format!("Category not found with id: {id}"))),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/categories/code/{code}",
    params(
        ("code" = String, Path, description = "Category code")
    ),
    responses(
        (status = 200, description = "Get category by code", body = Category),
        (status = 404, description = "Category not found"),
    ),
    tag = "Categories"
)]
pub async fn get_category_by_code(
    State(state): State<AppState>,
    AppPath(code): AppPath<String>,
) -> AppResult<Json<Category>> {
    match state.categories.find_by_code(&code).await? {
        Some(category) => Ok(Json(category)),
        None => Err(AppError::NotFound(format!(
            "Category not found with code: {code}"
        ))),
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/categories",
    request_body = CreateCategoryRequest,
    responses(
        (status = 201, description = "Create category", body = Category),
        (status = 400, description = "Code already exists or invalid field"),
    ),
    tag = "Categories"
)]
pub async fn create_category(
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateCategoryRequest>,
) -> AppResult<(StatusCode, Json<Category>)> {
    let category = state.categories.create(payload).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

#[utoipa::path(
    put,
    path = "/api/v1/categories/{id}",
    params(
        ("id" = i64, Path, description = "Category ID")
    ),
    request_body = UpdateCategoryRequest,
    responses(
        (status = 200, description = "Updated category", body = Category),
        (status = 404, description = "Category not found"),
    ),
    tag = "Categories"
)]
pub async fn update_category(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
    AppJson(payload): AppJson<UpdateCategoryRequest>,
) -> AppResult<Json<Category>> {
    Ok(Json(state.categories.update(id, payload).await?))
}

#[utoipa::path(
    delete,
    path = "/api/v1/categories/{id}",
    params(
        ("id" = i64, Path, description = "Category ID")
    ),
    responses(
        (status = 204, description = "Deleted category"),
        (status = 404, description = "Category not found"),
    ),
    tag = "Categories"
)]
pub async fn delete_category(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
) -> AppResult<StatusCode> {
    state.categories.delete_by_id(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
