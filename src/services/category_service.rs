use std::sync::Arc;

use super::validation;
use crate::{
    dto::categories::{CreateCategoryRequest, UpdateCategoryRequest},
    error::{AppError, AppResult},
    models::{Category, NewCategory},
    repository::{CategoryRepository, RepositoryError},
};

fn not_found(id: i64) -> AppError {
    AppError::NotFound(format!("Category not found with id: {id}"))
}

fn duplicate_code(code: &str) -> AppError {
    AppError::Validation(format!("Category with code {code} already exists"))
}

#[derive(Clone)]
pub struct CategoryService {
    repo: Arc<dyn CategoryRepository>,
}

impl CategoryService {
    pub fn new(repo: Arc<dyn CategoryRepository>) -> Self {
        Self { repo }
    }

    pub async fn find_all(&self) -> AppResult<Vec<Category>> {
        tracing::info!("fetching all categories");
        Ok(self.repo.find_all().await?)
    }

    pub async fn find_by_id(&self, id: i64) -> AppResult<Option<Category>> {
        tracing::info!(id, "fetching category");
        Ok(self.repo.find_by_id(id).await?)
    }

    pub async fn find_by_code(&self, code: &str) -> AppResult<Option<Category>> {
        tracing::info!(code, "fetching category by code");
        Ok(self.repo.find_by_code(code).await?)
    }

    pub async fn create(&self, payload: CreateCategoryRequest) -> AppResult<Category> {
        tracing::info!(name = %payload.name, code = %payload.code, "creating category");

        let draft = NewCategory {
            name: validation::required_text("Name", &payload.name)?,
            code: validation::required_text("Code", &payload.code)?,
            description: validation::description(payload.description)?,
        };

        if self.repo.exists_by_code(&draft.code).await? {
            tracing::warn!(code = %draft.code, "duplicate category code rejected");
            return Err(duplicate_code(&draft.code));
        }

        let code = draft.code.clone();
        match self.repo.insert(draft).await {
            Ok(category) => Ok(category),
            Err(RepositoryError::Conflict(_)) => Err(duplicate_code(&code)),
            Err(err) => Err(err.into()),
        }
    }

    /// Replaces name and description. `id` and `code` are kept.
    pub async fn update(&self, id: i64, payload: UpdateCategoryRequest) -> AppResult<Category> {
        tracing::info!(id, "updating category");

        let mut category = self.repo.find_by_id(id).await?.ok_or_else(|| not_found(id))?;
        category.name = validation::required_text("Name", &payload.name)?;
        category.description = validation::description(payload.description)?;

        let code = category.code.clone();
        match self.repo.save(category).await {
            Ok(saved) => Ok(saved),
            Err(RepositoryError::NotFound(_)) => Err(not_found(id)),
            Err(RepositoryError::Conflict(_)) => Err(duplicate_code(&code)),
            Err(err) => Err(err.into()),
        }
    }

    pub async fn delete_by_id(&self, id: i64) -> AppResult<()> {
        tracing::info!(id, "deleting category");

        if !self.repo.exists_by_id(id).await? {
            return Err(not_found(id));
        }
        if !self.repo.delete_by_id(id).await? {
            return Err(not_found(id));
        }
        Ok(())
    }
}
