//! Category handlers.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;

use jdesk_firestore::CategoryRepository;
use jdesk_models::{Category, CategoryId};

use crate::auth::AdminUser;
use crate::error::{ApiError, ApiResult};
use crate::security::{sanitize_line, MAX_NAME_LENGTH};
use crate::state::AppState;

/// Category list response.
#[derive(Serialize)]
pub struct CategoryListResponse {
    pub success: bool,
    pub categories: Vec<Category>,
}

/// Single category response.
#[derive(Serialize)]
pub struct CategoryResponse {
    pub success: bool,
    pub category: Category,
}

/// Deletion acknowledgement.
#[derive(Serialize)]
pub struct CategoryDeletedResponse {
    pub success: bool,
    pub id: String,
}

/// GET /api/categories
pub async fn list_categories(
    State(state): State<AppState>,
) -> ApiResult<Json<CategoryListResponse>> {
    let categories = CategoryRepository::new((*state.firestore).clone())
        .list()
        .await?;

    Ok(Json(CategoryListResponse {
        success: true,
        categories,
    }))
}

/// Create-category request.
#[derive(Debug, Deserialize)]
pub struct CreateCategoryRequest {
    #[serde(default)]
    pub name: String,
}

/// POST /api/admin/categories
pub async fn create_category(
    State(state): State<AppState>,
    admin: AdminUser,
    Json(request): Json<CreateCategoryRequest>,
) -> ApiResult<(StatusCode, Json<CategoryResponse>)> {
    let name = sanitize_line(&request.name, MAX_NAME_LENGTH);
    if name.is_empty() {
        return Err(ApiError::validation("Name is required"));
    }

    let repo = CategoryRepository::new((*state.firestore).clone());

    // Slug collision means the category effectively exists already
    let category = Category::new(name);
    let existing = repo.list().await?;
    if existing.iter().any(|c| c.slug == category.slug) {
        return Err(ApiError::duplicate(format!(
            "Category '{}' already exists",
            category.name
        )));
    }

    repo.create(&category).await?;

    info!("Admin {} created category {}", admin.0.id, category.id);

    Ok((
        StatusCode::CREATED,
        Json(CategoryResponse {
            success: true,
            category,
        }),
    ))
}

/// DELETE /api/admin/categories/:category_id
pub async fn delete_category(
    State(state): State<AppState>,
    admin: AdminUser,
    Path(category_id): Path<String>,
) -> ApiResult<Json<CategoryDeletedResponse>> {
    let category_id = CategoryId::from(category_id);
    CategoryRepository::new((*state.firestore).clone())
        .delete(&category_id)
        .await?;

    info!("Admin {} deleted category {}", admin.0.id, category_id);

    Ok(Json(CategoryDeletedResponse {
        success: true,
        id: category_id.to_string(),
    }))
}
