// handlers/protected/categories.rs - /v1/categories[/:uuid]

use axum::extract::{Path, Query, State};
use validator::Validate;

use super::resource::{self, IndexParams};
use crate::collection::Collection;
use crate::database::models::{Category, CategoryDraft, CategoryPayload};
use crate::database::scope::Scope;
use crate::error::{validate_all, ApiError};
use crate::middleware::{ApiResponse, ApiResult, Payload};
use crate::state::AppState;

/// GET /v1/categories - `?scope=published` hides unpublished categories
pub async fn index(State(state): State<AppState>, Query(params): Query<IndexParams>) -> ApiResult<Collection<Category>> {
    let scopes = match params.scope() {
        Some("published") => vec![Scope::Active, Scope::Published],
        _ => vec![Scope::Active],
    };
    let collection =
        resource::index(&*state.categories, &params, state.config.collection.default_limit, scopes).await?;
    Ok(ApiResponse::success(collection))
}

pub async fn show(State(state): State<AppState>, Path(uuid): Path<String>) -> ApiResult<Category> {
    let category = resource::find_active(&*state.categories, &uuid).await?;
    Ok(ApiResponse::success(category))
}

pub async fn create(State(state): State<AppState>, Payload(draft): Payload<CategoryDraft>) -> ApiResult<Category> {
    if let Some(name) = &draft.name {
        resource::ensure_unique(&*state.categories, name, None).await?;
    }

    let category = Category::from_draft(draft);
    validate_all([category.validate()])?;

    let created = state.categories.insert(&category).await?;
    tracing::info!("Category#{} created", created.uuid);
    Ok(ApiResponse::created(created))
}

pub async fn update(
    State(state): State<AppState>,
    Path(uuid): Path<String>,
    Payload(payload): Payload<CategoryPayload>,
) -> ApiResult<Category> {
    let mut category = resource::find_unscoped(&*state.categories, &uuid).await?;

    if payload.is_empty() {
        return Err(ApiError::malformed_payload());
    }
    payload.validate()?;

    if let Some(name) = &payload.name {
        resource::ensure_unique(&*state.categories, name, Some(&category)).await?;
    }

    category.apply(payload);
    let updated = state.categories.update(&category).await?;
    Ok(ApiResponse::success(updated))
}

pub async fn destroy(State(state): State<AppState>, Path(uuid): Path<String>) -> ApiResult<()> {
    resource::destroy(&*state.categories, &uuid).await?;
    Ok(ApiResponse::no_content())
}

pub async fn restore(State(state): State<AppState>, Path(uuid): Path<String>) -> ApiResult<Category> {
    let category = resource::restore(&*state.categories, &uuid).await?;
    Ok(ApiResponse::success(category))
}
