// handlers/protected/statements.rs - /v1/statements[/:uuid]

use axum::extract::{Path, Query, State};
use validator::Validate;

use super::resource::{self, IndexParams};
use crate::collection::Collection;
use crate::database::models::{Category, Statement, StatementPayload};
use crate::database::scope::Scope;
use crate::error::{validate_all, ApiError};
use crate::middleware::{ApiResponse, ApiResult, Payload};
use crate::state::AppState;

/**
 * GET /v1/statements - Paginated listing
 *
 * `?scope=random` returns up to one page of statements in random order,
 * `?scope=randomPick` a single random statement. Both ignore `page` and
 * `orderBy` and report a single page holding exactly the returned rows.
 */
pub async fn index(
    State(state): State<AppState>,
    Query(params): Query<IndexParams>,
) -> ApiResult<Collection<Statement>> {
    let limit = state.config.collection.default_limit;
    let store = &*state.statements;

    let collection = match params.scope() {
        Some("random") => resource::random(store, limit, limit).await?,
        Some("randomPick") => resource::random(store, limit, 1).await?,
        _ => resource::index(store, &params, limit, vec![Scope::Active]).await?,
    };
    Ok(ApiResponse::success(collection))
}

pub async fn show(State(state): State<AppState>, Path(uuid): Path<String>) -> ApiResult<Statement> {
    let statement = resource::find_active(&*state.statements, &uuid).await?;
    Ok(ApiResponse::success(statement))
}

/**
 * POST /v1/statements - Create a statement under an existing category
 *
 * Expected Input:
 * ```json
 * { "body": "Water boils at 100 degrees.", "category": "<category uuid>" }
 * ```
 *
 * A missing `category` is a bad request; one that does not resolve is `404`.
 */
pub async fn create(
    State(state): State<AppState>,
    Payload(payload): Payload<StatementPayload>,
) -> ApiResult<Statement> {
    if let Some(body) = &payload.body {
        resource::ensure_unique(&*state.statements, body, None).await?;
    }

    let Some(category_uuid) = payload.category else {
        return Err(ApiError::bad_request("Could not create resource, Category#<UUID> missing."));
    };
    let category = resource::find_active::<Category>(&*state.categories, &category_uuid).await?;

    let statement = Statement::new(payload.body.unwrap_or_default(), category);
    validate_all([statement.validate()])?;

    let created = state.statements.insert(&statement).await?;
    tracing::info!("Statement#{} created in Category#{}", created.uuid, created.category.uuid);
    Ok(ApiResponse::created(created))
}

pub async fn update(
    State(state): State<AppState>,
    Path(uuid): Path<String>,
    Payload(payload): Payload<StatementPayload>,
) -> ApiResult<Statement> {
    let mut statement = resource::find_unscoped(&*state.statements, &uuid).await?;

    if payload.is_empty() {
        return Err(ApiError::malformed_payload());
    }
    payload.validate()?;

    if let Some(body) = payload.body {
        resource::ensure_unique(&*state.statements, &body, Some(&statement)).await?;
        statement.body = body;
    }
    if let Some(category_uuid) = payload.category {
        let category = resource::find_active::<Category>(&*state.categories, &category_uuid).await?;
        statement.assign(category);
    }

    let updated = state.statements.update(&statement).await?;
    Ok(ApiResponse::success(updated))
}

pub async fn destroy(State(state): State<AppState>, Path(uuid): Path<String>) -> ApiResult<()> {
    resource::destroy(&*state.statements, &uuid).await?;
    Ok(ApiResponse::no_content())
}

pub async fn restore(State(state): State<AppState>, Path(uuid): Path<String>) -> ApiResult<Statement> {
    let statement = resource::restore(&*state.statements, &uuid).await?;
    Ok(ApiResponse::success(statement))
}
