// handlers/protected/users.rs - /v1/users[/:uuid]

use axum::extract::{Path, Query, State};
use validator::Validate;

use super::resource::{self, IndexParams};
use crate::auth::hash_password;
use crate::collection::Collection;
use crate::database::models::{User, UserDraft, UserPayload};
use crate::database::scope::Scope;
use crate::error::{validate_all, ApiError};
use crate::middleware::{ApiResponse, ApiResult, Payload};
use crate::state::AppState;

pub async fn index(State(state): State<AppState>, Query(params): Query<IndexParams>) -> ApiResult<Collection<User>> {
    let collection =
        resource::index(&*state.users, &params, state.config.collection.default_limit, vec![Scope::Active]).await?;
    Ok(ApiResponse::success(collection))
}

pub async fn show(State(state): State<AppState>, Path(uuid): Path<String>) -> ApiResult<User> {
    let user = resource::find_active(&*state.users, &uuid).await?;
    Ok(ApiResponse::success(user))
}

/**
 * POST /v1/users - Register a user
 *
 * New users are guests with a generated uuid and auth key. A supplied
 * password is stored hashed.
 *
 * Expected Input:
 * ```json
 * { "firstName": "Ada", "lastName": "Lovelace", "email": "ada@example.com", "password": "secret1" }
 * ```
 */
pub async fn create(State(state): State<AppState>, Payload(mut draft): Payload<UserDraft>) -> ApiResult<User> {
    if let Some(email) = &draft.email {
        resource::ensure_unique(&*state.users, email, None).await?;
    }

    let draft_check = draft.validate();
    let password = draft.password.take();
    let mut user = User::from_draft(draft);
    validate_all([draft_check, user.validate()])?;

    if let Some(password) = password {
        user.password = hash_password(password).await?;
    }

    let created = state.users.insert(&user).await?;
    tracing::info!("User#{} created", created.uuid);
    Ok(ApiResponse::created(created))
}

pub async fn update(
    State(state): State<AppState>,
    Path(uuid): Path<String>,
    Payload(mut payload): Payload<UserPayload>,
) -> ApiResult<User> {
    let mut user = resource::find_unscoped(&*state.users, &uuid).await?;

    if payload.is_empty() {
        return Err(ApiError::malformed_payload());
    }
    payload.validate()?;
    if !payload.passwords_match() {
        return Err(ApiError::bad_request("Passwords must match."));
    }

    if let Some(email) = &payload.email {
        resource::ensure_unique(&*state.users, email, Some(&user)).await?;
    }

    if let Some(password) = payload.password.take() {
        user.password = hash_password(password).await?;
    }
    user.apply(payload);

    let updated = state.users.update(&user).await?;
    Ok(ApiResponse::success(updated))
}

pub async fn destroy(State(state): State<AppState>, Path(uuid): Path<String>) -> ApiResult<()> {
    resource::destroy(&*state.users, &uuid).await?;
    Ok(ApiResponse::no_content())
}

pub async fn restore(State(state): State<AppState>, Path(uuid): Path<String>) -> ApiResult<User> {
    let user = resource::restore(&*state.users, &uuid).await?;
    Ok(ApiResponse::success(user))
}
