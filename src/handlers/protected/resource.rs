// handlers/protected/resource.rs - Steps shared by every resource controller

use serde::Deserialize;

use crate::collection::Collection;
use crate::database::scope::{Scope, ACTIVE, UNSCOPED};
use crate::database::soft_delete::ensure_restorable;
use crate::database::{Lookup, Resource, ResourceStore};
use crate::error::ApiError;
use crate::filter::{FilterOrder, ListQuery, OrderSpec};

pub const DEFAULT_ORDER_BY: &str = "createdAt:asc";

/// Query string of every index endpoint.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct IndexParams {
    pub page: Option<String>,
    pub order_by: Option<String>,
    pub scope: Option<String>,
}

impl IndexParams {
    /// Requested page; `1` when absent, `0` when not a number.
    pub fn page(&self) -> i64 {
        match self.page.as_deref().filter(|p| !p.is_empty()) {
            Some(page) => page.parse().unwrap_or(0),
            None => 1,
        }
    }

    pub fn order(&self) -> OrderSpec {
        let expr = self
            .order_by
            .as_deref()
            .filter(|o| !o.is_empty())
            .unwrap_or(DEFAULT_ORDER_BY);
        FilterOrder::parse(expr)
    }

    pub fn scope(&self) -> Option<&str> {
        self.scope.as_deref().filter(|s| !s.is_empty())
    }
}

/// Count, paginate, order and fetch one page of `T`.
pub async fn index<T: Resource>(
    store: &dyn ResourceStore<T>,
    params: &IndexParams,
    limit: i64,
    scopes: Vec<Scope>,
) -> Result<Collection<T>, ApiError> {
    let count = store.count(&scopes).await?;
    let page = params.page();

    let mut collection = Collection::new(limit);
    collection.grab(Vec::new(), page, count);

    if collection.is_out_of_bounds() {
        tracing::debug!(
            "{} page {} is past the last page ({})",
            T::NAME,
            collection.pointer(),
            collection.meta().page_count
        );
        return Ok(collection);
    }

    let query = FilterOrder::apply(ListQuery::new(scopes), T::SORTABLE, &params.order())
        .limit(collection.limit(), collection.offset());
    let records = store.select(&query).await?;

    collection.grab(records, page, count);
    Ok(collection)
}

/// `count` random rows as a single page.
pub async fn random<T: Resource>(
    store: &dyn ResourceStore<T>,
    limit: i64,
    count: i64,
) -> Result<Collection<T>, ApiError> {
    let query = ListQuery::new(vec![Scope::Active, Scope::Random]).limit(count, 0);
    let records = store.select(&query).await?;

    let mut collection = Collection::new(limit);
    let len = records.len() as i64;
    collection.grab(records, 1, len);
    Ok(collection)
}

pub fn not_found<T: Resource>(uuid: &str) -> ApiError {
    ApiError::not_found(format!("{}#{} not found.", T::NAME, uuid))
}

/// Visible (not soft-deleted) row by public id.
pub async fn find_active<T: Resource>(store: &dyn ResourceStore<T>, uuid: &str) -> Result<T, ApiError> {
    store
        .find(&Lookup::uuid(uuid), ACTIVE)
        .await?
        .ok_or_else(|| not_found::<T>(uuid))
}

/// Any row by public id, soft-deleted or not.
pub async fn find_unscoped<T: Resource>(store: &dyn ResourceStore<T>, uuid: &str) -> Result<T, ApiError> {
    store
        .find(&Lookup::uuid(uuid), UNSCOPED)
        .await?
        .ok_or_else(|| not_found::<T>(uuid))
}

/// Natural keys are unique across every row, deleted ones included.
/// `owner` is the row allowed to already hold the key (on update).
pub async fn ensure_unique<T: Resource>(
    store: &dyn ResourceStore<T>,
    key: &str,
    owner: Option<&T>,
) -> Result<(), ApiError> {
    let Some(existing) = store.find(&Lookup::key(key), UNSCOPED).await? else {
        return Ok(());
    };
    match owner {
        Some(owner) if owner.id() == existing.id() => Ok(()),
        Some(_) => Err(ApiError::bad_request(format!(
            "Could not update resource, {}#{} already exists.",
            T::NAME,
            existing.uuid()
        ))),
        None => Err(ApiError::bad_request(format!(
            "Could not create resource, {}#{} already exists.",
            T::NAME,
            existing.uuid()
        ))),
    }
}

pub async fn destroy<T: Resource>(store: &dyn ResourceStore<T>, uuid: &str) -> Result<(), ApiError> {
    let record = find_unscoped(store, uuid).await?;
    store.soft_delete(&record).await?;
    tracing::info!("{}#{} destroyed", T::NAME, uuid);
    Ok(())
}

pub async fn restore<T: Resource>(store: &dyn ResourceStore<T>, uuid: &str) -> Result<T, ApiError> {
    let record = find_unscoped(store, uuid).await?;
    ensure_restorable(&record)?;
    let restored = store.restore(&record).await?;
    tracing::info!("{}#{} restored", T::NAME, uuid);
    Ok(restored)
}
