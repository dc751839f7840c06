use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use sqlx::FromRow;

use super::manager::DatabaseError;
use super::scope::Scope;
use crate::filter::ListQuery;

/// Bookkeeping columns carried by every resource.
#[derive(Debug, Clone, Default, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Timestamps {
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(skip)]
    pub deleted_at: Option<DateTime<Utc>>,
}

/// A domain entity exposed through the CRUD endpoints.
pub trait Resource: Serialize + Clone + Send + Sync + Unpin + 'static {
    /// Name used in client-facing messages, e.g. `Category#abcdefgh not found.`
    const NAME: &'static str;
    const TABLE: &'static str;
    /// Column holding the globally unique natural key
    const NATURAL_KEY: &'static str;
    /// Client-facing field names that may appear in `orderBy`
    const SORTABLE: &'static [&'static str];

    fn id(&self) -> i64;
    fn set_id(&mut self, id: i64);
    fn uuid(&self) -> &str;
    fn natural_key(&self) -> &str;
    fn timestamps(&self) -> &Timestamps;
    fn timestamps_mut(&mut self) -> &mut Timestamps;

    /// Column/value pairs written on insert and update.
    fn write_columns(&self) -> Vec<(&'static str, Value)>;

    /// Extra assignments applied alongside `deleted_at` when the row is soft-deleted.
    fn on_deleted_sql() -> &'static str {
        ""
    }

    /// In-memory counterpart of [`Resource::on_deleted_sql`].
    fn on_deleted(&mut self) {}

    fn is_published(&self) -> bool {
        true
    }
}

/// How a single row is addressed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    Id(i64),
    Uuid(String),
    NaturalKey(String),
}

impl Lookup {
    pub fn uuid(uuid: impl Into<String>) -> Self {
        Lookup::Uuid(uuid.into())
    }

    pub fn key(key: impl Into<String>) -> Self {
        Lookup::NaturalKey(key.into())
    }
}

/// Storage boundary for one resource type.
#[async_trait]
pub trait ResourceStore<T: Resource>: Send + Sync {
    async fn count(&self, scopes: &[Scope]) -> Result<i64, DatabaseError>;

    async fn select(&self, query: &ListQuery) -> Result<Vec<T>, DatabaseError>;

    async fn find(&self, lookup: &Lookup, scopes: &[Scope]) -> Result<Option<T>, DatabaseError>;

    /// Persist a new row and return it as stored.
    async fn insert(&self, record: &T) -> Result<T, DatabaseError>;

    /// Write every column of `record` back to its row.
    async fn update(&self, record: &T) -> Result<T, DatabaseError>;

    async fn soft_delete(&self, record: &T) -> Result<(), DatabaseError>;

    async fn restore(&self, record: &T) -> Result<T, DatabaseError>;

    /// Connectivity check behind `GET /health`.
    async fn ping(&self) -> Result<(), DatabaseError> {
        Ok(())
    }
}
