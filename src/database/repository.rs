use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use sqlx::Row;

use super::manager::{DatabaseError, DatabaseManager};
use super::query_builder::{bind_param_query, bind_param_query_as, PgResource, QueryBuilder, SqlResult};
use super::resource::{Lookup, ResourceStore};
use super::scope::{Scope, UNSCOPED};
use crate::filter::ListQuery;

/// Postgres-backed [`ResourceStore`].
pub struct Repository<T> {
    db: Arc<DatabaseManager>,
    _phantom: PhantomData<T>,
}

impl<T: PgResource> Repository<T> {
    pub fn new(db: Arc<DatabaseManager>) -> Self {
        Self { db, _phantom: PhantomData }
    }

    async fn fetch_all(&self, sql: SqlResult) -> Result<Vec<T>, DatabaseError> {
        let pool = self.db.pool().await?;
        let mut q = sqlx::query_as::<_, T>(&sql.query);
        for p in sql.params.iter() {
            q = bind_param_query_as(q, p);
        }
        Ok(q.fetch_all(&pool).await?)
    }

    async fn fetch_optional(&self, sql: SqlResult) -> Result<Option<T>, DatabaseError> {
        let pool = self.db.pool().await?;
        let mut q = sqlx::query_as::<_, T>(&sql.query);
        for p in sql.params.iter() {
            q = bind_param_query_as(q, p);
        }
        Ok(q.fetch_optional(&pool).await?)
    }

    async fn execute(&self, sql: SqlResult) -> Result<u64, DatabaseError> {
        let pool = self.db.pool().await?;
        let mut q = sqlx::query(&sql.query);
        for p in sql.params.iter() {
            q = bind_param_query(q, p);
        }
        Ok(q.execute(&pool).await?.rows_affected())
    }

    /// Re-read a row after a write so joined and defaulted columns are current.
    async fn reload(&self, id: i64) -> Result<T, DatabaseError> {
        self.fetch_optional(QueryBuilder::<T>::find(&Lookup::Id(id), UNSCOPED))
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("{}#{} not found.", T::NAME, id)))
    }
}

#[async_trait]
impl<T: PgResource> ResourceStore<T> for Repository<T> {
    async fn count(&self, scopes: &[Scope]) -> Result<i64, DatabaseError> {
        let sql = QueryBuilder::<T>::count(scopes);
        let pool = self.db.pool().await?;
        let row = sqlx::query(&sql.query).fetch_one(&pool).await?;
        let count: i64 = row.try_get("count")?;
        Ok(count)
    }

    async fn select(&self, query: &ListQuery) -> Result<Vec<T>, DatabaseError> {
        self.fetch_all(QueryBuilder::<T>::select(query)).await
    }

    async fn find(&self, lookup: &Lookup, scopes: &[Scope]) -> Result<Option<T>, DatabaseError> {
        self.fetch_optional(QueryBuilder::<T>::find(lookup, scopes)).await
    }

    async fn insert(&self, record: &T) -> Result<T, DatabaseError> {
        let sql = QueryBuilder::<T>::insert(record);
        let pool = self.db.pool().await?;
        let mut q = sqlx::query(&sql.query);
        for p in sql.params.iter() {
            q = bind_param_query(q, p);
        }
        let id: i64 = q.fetch_one(&pool).await?.try_get("id")?;
        self.reload(id).await
    }

    async fn update(&self, record: &T) -> Result<T, DatabaseError> {
        self.execute(QueryBuilder::<T>::update(record)).await?;
        self.reload(record.id()).await
    }

    async fn soft_delete(&self, record: &T) -> Result<(), DatabaseError> {
        self.execute(QueryBuilder::<T>::soft_delete(record)).await?;
        Ok(())
    }

    async fn restore(&self, record: &T) -> Result<T, DatabaseError> {
        self.execute(QueryBuilder::<T>::restore(record)).await?;
        self.reload(record.id()).await
    }

    async fn ping(&self) -> Result<(), DatabaseError> {
        self.db.health_check().await
    }
}
