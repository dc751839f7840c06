//! Test doubles: an in-memory [`ResourceStore`] and a harness that drives the
//! full router in-process.

use std::cmp::Ordering;
use std::sync::atomic::{AtomicI64, Ordering as AtomicOrdering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    response::Response,
    Router,
};
use chrono::Utc;
use rand::seq::SliceRandom;
use serde_json::Value;
use tower::ServiceExt;

use crate::auth::{hash_password, issue_token};
use crate::config::AppConfig;
use crate::constraints::ConstraintRegistry;
use crate::database::models::{Category, Role, Statement, User};
use crate::database::soft_delete::{mark_deleted, mark_restored};
use crate::database::{DatabaseError, Lookup, Resource, ResourceStore, Scope};
use crate::filter::{ListQuery, OrderClause, SortDirection};
use crate::state::AppState;

pub struct MemoryStore<T> {
    rows: Mutex<Vec<T>>,
    next_id: AtomicI64,
    online: bool,
}

impl<T: Resource> MemoryStore<T> {
    pub fn new() -> Self {
        Self { rows: Mutex::new(Vec::new()), next_id: AtomicI64::new(1), online: true }
    }

    /// A store whose `ping` fails, as if the database were down.
    pub fn offline() -> Self {
        Self { online: false, ..Self::new() }
    }
}

fn visible<T: Resource>(record: &T, scopes: &[Scope]) -> bool {
    scopes.iter().all(|scope| match scope {
        Scope::Active => record.timestamps().deleted_at.is_none(),
        Scope::Deleted => record.timestamps().deleted_at.is_some(),
        Scope::Published => record.is_published(),
        Scope::Random => true,
    })
}

fn matches<T: Resource>(record: &T, lookup: &Lookup) -> bool {
    match lookup {
        Lookup::Id(id) => record.id() == *id,
        Lookup::Uuid(uuid) => record.uuid() == uuid,
        Lookup::NaturalKey(key) => record.natural_key() == key,
    }
}

fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::String(a), Value::String(b)) => a.cmp(b),
        (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
        (Value::Number(a), Value::Number(b)) => {
            a.as_f64().partial_cmp(&b.as_f64()).unwrap_or(Ordering::Equal)
        }
        (Value::Null, Value::Null) => Ordering::Equal,
        (Value::Null, _) => Ordering::Less,
        (_, Value::Null) => Ordering::Greater,
        _ => Ordering::Equal,
    }
}

fn sort_key<T: Resource>(record: &T, clause: &OrderClause) -> Value {
    if clause.field == "id" {
        return Value::from(record.id());
    }
    serde_json::to_value(record)
        .ok()
        .and_then(|v| v.get(&clause.field).cloned())
        .unwrap_or(Value::Null)
}

#[async_trait]
impl<T: Resource> ResourceStore<T> for MemoryStore<T> {
    async fn count(&self, scopes: &[Scope]) -> Result<i64, DatabaseError> {
        let rows = self.rows.lock().unwrap();
        Ok(rows.iter().filter(|r| visible(*r, scopes)).count() as i64)
    }

    async fn select(&self, query: &ListQuery) -> Result<Vec<T>, DatabaseError> {
        let mut rows: Vec<T> = {
            let rows = self.rows.lock().unwrap();
            rows.iter().filter(|r| visible(*r, &query.scopes)).cloned().collect()
        };

        if query.is_random() {
            rows.shuffle(&mut rand::thread_rng());
        } else {
            rows.sort_by(|a, b| {
                query.order.iter().fold(Ordering::Equal, |acc, clause| {
                    acc.then_with(|| {
                        let ord = compare_values(&sort_key(a, clause), &sort_key(b, clause));
                        match clause.sort {
                            SortDirection::Asc => ord,
                            SortDirection::Desc => ord.reverse(),
                        }
                    })
                })
            });
        }

        let offset = query.offset.unwrap_or(0) as usize;
        let limit = query.limit.map(|l| l as usize).unwrap_or(usize::MAX);
        Ok(rows.into_iter().skip(offset).take(limit).collect())
    }

    async fn find(&self, lookup: &Lookup, scopes: &[Scope]) -> Result<Option<T>, DatabaseError> {
        let rows = self.rows.lock().unwrap();
        Ok(rows.iter().find(|r| matches(*r, lookup) && visible(*r, scopes)).cloned())
    }

    async fn insert(&self, record: &T) -> Result<T, DatabaseError> {
        let mut record = record.clone();
        record.set_id(self.next_id.fetch_add(1, AtomicOrdering::SeqCst));
        record.timestamps_mut().created_at = Utc::now();
        self.rows.lock().unwrap().push(record.clone());
        Ok(record)
    }

    async fn update(&self, record: &T) -> Result<T, DatabaseError> {
        let mut rows = self.rows.lock().unwrap();
        let row = rows
            .iter_mut()
            .find(|r| r.id() == record.id())
            .ok_or_else(|| DatabaseError::NotFound(format!("{}#{}", T::NAME, record.uuid())))?;
        let created_at = row.timestamps().created_at;
        *row = record.clone();
        row.timestamps_mut().created_at = created_at;
        row.timestamps_mut().updated_at = Some(Utc::now());
        Ok(row.clone())
    }

    async fn soft_delete(&self, record: &T) -> Result<(), DatabaseError> {
        let mut rows = self.rows.lock().unwrap();
        if let Some(row) = rows.iter_mut().find(|r| r.id() == record.id()) {
            mark_deleted(row, Utc::now());
        }
        Ok(())
    }

    async fn restore(&self, record: &T) -> Result<T, DatabaseError> {
        let mut rows = self.rows.lock().unwrap();
        let row = rows
            .iter_mut()
            .find(|r| r.id() == record.id())
            .ok_or_else(|| DatabaseError::NotFound(format!("{}#{}", T::NAME, record.uuid())))?;
        mark_restored(row);
        Ok(row.clone())
    }

    async fn ping(&self) -> Result<(), DatabaseError> {
        if self.online {
            Ok(())
        } else {
            Err(DatabaseError::Sqlx(sqlx::Error::PoolTimedOut))
        }
    }
}

/// The router over in-memory stores.
pub struct TestApp {
    pub state: AppState,
    router: Router,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with(test_config(), ConstraintRegistry::with_defaults())
    }

    pub fn with(config: AppConfig, constraints: ConstraintRegistry) -> Self {
        Self::build(config, constraints, MemoryStore::new())
    }

    /// Router whose store cannot reach its database.
    pub fn offline() -> Self {
        Self::build(test_config(), ConstraintRegistry::with_defaults(), MemoryStore::offline())
    }

    fn build(config: AppConfig, constraints: ConstraintRegistry, users: MemoryStore<User>) -> Self {
        let state = AppState::new(
            config,
            Arc::new(users),
            Arc::new(MemoryStore::<Category>::new()),
            Arc::new(MemoryStore::<Statement>::new()),
            constraints,
        );
        let router = crate::app(state.clone());
        Self { state, router }
    }

    pub async fn send(&self, request: Request<Body>) -> Response {
        self.router.clone().oneshot(request).await.unwrap()
    }

    /// Send a request and return the status plus the JSON body (`Null` when empty).
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let body = match body {
            Some(value) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(value.to_string())
            }
            None => Body::empty(),
        };

        let response = self.send(builder.body(body).unwrap()).await;
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap() };
        (status, value)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.request(Method::GET, uri, None, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, uri, Some(body), None).await
    }

    pub async fn patch(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::PATCH, uri, Some(body), None).await
    }

    pub async fn put(&self, uri: &str) -> (StatusCode, Value) {
        self.request(Method::PUT, uri, None, None).await
    }

    pub async fn delete(&self, uri: &str) -> (StatusCode, Value) {
        self.request(Method::DELETE, uri, None, None).await
    }

    /// Store a user directly, bypassing the API, with the given password and role.
    pub async fn seed_user(&self, email: &str, password: &str, role: Role) -> User {
        let mut user = User::fixture(&crate::auth::random_string(8), email, role);
        user.password = hash_password(password.to_string()).await.unwrap();
        self.state.users.insert(&user).await.unwrap()
    }

    pub fn token_for(&self, user: &User) -> String {
        issue_token(&self.state.config.security, &self.state.config.app_name, &user.email, user.id)
            .unwrap()
            .token
    }
}

pub fn test_config() -> AppConfig {
    AppConfig::development("postgres://localhost/statements_test".to_string())
}
