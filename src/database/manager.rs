use std::time::Duration;

use sqlx::{postgres::PgPoolOptions, PgPool};
use thiserror::Error;
use tokio::sync::OnceCell;
use tracing::info;

use crate::config::DatabaseConfig;

/// Errors from DatabaseManager and the repositories built on it
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Unsupported database driver: {0}")]
    UnsupportedDriver(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Migration failed: {0}")]
    Migration(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

impl DatabaseError {
    /// A write hit a `UNIQUE` constraint (SQLSTATE 23505).
    pub fn is_unique_violation(&self) -> bool {
        match self {
            DatabaseError::Sqlx(sqlx::Error::Database(e)) => e.is_unique_violation(),
            _ => false,
        }
    }
}

const SUPPORTED_DRIVER: &str = "postgres";

/// Owns the single connection pool of the process.
///
/// The pool is created lazily by the first caller of [`DatabaseManager::pool`];
/// concurrent first callers wait on the same initialization and every later
/// caller gets a clone of the same handle.
pub struct DatabaseManager {
    config: DatabaseConfig,
    pool: OnceCell<PgPool>,
}

impl DatabaseManager {
    pub fn new(config: DatabaseConfig) -> Result<Self, DatabaseError> {
        if config.driver != SUPPORTED_DRIVER {
            return Err(DatabaseError::UnsupportedDriver(config.driver));
        }
        Ok(Self { config, pool: OnceCell::new() })
    }

    /// Get the pool, connecting on first use
    pub async fn pool(&self) -> Result<PgPool, DatabaseError> {
        let pool = self
            .pool
            .get_or_try_init(|| async {
                let pool = PgPoolOptions::new()
                    .max_connections(self.config.max_connections)
                    .acquire_timeout(Duration::from_secs(self.config.connection_timeout))
                    .connect(&self.config.url)
                    .await?;
                info!(
                    "Created database pool for: {} (max {} connections)",
                    redact(&self.config.url),
                    self.config.max_connections
                );
                Ok::<_, DatabaseError>(pool)
            })
            .await?;
        Ok(pool.clone())
    }

    /// Apply the embedded migrations
    pub async fn migrate(&self) -> Result<(), DatabaseError> {
        let pool = self.pool().await?;
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| DatabaseError::Migration(e.to_string()))?;
        info!("Database migrations applied");
        Ok(())
    }

    /// Pings the pool to ensure connectivity
    pub async fn health_check(&self) -> Result<(), DatabaseError> {
        let pool = self.pool().await?;
        sqlx::query("SELECT 1").execute(&pool).await?;
        Ok(())
    }

    /// Close the pool if it was ever opened (e.g., on shutdown)
    pub async fn close(&self) {
        if let Some(pool) = self.pool.get() {
            pool.close().await;
            info!("Closed database pool");
        }
    }
}

/// Connection string with user and password stripped, for logging.
fn redact(dsn: &str) -> String {
    match url::Url::parse(dsn) {
        Ok(mut url) => {
            let _ = url.set_username("");
            let _ = url.set_password(None);
            url.to_string()
        }
        Err(_) => "<unparseable DSN>".to_string(),
    }
}
