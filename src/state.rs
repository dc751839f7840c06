use std::sync::Arc;

use crate::config::AppConfig;
use crate::constraints::ConstraintRegistry;
use crate::database::models::{Category, Statement, User};
use crate::database::{DatabaseManager, Repository, ResourceStore};

pub type Store<T> = Arc<dyn ResourceStore<T>>;

/// Everything a request needs, built once at startup and cloned into every handler.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub users: Store<User>,
    pub categories: Store<Category>,
    pub statements: Store<Statement>,
    pub constraints: Arc<ConstraintRegistry>,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        users: Store<User>,
        categories: Store<Category>,
        statements: Store<Statement>,
        constraints: ConstraintRegistry,
    ) -> Self {
        Self {
            config: Arc::new(config),
            users,
            categories,
            statements,
            constraints: Arc::new(constraints),
        }
    }

    /// Postgres-backed state with the default route constraints.
    pub fn postgres(config: AppConfig, db: Arc<DatabaseManager>) -> Self {
        Self::new(
            config,
            Arc::new(Repository::<User>::new(db.clone())),
            Arc::new(Repository::<Category>::new(db.clone())),
            Arc::new(Repository::<Statement>::new(db)),
            ConstraintRegistry::with_defaults(),
        )
    }
}
