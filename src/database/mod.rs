pub mod manager;
pub mod models;
pub mod query_builder;
pub mod repository;
pub mod resource;
pub mod scope;
pub mod soft_delete;

pub use manager::{DatabaseError, DatabaseManager};
pub use repository::Repository;
pub use resource::{Lookup, Resource, ResourceStore, Timestamps};
pub use scope::Scope;
