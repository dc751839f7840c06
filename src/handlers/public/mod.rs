pub mod auth;
pub mod health;

pub use auth::login_post;
pub use health::health_get;
