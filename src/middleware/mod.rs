pub mod auth;
pub mod constraints;
pub mod cors;
pub mod payload;
pub mod response;

pub use auth::{bearer_token, session_middleware};
pub use constraints::constraints_middleware;
pub use cors::cors_middleware;
pub use payload::Payload;
pub use response::{ApiResponse, ApiResult};
