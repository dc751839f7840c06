// handlers/public/auth/mod.rs - Token acquisition, no session required

pub mod login;

pub use login::{login_post, LoginRequest};
