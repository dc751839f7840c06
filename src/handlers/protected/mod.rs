// handlers/protected/mod.rs - Routes behind the session and constraint layers

pub mod auth;
pub mod categories;
pub mod resource;
pub mod statements;
pub mod users;
