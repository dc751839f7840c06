// handlers/protected/auth/mod.rs - Token maintenance for signed-in clients

pub mod refresh;

pub use refresh::refresh_get;
