pub mod category;
pub mod statement;
pub mod user;

pub use category::{Category, CategoryDraft, CategoryPayload};
pub use statement::{Statement, StatementPayload};
pub use user::{Role, User, UserDraft, UserPayload};
