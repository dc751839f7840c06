use serde::{Deserialize, Serialize};

/// Named query modifiers applied on top of a resource's base query.
///
/// A lookup with no scopes at all is "unscoped" and sees every row,
/// soft-deleted or not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Scope {
    /// Rows that are not soft-deleted
    Active,
    /// Soft-deleted rows only
    Deleted,
    /// Rows with the `published` flag set
    Published,
    /// Random order; overrides any explicit ordering
    Random,
}

impl Scope {
    /// WHERE fragment for `alias`, if the scope filters rows at all.
    pub fn condition(&self, alias: &str) -> Option<String> {
        match self {
            Scope::Active => Some(format!("{alias}.\"deleted_at\" IS NULL")),
            Scope::Deleted => Some(format!("{alias}.\"deleted_at\" IS NOT NULL")),
            Scope::Published => Some(format!("{alias}.\"published\" = TRUE")),
            Scope::Random => None,
        }
    }
}

/// Default visibility for list and show endpoints.
pub const ACTIVE: &[Scope] = &[Scope::Active];

/// Lookup that includes soft-deleted rows (update, destroy, restore, uniqueness checks).
pub const UNSCOPED: &[Scope] = &[];
