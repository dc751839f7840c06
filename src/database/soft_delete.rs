//! Soft-delete lifecycle shared by every resource.
//!
//! ```text
//!   Active (deleted_at = NULL)  --destroy-->  Deleted (deleted_at = now)
//!   Deleted                     --restore-->  Active
//! ```

use chrono::{DateTime, Utc};

use super::resource::Resource;
use crate::error::ApiError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Active,
    Deleted,
}

pub fn lifecycle<T: Resource>(record: &T) -> Lifecycle {
    match record.timestamps().deleted_at {
        Some(_) => Lifecycle::Deleted,
        None => Lifecycle::Active,
    }
}

/// Active -> Deleted. Also lets the resource drop any visibility flags.
pub fn mark_deleted<T: Resource>(record: &mut T, at: DateTime<Utc>) {
    record.timestamps_mut().deleted_at = Some(at);
    record.on_deleted();
}

/// Deleted -> Active.
pub fn mark_restored<T: Resource>(record: &mut T) {
    record.timestamps_mut().deleted_at = None;
}

/// Restoring an active resource is a conflict.
pub fn ensure_restorable<T: Resource>(record: &T) -> Result<(), ApiError> {
    match lifecycle(record) {
        Lifecycle::Deleted => Ok(()),
        Lifecycle::Active => Err(ApiError::conflict(format!(
            "{}#{} already restored.",
            T::NAME,
            record.uuid()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::Category;
    use axum::http::StatusCode;

    #[test]
    fn destroy_then_restore_round_trip() {
        let mut category = Category::fixture("abcdefgh", "Science");
        assert_eq!(lifecycle(&category), Lifecycle::Active);
        assert!(ensure_restorable(&category).is_err());

        mark_deleted(&mut category, Utc::now());
        assert_eq!(lifecycle(&category), Lifecycle::Deleted);
        assert!(!category.published);
        assert!(ensure_restorable(&category).is_ok());

        mark_restored(&mut category);
        assert_eq!(lifecycle(&category), Lifecycle::Active);
        assert!(category.timestamps.deleted_at.is_none());

        let err = ensure_restorable(&category).unwrap_err();
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
        assert_eq!(err.message(), "Category#abcdefgh already restored.");
    }
}
