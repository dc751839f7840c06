use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use sqlx::FromRow;
use validator::Validate;

use crate::auth::{random_string, UUID_LENGTH};
use crate::database::resource::{Resource, Timestamps};

#[derive(Debug, Clone, PartialEq, Serialize, FromRow, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    #[serde(skip)]
    pub id: i64,
    #[validate(length(equal = 8))]
    pub uuid: String,
    #[validate(length(min = 3))]
    pub name: String,
    pub slug: String,
    pub published: bool,
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub timestamps: Timestamps,
}

/// Body of `POST /v1/categories`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CategoryDraft {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub published: Option<bool>,
}

/// Body of `PATCH /v1/categories/:uuid`. Only present fields are applied.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct CategoryPayload {
    #[validate(length(min = 3))]
    pub name: Option<String>,
    #[validate(length(min = 3))]
    pub slug: Option<String>,
    pub published: Option<bool>,
}

impl Category {
    /// Build a new category from client input, filling server-side defaults
    /// for whatever the client left out.
    pub fn from_draft(draft: CategoryDraft) -> Self {
        let name = draft.name.unwrap_or_default();
        let slug = draft.slug.unwrap_or_else(|| slugify(&name));
        Self {
            id: 0,
            uuid: random_string(UUID_LENGTH),
            name,
            slug,
            published: draft.published.unwrap_or(true),
            timestamps: Timestamps::default(),
        }
    }

    pub fn apply(&mut self, payload: CategoryPayload) {
        if let Some(name) = payload.name {
            self.name = name;
        }
        if let Some(slug) = payload.slug {
            self.slug = slug;
        }
        if let Some(published) = payload.published {
            self.published = published;
        }
    }

    #[cfg(test)]
    pub fn fixture(uuid: &str, name: &str) -> Self {
        Self {
            id: 0,
            uuid: uuid.to_string(),
            name: name.to_string(),
            slug: slugify(name),
            published: true,
            timestamps: Timestamps { created_at: chrono::Utc::now(), ..Default::default() },
        }
    }
}

impl CategoryPayload {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.slug.is_none() && self.published.is_none()
    }
}

impl Resource for Category {
    const NAME: &'static str = "Category";
    const TABLE: &'static str = "category";
    const NATURAL_KEY: &'static str = "name";
    const SORTABLE: &'static [&'static str] =
        &["uuid", "name", "slug", "published", "createdAt", "updatedAt"];

    fn id(&self) -> i64 {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = id;
    }

    fn uuid(&self) -> &str {
        &self.uuid
    }

    fn natural_key(&self) -> &str {
        &self.name
    }

    fn timestamps(&self) -> &Timestamps {
        &self.timestamps
    }

    fn timestamps_mut(&mut self) -> &mut Timestamps {
        &mut self.timestamps
    }

    fn write_columns(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("uuid", json!(self.uuid)),
            ("name", json!(self.name)),
            ("slug", json!(self.slug)),
            ("published", json!(self.published)),
        ]
    }

    fn on_deleted_sql() -> &'static str {
        "\"published\" = FALSE"
    }

    fn on_deleted(&mut self) {
        self.published = false;
    }

    fn is_published(&self) -> bool {
        self.published
    }
}

/// `"Science & Nature"` -> `"science-nature"`
pub fn slugify(name: &str) -> String {
    name.split(|c: char| !c.is_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draft_defaults_fill_only_missing_fields() {
        let category = Category::from_draft(CategoryDraft {
            name: Some("Science & Nature".into()),
            slug: None,
            published: Some(false),
        });
        assert_eq!(category.uuid.len(), UUID_LENGTH);
        assert_eq!(category.slug, "science-nature");
        assert!(!category.published);
        assert!(category.validate().is_ok());
    }

    #[test]
    fn short_name_fails_validation() {
        let category = Category::from_draft(CategoryDraft { name: Some("ab".into()), ..Default::default() });
        let errors = category.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("name"));
    }

    #[test]
    fn payload_applies_present_fields_only() {
        let mut category = Category::fixture("abcdefgh", "Science");
        category.apply(CategoryPayload { slug: Some("sci".into()), ..Default::default() });
        assert_eq!(category.name, "Science");
        assert_eq!(category.slug, "sci");
        assert!(CategoryPayload::default().is_empty());
    }

    #[test]
    fn serialization_hides_internal_columns() {
        let value = serde_json::to_value(Category::fixture("abcdefgh", "Science")).unwrap();
        assert_eq!(value["uuid"], "abcdefgh");
        assert!(value.get("id").is_none());
        assert!(value.get("deletedAt").is_none());
        assert!(value.get("createdAt").is_some());
        assert!(value["updatedAt"].is_null());
    }
}
