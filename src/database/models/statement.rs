use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use sqlx::{postgres::PgRow, FromRow, Row};
use validator::Validate;

use super::category::Category;
use crate::auth::{random_string, UUID_LENGTH};
use crate::database::resource::{Resource, Timestamps};

#[derive(Debug, Clone, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Statement {
    #[serde(skip)]
    pub id: i64,
    #[validate(length(equal = 8))]
    pub uuid: String,
    #[validate(length(min = 3))]
    pub body: String,
    pub category: Category,
    #[serde(skip)]
    pub category_id: i64,
    #[serde(flatten)]
    pub timestamps: Timestamps,
}

/// Body of both `POST` and `PATCH` on statements. `category` is the public
/// uuid of the owning category.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct StatementPayload {
    #[validate(length(min = 3))]
    pub body: Option<String>,
    #[validate(length(equal = 8))]
    pub category: Option<String>,
}

impl StatementPayload {
    pub fn is_empty(&self) -> bool {
        self.body.is_none() && self.category.is_none()
    }
}

impl Statement {
    pub fn new(body: String, category: Category) -> Self {
        Self {
            id: 0,
            uuid: random_string(UUID_LENGTH),
            body,
            category_id: category.id,
            category,
            timestamps: Timestamps::default(),
        }
    }

    /// Move the statement under another category.
    pub fn assign(&mut self, category: Category) {
        self.category_id = category.id;
        self.category = category;
    }
}

/// Rows come from `statement t JOIN category c`, with the category columns
/// prefixed `category_`.
impl<'r> FromRow<'r, PgRow> for Statement {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        let category = Category {
            id: row.try_get("category_id")?,
            uuid: row.try_get("category_uuid")?,
            name: row.try_get("category_name")?,
            slug: row.try_get("category_slug")?,
            published: row.try_get("category_published")?,
            timestamps: Timestamps {
                created_at: row.try_get("category_created_at")?,
                updated_at: row.try_get("category_updated_at")?,
                deleted_at: row.try_get("category_deleted_at")?,
            },
        };

        Ok(Self {
            id: row.try_get("id")?,
            uuid: row.try_get("uuid")?,
            body: row.try_get("body")?,
            category_id: category.id,
            category,
            timestamps: Timestamps::from_row(row)?,
        })
    }
}

impl Resource for Statement {
    const NAME: &'static str = "Statement";
    const TABLE: &'static str = "statement";
    const NATURAL_KEY: &'static str = "body";
    const SORTABLE: &'static [&'static str] = &["uuid", "body", "createdAt", "updatedAt"];

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
        &self.body
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
            ("body", json!(self.body)),
            ("category_id", json!(self.category_id)),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embeds_category_in_output() {
        let mut category = Category::fixture("catcatca", "Science");
        category.id = 4;
        let statement = Statement::new("Water boils at 100C".into(), category);
        assert_eq!(statement.category_id, 4);

        let value = serde_json::to_value(&statement).unwrap();
        assert_eq!(value["body"], "Water boils at 100C");
        assert_eq!(value["category"]["uuid"], "catcatca");
        assert!(value.get("categoryId").is_none());
    }

    #[test]
    fn payload_rules_apply_only_to_present_fields() {
        assert!(StatementPayload::default().validate().is_ok());
        let payload = StatementPayload { body: Some("ok".into()), category: Some("short".into()) };
        let errors = payload.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("body"));
        assert!(errors.field_errors().contains_key("category"));
    }
}
