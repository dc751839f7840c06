use std::marker::PhantomData;

use serde_json::Value;
use sqlx::{self, postgres::{PgArguments, PgRow}, FromRow};

use super::models::{Category, Statement, User};
use super::resource::{Lookup, Resource};
use super::scope::Scope;
use crate::filter::ListQuery;

/// Alias of the resource table in every rendered query.
const ALIAS: &str = "t";

/// A resource that can be read back from a Postgres row.
pub trait PgResource: Resource + for<'r> FromRow<'r, PgRow> {
    /// `SELECT ... FROM ...` with the resource table aliased `t`.
    const SELECT: &'static str;
}

impl PgResource for User {
    const SELECT: &'static str = "SELECT t.* FROM \"users\" t";
}

impl PgResource for Category {
    const SELECT: &'static str = "SELECT t.* FROM \"category\" t";
}

impl PgResource for Statement {
    const SELECT: &'static str = "SELECT t.id, t.uuid, t.body, t.created_at, t.updated_at, t.deleted_at, \
        c.id AS category_id, c.uuid AS category_uuid, c.name AS category_name, \
        c.slug AS category_slug, c.published AS category_published, \
        c.created_at AS category_created_at, c.updated_at AS category_updated_at, \
        c.deleted_at AS category_deleted_at \
        FROM \"statement\" t JOIN \"category\" c ON c.id = t.category_id";
}

#[derive(Debug, Clone, PartialEq)]
pub struct SqlResult {
    pub query: String,
    pub params: Vec<Value>,
}

/// Renders the SQL for one resource type. Values always travel as bound
/// parameters; only whitelisted identifiers are spliced into the text.
pub struct QueryBuilder<T> {
    _phantom: PhantomData<T>,
}

impl<T: PgResource> QueryBuilder<T> {
    pub fn select(query: &ListQuery) -> SqlResult {
        let mut sql = format!("{}{}", T::SELECT, where_clause(&query.scopes, None));

        if query.is_random() {
            sql.push_str(" ORDER BY RANDOM()");
        } else if !query.order.is_empty() {
            let terms: Vec<String> = query
                .order
                .iter()
                .map(|clause| format!("{ALIAS}.\"{}\" {}", clause.column, clause.sort.to_sql()))
                .collect();
            sql.push_str(&format!(" ORDER BY {}", terms.join(", ")));
        }

        let mut params = Vec::new();
        if let Some(limit) = query.limit {
            params.push(Value::from(limit));
            sql.push_str(&format!(" LIMIT ${}", params.len()));
        }
        if let Some(offset) = query.offset {
            params.push(Value::from(offset));
            sql.push_str(&format!(" OFFSET ${}", params.len()));
        }

        SqlResult { query: sql, params }
    }

    pub fn count(scopes: &[Scope]) -> SqlResult {
        SqlResult {
            query: format!(
                "SELECT COUNT(*) AS count FROM \"{}\" {ALIAS}{}",
                T::TABLE,
                where_clause(scopes, None)
            ),
            params: vec![],
        }
    }

    pub fn find(lookup: &Lookup, scopes: &[Scope]) -> SqlResult {
        let (column, param) = match lookup {
            Lookup::Id(id) => ("id", Value::from(*id)),
            Lookup::Uuid(uuid) => ("uuid", Value::from(uuid.as_str())),
            Lookup::NaturalKey(key) => (T::NATURAL_KEY, Value::from(key.as_str())),
        };
        let condition = format!("{ALIAS}.\"{column}\" = $1");
        SqlResult {
            query: format!("{}{} LIMIT 1", T::SELECT, where_clause(scopes, Some(condition))),
            params: vec![param],
        }
    }

    /// Returns the new row's `id`.
    pub fn insert(record: &T) -> SqlResult {
        let (columns, params): (Vec<_>, Vec<_>) = record.write_columns().into_iter().unzip();
        let names: Vec<String> = columns.iter().map(|c| format!("\"{c}\"")).collect();
        let placeholders: Vec<String> = (1..=params.len()).map(|i| format!("${i}")).collect();
        SqlResult {
            query: format!(
                "INSERT INTO \"{}\" ({}) VALUES ({}) RETURNING id",
                T::TABLE,
                names.join(", "),
                placeholders.join(", ")
            ),
            params,
        }
    }

    pub fn update(record: &T) -> SqlResult {
        let (columns, mut params): (Vec<_>, Vec<_>) = record.write_columns().into_iter().unzip();
        let assignments: Vec<String> = columns
            .iter()
            .enumerate()
            .map(|(i, c)| format!("\"{c}\" = ${}", i + 1))
            .collect();
        params.push(Value::from(record.id()));
        SqlResult {
            query: format!(
                "UPDATE \"{}\" SET {}, \"updated_at\" = NOW() WHERE \"id\" = ${}",
                T::TABLE,
                assignments.join(", "),
                params.len()
            ),
            params,
        }
    }

    pub fn soft_delete(record: &T) -> SqlResult {
        let extra = match T::on_deleted_sql() {
            "" => String::new(),
            sql => format!(", {sql}"),
        };
        SqlResult {
            query: format!(
                "UPDATE \"{}\" SET \"deleted_at\" = NOW(){extra} WHERE \"id\" = $1",
                T::TABLE
            ),
            params: vec![Value::from(record.id())],
        }
    }

    pub fn restore(record: &T) -> SqlResult {
        SqlResult {
            query: format!("UPDATE \"{}\" SET \"deleted_at\" = NULL WHERE \"id\" = $1", T::TABLE),
            params: vec![Value::from(record.id())],
        }
    }
}

fn where_clause(scopes: &[Scope], extra: Option<String>) -> String {
    let conditions: Vec<String> = extra
        .into_iter()
        .chain(scopes.iter().filter_map(|scope| scope.condition(ALIAS)))
        .collect();
    if conditions.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", conditions.join(" AND "))
    }
}

pub(crate) fn bind_param_query<'q>(
    q: sqlx::query::Query<'q, sqlx::Postgres, PgArguments>,
    v: &'q Value,
) -> sqlx::query::Query<'q, sqlx::Postgres, PgArguments> {
    match v {
        Value::Null => {
            let none: Option<String> = None;
            q.bind(none)
        }
        Value::Bool(b) => q.bind(*b),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                q.bind(i)
            } else if let Some(f) = n.as_f64() {
                q.bind(f)
            } else {
                q.bind(n.to_string())
            }
        }
        Value::String(s) => q.bind(s),
        Value::Array(_) | Value::Object(_) => q.bind(v),
    }
}

pub(crate) fn bind_param_query_as<'q, O>(
    q: sqlx::query::QueryAs<'q, sqlx::Postgres, O, PgArguments>,
    v: &'q Value,
) -> sqlx::query::QueryAs<'q, sqlx::Postgres, O, PgArguments>
where
    O: for<'r> FromRow<'r, PgRow>,
{
    match v {
        Value::Null => {
            let none: Option<String> = None;
            q.bind(none)
        }
        Value::Bool(b) => q.bind(*b),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                q.bind(i)
            } else if let Some(f) = n.as_f64() {
                q.bind(f)
            } else {
                q.bind(n.to_string())
            }
        }
        Value::String(s) => q.bind(s),
        Value::Array(_) | Value::Object(_) => q.bind(v),
    }
}
