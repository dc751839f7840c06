use serde::{Deserialize, Serialize};

use crate::database::scope::Scope;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    /// Parse the lowercase literal used in `orderBy` expressions. Anything else is rejected.
    pub fn from_literal(token: &str) -> Option<Self> {
        match token {
            "asc" => Some(SortDirection::Asc),
            "desc" => Some(SortDirection::Desc),
            _ => None,
        }
    }

    pub fn to_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

/// Parsed `orderBy` expression: client column names mapped to a direction.
///
/// Columns are unique; a repeated column keeps its position and takes the
/// last direction given.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderSpec {
    entries: Vec<(String, SortDirection)>,
}

impl OrderSpec {
    pub fn insert(&mut self, column: impl Into<String>, direction: SortDirection) {
        let column = column.into();
        match self.entries.iter_mut().find(|(c, _)| *c == column) {
            Some(entry) => entry.1 = direction,
            None => self.entries.push((column, direction)),
        }
    }

    pub fn get(&self, column: &str) -> Option<SortDirection> {
        self.entries.iter().find(|(c, _)| c == column).map(|(_, d)| *d)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, SortDirection)> {
        self.entries.iter().map(|(c, d)| (c.as_str(), *d))
    }
}

/// A whitelisted ORDER BY term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderClause {
    /// Name as exposed to clients (camelCase)
    pub field: String,
    /// Storage column (snake_case)
    pub column: String,
    pub sort: SortDirection,
}

/// Storage-agnostic description of a listing query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub scopes: Vec<Scope>,
    pub order: Vec<OrderClause>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl ListQuery {
    pub fn new(scopes: Vec<Scope>) -> Self {
        Self { scopes, order: Vec::new(), limit: None, offset: None }
    }

    pub fn order_by(mut self, clause: OrderClause) -> Self {
        self.order.push(clause);
        self
    }

    pub fn limit(mut self, limit: i64, offset: i64) -> Self {
        self.limit = Some(limit.max(0));
        self.offset = Some(offset.max(0));
        self
    }

    pub fn is_random(&self) -> bool {
        self.scopes.contains(&Scope::Random)
    }
}
