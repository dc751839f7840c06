use super::types::{ListQuery, OrderClause, OrderSpec, SortDirection};

/// Column that every resource may be sorted by, whatever its field list.
const IDENTITY_COLUMN: &str = "id";

pub struct FilterOrder;

impl FilterOrder {
    /// Parse `column:direction,...`.
    ///
    /// Segments without a `:` are dropped, as are segments whose direction is
    /// not exactly `asc` or `desc`.
    pub fn parse(expr: &str) -> OrderSpec {
        let mut spec = OrderSpec::default();
        for segment in expr.split(',') {
            let mut parts = segment.split(':');
            let (Some(column), Some(direction)) = (parts.next(), parts.next()) else {
                continue;
            };
            if let Some(sort) = SortDirection::from_literal(direction) {
                spec.insert(column, sort);
            }
        }
        spec
    }

    /// Add an ORDER BY term to `query` for every column of `spec` that is a
    /// known field of the resource, or the identity column.
    ///
    /// Column names end up as identifiers in raw SQL, so this allow-list is the
    /// only thing standing between the client and the query text. Unknown
    /// columns are skipped silently.
    pub fn apply(mut query: ListQuery, fields: &[&str], spec: &OrderSpec) -> ListQuery {
        for (column, sort) in spec.iter() {
            let Some(field) = Self::resolve(column, fields) else {
                tracing::debug!("Ignoring unknown order column: {}", column);
                continue;
            };
            query = query.order_by(OrderClause {
                field: field.to_string(),
                column: to_snake_case(field),
                sort,
            });
        }
        query
    }

    fn resolve<'a>(column: &str, fields: &[&'a str]) -> Option<&'a str> {
        if column == IDENTITY_COLUMN {
            return Some(IDENTITY_COLUMN);
        }
        let wanted = title(column);
        fields.iter().copied().find(|field| title(field) == wanted)
    }
}

/// Upper-case the first character, leave the rest untouched.
fn title(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// `createdAt` -> `created_at`, `authKey` -> `auth_key`, `userID` -> `user_id`.
pub fn to_snake_case(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    let mut out = String::with_capacity(s.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        if c.is_uppercase() {
            let prev = i.checked_sub(1).and_then(|p| chars.get(p));
            let next = chars.get(i + 1);
            let boundary = match prev {
                Some(p) if p.is_lowercase() || p.is_ascii_digit() => true,
                Some(p) if p.is_uppercase() => next.is_some_and(|n| n.is_lowercase()),
                _ => false,
            };
            if boundary {
                out.push('_');
            }
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}
