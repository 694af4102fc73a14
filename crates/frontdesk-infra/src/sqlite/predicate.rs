//! Renders compiled filter constraints into SQL WHERE fragments.
//!
//! Constraint field names are compiler-owned static strings matching the
//! column names in the migrations, so they are interpolated directly; all
//! caller-provided values go through bind parameters.
//!
//! Timestamps are stored as RFC 3339 TEXT with a fixed `+00:00` offset, so
//! string comparison orders the same way as the underlying instants.

use frontdesk_types::filter::{Constraint, FilterValue, OrderBy};
use sqlx::Sqlite;
use sqlx::query::Query;
use sqlx::sqlite::SqliteArguments;

/// An owned bind argument produced by [`render`].
#[derive(Debug, Clone, PartialEq)]
pub enum BindValue {
    Text(String),
    Int(i64),
    Real(f64),
}

/// A rendered WHERE fragment plus its bind arguments.
///
/// `clause` is either empty or starts with `" WHERE "`, ready to append to a
/// `SELECT`/`DELETE` statement.
#[derive(Debug, Default)]
pub struct SqlPredicate {
    pub clause: String,
    pub binds: Vec<BindValue>,
}

/// Lower a constraint list into a WHERE fragment. An empty list renders to an
/// empty clause (no WHERE).
pub fn render(constraints: &[Constraint]) -> SqlPredicate {
    let mut predicate = SqlPredicate::default();
    let mut parts = Vec::with_capacity(constraints.len());

    for constraint in constraints {
        match constraint {
            Constraint::Eq { field, value } => {
                parts.push(format!("{field} = ?"));
                predicate.binds.push(to_bind(value));
            }
            Constraint::AnyOf { field, values } => {
                let placeholders = vec!["?"; values.len()].join(", ");
                parts.push(format!("{field} IN ({placeholders})"));
                predicate.binds.extend(values.iter().map(to_bind));
            }
            Constraint::Overlaps { field, values } => {
                let placeholders = vec!["?"; values.len()].join(", ");
                parts.push(format!(
                    "EXISTS (SELECT 1 FROM json_each({field}) WHERE json_each.value IN ({placeholders}))"
                ));
                predicate.binds.extend(values.iter().map(to_bind));
            }
            Constraint::AtLeast { field, value } => {
                parts.push(format!("{field} >= ?"));
                predicate.binds.push(to_bind(value));
            }
            Constraint::AtMost { field, value } => {
                parts.push(format!("{field} <= ?"));
                predicate.binds.push(to_bind(value));
            }
        }
    }

    if !parts.is_empty() {
        predicate.clause = format!(" WHERE {}", parts.join(" AND "));
    }
    predicate
}

/// Render the ORDER BY / LIMIT / OFFSET tail of a list query.
pub fn render_tail(order: Option<OrderBy>, limit: Option<i64>, offset: Option<i64>) -> String {
    let mut tail = String::new();
    if let Some(order) = order {
        let direction = if order.descending { "DESC" } else { "ASC" };
        tail.push_str(&format!(" ORDER BY {} {direction}", order.field));
    }
    if let Some(limit) = limit {
        tail.push_str(&format!(" LIMIT {limit}"));
    }
    if let Some(offset) = offset {
        tail.push_str(&format!(" OFFSET {offset}"));
    }
    tail
}

/// Attach the predicate's bind arguments to a query, in render order.
pub fn bind_all<'q>(
    mut query: Query<'q, Sqlite, SqliteArguments<'q>>,
    binds: Vec<BindValue>,
) -> Query<'q, Sqlite, SqliteArguments<'q>> {
    for bind in binds {
        query = match bind {
            BindValue::Text(s) => query.bind(s),
            BindValue::Int(i) => query.bind(i),
            BindValue::Real(r) => query.bind(r),
        };
    }
    query
}

fn to_bind(value: &FilterValue) -> BindValue {
    match value {
        FilterValue::Text(s) => BindValue::Text(s.clone()),
        FilterValue::Int(i) => BindValue::Int(*i),
        FilterValue::Real(r) => BindValue::Real(*r),
        // Booleans are stored as INTEGER 0/1
        FilterValue::Bool(b) => BindValue::Int(*b as i64),
        FilterValue::Timestamp(ts) => BindValue::Text(ts.to_rfc3339()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn empty_constraints_render_no_clause() {
        let predicate = render(&[]);
        assert!(predicate.clause.is_empty());
        assert!(predicate.binds.is_empty());
    }

    #[test]
    fn eq_renders_placeholder() {
        let predicate = render(&[Constraint::Eq {
            field: "status",
            value: FilterValue::Text("active".to_string()),
        }]);
        assert_eq!(predicate.clause, " WHERE status = ?");
        assert_eq!(predicate.binds, vec![BindValue::Text("active".to_string())]);
    }

    #[test]
    fn any_of_renders_in_list() {
        let predicate = render(&[Constraint::AnyOf {
            field: "status",
            values: vec![
                FilterValue::Text("pending".to_string()),
                FilterValue::Text("scheduled".to_string()),
            ],
        }]);
        assert_eq!(predicate.clause, " WHERE status IN (?, ?)");
        assert_eq!(predicate.binds.len(), 2);
    }

    #[test]
    fn overlaps_renders_json_each_exists() {
        let predicate = render(&[Constraint::Overlaps {
            field: "tags",
            values: vec![FilterValue::Text("VIP".to_string())],
        }]);
        assert_eq!(
            predicate.clause,
            " WHERE EXISTS (SELECT 1 FROM json_each(tags) WHERE json_each.value IN (?))"
        );
    }

    #[test]
    fn conjunction_joins_with_and() {
        let predicate = render(&[
            Constraint::Eq {
                field: "status",
                value: FilterValue::Text("active".to_string()),
            },
            Constraint::Eq {
                field: "follow_up_required",
                value: FilterValue::Bool(true),
            },
        ]);
        assert_eq!(
            predicate.clause,
            " WHERE status = ? AND follow_up_required = ?"
        );
        assert_eq!(predicate.binds[1], BindValue::Int(1));
    }

    #[test]
    fn timestamp_binds_as_rfc3339_text() {
        let ts = Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap();
        let predicate = render(&[Constraint::AtLeast {
            field: "started_at",
            value: FilterValue::Timestamp(ts),
        }]);
        assert_eq!(predicate.clause, " WHERE started_at >= ?");
        assert_eq!(
            predicate.binds,
            vec![BindValue::Text("2025-03-01T00:00:00+00:00".to_string())]
        );
    }

    #[test]
    fn tail_renders_order_limit_offset() {
        let tail = render_tail(Some(OrderBy::desc("created_at")), Some(20), Some(40));
        assert_eq!(tail, " ORDER BY created_at DESC LIMIT 20 OFFSET 40");
        assert_eq!(render_tail(None, None, None), "");
    }
}
