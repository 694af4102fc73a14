//! Filter compiler: lowers dashboard filters into store-agnostic constraints.
//!
//! The compiler is purely declarative -- it builds a conjunctive constraint
//! list and delegates evaluation to the persistence layer. The one evaluation
//! helper here, [`matches`], runs a constraint list against an entity's JSON
//! form; the in-memory repositories use it so both stores share one
//! definition of what a constraint means.
//!
//! Edge case: an empty set for a set-valued filter compiles to *no*
//! constraint, i.e. it behaves identically to omitting the filter. This is a
//! deliberate decision to avoid surprising empty-result queries.

use chrono::{DateTime, Utc};
use frontdesk_types::filter::{CallbackFilter, ChatFilter, Constraint, FilterValue};
use serde_json::Value;

/// Compile a chat filter into its constraint list.
///
/// Field names match both the SQLite columns and the serialized JSON keys.
pub fn compile_chat_filter(filter: &ChatFilter) -> Vec<Constraint> {
    let mut constraints = Vec::new();

    push_any_of(
        &mut constraints,
        "status",
        filter.status.iter().map(|s| s.to_string()),
    );
    push_any_of(
        &mut constraints,
        "priority",
        filter.priority.iter().map(|p| p.to_string()),
    );
    push_any_of(
        &mut constraints,
        "chat_type",
        filter.chat_type.iter().map(|t| t.to_string()),
    );

    if let Some(agent_id) = filter.agent_id {
        constraints.push(Constraint::Eq {
            field: "agent_id",
            value: FilterValue::Text(agent_id.to_string()),
        });
    }
    if let Some(lead_id) = filter.lead_id {
        constraints.push(Constraint::Eq {
            field: "lead_id",
            value: FilterValue::Text(lead_id.to_string()),
        });
    }

    push_any_of(&mut constraints, "source", filter.source.iter().cloned());
    push_overlaps(&mut constraints, "tags", &filter.tags);

    if let Some(flag) = filter.follow_up_required {
        constraints.push(Constraint::Eq {
            field: "follow_up_required",
            value: FilterValue::Bool(flag),
        });
    }
    if let Some(after) = filter.started_after {
        constraints.push(Constraint::AtLeast {
            field: "started_at",
            value: FilterValue::Timestamp(after),
        });
    }
    if let Some(before) = filter.started_before {
        constraints.push(Constraint::AtMost {
            field: "started_at",
            value: FilterValue::Timestamp(before),
        });
    }

    constraints
}

/// Compile a callback filter into its constraint list.
pub fn compile_callback_filter(filter: &CallbackFilter) -> Vec<Constraint> {
    let mut constraints = Vec::new();

    push_any_of(
        &mut constraints,
        "status",
        filter.status.iter().map(|s| s.to_string()),
    );
    push_any_of(
        &mut constraints,
        "urgency",
        filter.urgency.iter().map(|u| u.to_string()),
    );
    push_any_of(
        &mut constraints,
        "outcome",
        filter.outcome.iter().map(|o| o.to_string()),
    );

    if let Some(agent_id) = filter.assigned_agent_id {
        constraints.push(Constraint::Eq {
            field: "assigned_agent_id",
            value: FilterValue::Text(agent_id.to_string()),
        });
    }
    if let Some(lead_id) = filter.lead_id {
        constraints.push(Constraint::Eq {
            field: "lead_id",
            value: FilterValue::Text(lead_id.to_string()),
        });
    }

    push_any_of(&mut constraints, "source", filter.source.iter().cloned());
    push_overlaps(&mut constraints, "tags", &filter.tags);

    if let Some(flag) = filter.follow_up_required {
        constraints.push(Constraint::Eq {
            field: "follow_up_required",
            value: FilterValue::Bool(flag),
        });
    }
    if let Some(after) = filter.created_after {
        constraints.push(Constraint::AtLeast {
            field: "created_at",
            value: FilterValue::Timestamp(after),
        });
    }
    if let Some(before) = filter.created_before {
        constraints.push(Constraint::AtMost {
            field: "created_at",
            value: FilterValue::Timestamp(before),
        });
    }

    constraints
}

fn push_any_of(
    constraints: &mut Vec<Constraint>,
    field: &'static str,
    values: impl Iterator<Item = String>,
) {
    let values: Vec<FilterValue> = values.map(FilterValue::Text).collect();
    if !values.is_empty() {
        constraints.push(Constraint::AnyOf { field, values });
    }
}

fn push_overlaps(constraints: &mut Vec<Constraint>, field: &'static str, tags: &[String]) {
    if !tags.is_empty() {
        constraints.push(Constraint::Overlaps {
            field,
            values: tags.iter().cloned().map(FilterValue::Text).collect(),
        });
    }
}

// ---------------------------------------------------------------------------
// In-memory evaluation
// ---------------------------------------------------------------------------

/// Evaluate a constraint list against an entity's JSON form.
///
/// Conjunctive: every constraint must hold. An empty list matches everything.
pub fn matches(constraints: &[Constraint], entity: &Value) -> bool {
    constraints.iter().all(|c| matches_one(c, entity))
}

fn matches_one(constraint: &Constraint, entity: &Value) -> bool {
    let field_value = entity.get(constraint.field()).unwrap_or(&Value::Null);

    match constraint {
        Constraint::Eq { value, .. } => value_eq(field_value, value),
        Constraint::AnyOf { values, .. } => values.iter().any(|v| value_eq(field_value, v)),
        Constraint::Overlaps { values, .. } => match field_value.as_array() {
            Some(items) => items
                .iter()
                .any(|item| values.iter().any(|v| value_eq(item, v))),
            None => false,
        },
        Constraint::AtLeast { value, .. } => {
            value_cmp(field_value, value).is_some_and(|ord| ord.is_ge())
        }
        Constraint::AtMost { value, .. } => {
            value_cmp(field_value, value).is_some_and(|ord| ord.is_le())
        }
    }
}

fn value_eq(entity: &Value, filter: &FilterValue) -> bool {
    match filter {
        FilterValue::Text(s) => entity.as_str() == Some(s.as_str()),
        FilterValue::Bool(b) => entity.as_bool() == Some(*b),
        FilterValue::Int(i) => entity.as_f64() == Some(*i as f64),
        FilterValue::Real(r) => entity.as_f64() == Some(*r),
        FilterValue::Timestamp(ts) => parse_ts(entity).map(|t| t == *ts).unwrap_or(false),
    }
}

fn value_cmp(entity: &Value, filter: &FilterValue) -> Option<std::cmp::Ordering> {
    match filter {
        FilterValue::Int(i) => entity.as_f64().and_then(|v| v.partial_cmp(&(*i as f64))),
        FilterValue::Real(r) => entity.as_f64().and_then(|v| v.partial_cmp(r)),
        FilterValue::Timestamp(ts) => parse_ts(entity).map(|t| t.cmp(ts)),
        FilterValue::Text(s) => entity.as_str().map(|v| v.cmp(s.as_str())),
        FilterValue::Bool(_) => None,
    }
}

fn parse_ts(value: &Value) -> Option<DateTime<Utc>> {
    value
        .as_str()
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use frontdesk_types::chat::ChatStatus;
    use serde_json::json;
    use uuid::Uuid;

    #[test]
    fn empty_filter_compiles_to_no_constraints() {
        let constraints = compile_chat_filter(&ChatFilter::default());
        assert!(constraints.is_empty());
    }

    #[test]
    fn empty_status_set_behaves_like_omitted_status() {
        // An empty set must not constrain anything -- both filters below
        // match every entity regardless of status.
        let omitted = compile_chat_filter(&ChatFilter::default());
        let empty_set = compile_chat_filter(&ChatFilter {
            status: Vec::new(),
            ..Default::default()
        });
        assert_eq!(omitted, empty_set);

        let entity = json!({"status": "abandoned"});
        assert!(matches(&empty_set, &entity));
    }

    #[test]
    fn status_set_compiles_to_any_of() {
        let constraints = compile_chat_filter(&ChatFilter {
            status: vec![ChatStatus::Active, ChatStatus::Paused],
            ..Default::default()
        });
        assert_eq!(constraints.len(), 1);
        assert!(matches(&constraints, &json!({"status": "paused"})));
        assert!(!matches(&constraints, &json!({"status": "closed"})));
    }

    #[test]
    fn constraints_are_conjunctive() {
        let agent = Uuid::now_v7();
        let constraints = compile_chat_filter(&ChatFilter {
            status: vec![ChatStatus::Active],
            agent_id: Some(agent),
            ..Default::default()
        });
        assert_eq!(constraints.len(), 2);

        let both = json!({"status": "active", "agent_id": agent.to_string()});
        let status_only = json!({"status": "active", "agent_id": Uuid::now_v7().to_string()});
        assert!(matches(&constraints, &both));
        assert!(!matches(&constraints, &status_only));
    }

    #[test]
    fn tag_overlap_requires_non_empty_intersection() {
        let constraints = compile_chat_filter(&ChatFilter {
            tags: vec!["VIP".to_string()],
            ..Default::default()
        });

        assert!(matches(&constraints, &json!({"tags": ["VIP", "repeat"]})));
        assert!(!matches(&constraints, &json!({"tags": ["repeat"]})));
        assert!(!matches(&constraints, &json!({"tags": []})));
    }

    #[test]
    fn multi_tag_overlap_matches_any_shared_tag() {
        let constraints = compile_chat_filter(&ChatFilter {
            tags: vec!["VIP".to_string(), "billing".to_string()],
            ..Default::default()
        });
        assert!(matches(&constraints, &json!({"tags": ["billing"]})));
        assert!(matches(&constraints, &json!({"tags": ["VIP"]})));
        assert!(!matches(&constraints, &json!({"tags": ["support"]})));
    }

    #[test]
    fn date_range_bounds_are_inclusive() {
        let after = Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap();
        let before = Utc.with_ymd_and_hms(2025, 3, 31, 23, 59, 59).unwrap();
        let constraints = compile_chat_filter(&ChatFilter {
            started_after: Some(after),
            started_before: Some(before),
            ..Default::default()
        });

        let on_lower = json!({"started_at": after.to_rfc3339()});
        let on_upper = json!({"started_at": before.to_rfc3339()});
        let outside = json!({"started_at": "2025-04-01T00:00:00+00:00"});
        assert!(matches(&constraints, &on_lower));
        assert!(matches(&constraints, &on_upper));
        assert!(!matches(&constraints, &outside));
    }

    #[test]
    fn follow_up_flag_matches_bool() {
        let constraints = compile_callback_filter(&CallbackFilter {
            follow_up_required: Some(true),
            ..Default::default()
        });
        assert!(matches(&constraints, &json!({"follow_up_required": true})));
        assert!(!matches(&constraints, &json!({"follow_up_required": false})));
    }

    #[test]
    fn missing_field_never_matches_eq() {
        let constraints = compile_callback_filter(&CallbackFilter {
            assigned_agent_id: Some(Uuid::now_v7()),
            ..Default::default()
        });
        assert!(!matches(&constraints, &json!({"assigned_agent_id": null})));
        assert!(!matches(&constraints, &json!({})));
    }
}
