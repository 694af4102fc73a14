//! Query parameter shapes for list endpoints.
//!
//! Set-valued filters arrive as comma-separated strings
//! (`?status=active,paused`) and are parsed into their typed enums here.
//! An unknown value is a 400 VALIDATION_ERROR, never silently dropped.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

use frontdesk_types::filter::{CallbackFilter, ChatFilter};

use crate::http::error::AppError;

/// Parse a comma-separated list into typed enum values.
///
/// Empty/missing input yields an empty set, which imposes no constraint.
fn parse_set<T: std::str::FromStr<Err = String>>(raw: &Option<String>) -> Result<Vec<T>, AppError> {
    match raw {
        None => Ok(Vec::new()),
        Some(raw) => raw
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| s.parse().map_err(AppError::Validation))
            .collect(),
    }
}

fn parse_strings(raw: &Option<String>) -> Vec<String> {
    raw.as_deref()
        .map(|raw| {
            raw.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// Query parameters for the chat list endpoint.
#[derive(Debug, Deserialize, Default)]
pub struct ChatListQuery {
    pub status: Option<String>,
    pub priority: Option<String>,
    pub chat_type: Option<String>,
    pub agent_id: Option<Uuid>,
    pub lead_id: Option<Uuid>,
    pub source: Option<String>,
    pub tags: Option<String>,
    pub follow_up_required: Option<bool>,
    pub started_after: Option<DateTime<Utc>>,
    pub started_before: Option<DateTime<Utc>>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl ChatListQuery {
    pub fn into_filter(self) -> Result<ChatFilter, AppError> {
        Ok(ChatFilter {
            status: parse_set(&self.status)?,
            priority: parse_set(&self.priority)?,
            chat_type: parse_set(&self.chat_type)?,
            agent_id: self.agent_id,
            lead_id: self.lead_id,
            source: parse_strings(&self.source),
            tags: parse_strings(&self.tags),
            follow_up_required: self.follow_up_required,
            started_after: self.started_after,
            started_before: self.started_before,
        })
    }
}

/// Query parameters for the callback list endpoint.
#[derive(Debug, Deserialize, Default)]
pub struct CallbackListQuery {
    pub status: Option<String>,
    pub urgency: Option<String>,
    pub outcome: Option<String>,
    pub assigned_agent_id: Option<Uuid>,
    pub lead_id: Option<Uuid>,
    pub source: Option<String>,
    pub tags: Option<String>,
    pub follow_up_required: Option<bool>,
    pub created_after: Option<DateTime<Utc>>,
    pub created_before: Option<DateTime<Utc>>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl CallbackListQuery {
    pub fn into_filter(self) -> Result<CallbackFilter, AppError> {
        Ok(CallbackFilter {
            status: parse_set(&self.status)?,
            urgency: parse_set(&self.urgency)?,
            outcome: parse_set(&self.outcome)?,
            assigned_agent_id: self.assigned_agent_id,
            lead_id: self.lead_id,
            source: parse_strings(&self.source),
            tags: parse_strings(&self.tags),
            follow_up_required: self.follow_up_required,
            created_after: self.created_after,
            created_before: self.created_before,
        })
    }
}

/// Query parameters for search endpoints.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: String,
    #[serde(default = "default_search_limit")]
    pub limit: i64,
}

fn default_search_limit() -> i64 {
    20
}

/// Query parameters for plain paginated listings.
#[derive(Debug, Deserialize, Default)]
pub struct PageQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use frontdesk_types::chat::{ChatPriority, ChatStatus};

    #[test]
    fn comma_separated_sets_parse() {
        let query = ChatListQuery {
            status: Some("active, paused".to_string()),
            priority: Some("urgent".to_string()),
            ..Default::default()
        };
        let filter = query.into_filter().unwrap();
        assert_eq!(filter.status, vec![ChatStatus::Active, ChatStatus::Paused]);
        assert_eq!(filter.priority, vec![ChatPriority::Urgent]);
    }

    #[test]
    fn unknown_value_is_rejected() {
        let query = ChatListQuery {
            status: Some("active,archived".to_string()),
            ..Default::default()
        };
        let err = query.into_filter().unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn missing_sets_impose_no_constraint() {
        let filter = ChatListQuery::default().into_filter().unwrap();
        assert!(filter.status.is_empty());
        assert!(filter.tags.is_empty());
    }

    #[test]
    fn tags_split_and_trim() {
        let query = CallbackListQuery {
            tags: Some("VIP, repeat-caller".to_string()),
            ..Default::default()
        };
        let filter = query.into_filter().unwrap();
        assert_eq!(
            filter.tags,
            vec!["VIP".to_string(), "repeat-caller".to_string()]
        );
    }
}
