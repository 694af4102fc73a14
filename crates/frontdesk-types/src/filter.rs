//! Filter inputs and compiled query constraints.
//!
//! Dashboard views filter chats and callbacks by status sets, date ranges, tag
//! overlap, and assigned agent. The filter structs here are the caller-facing
//! shapes; the filter compiler in `frontdesk-core` lowers them into a
//! conjunctive list of [`Constraint`]s, which the persistence layer evaluates
//! (SQL WHERE rendering for SQLite, JSON matching for the in-memory store).
//! The shapes are declarative only -- nothing here executes a query.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

use crate::callback::{CallbackOutcome, CallbackStatus, Urgency};
use crate::chat::{ChatPriority, ChatStatus, ChatType};

/// Multi-field filter over chats. Every field is optional; empty sets impose
/// no constraint (an empty `status` matches every status).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatFilter {
    #[serde(default)]
    pub status: Vec<ChatStatus>,
    #[serde(default)]
    pub priority: Vec<ChatPriority>,
    #[serde(default)]
    pub chat_type: Vec<ChatType>,
    pub agent_id: Option<Uuid>,
    pub lead_id: Option<Uuid>,
    #[serde(default)]
    pub source: Vec<String>,
    /// Overlap semantics: match when the chat's tag set intersects this set.
    #[serde(default)]
    pub tags: Vec<String>,
    pub follow_up_required: Option<bool>,
    /// Inclusive lower bound on `started_at`.
    pub started_after: Option<DateTime<Utc>>,
    /// Inclusive upper bound on `started_at`.
    pub started_before: Option<DateTime<Utc>>,
}

/// Multi-field filter over callbacks. Same semantics as [`ChatFilter`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CallbackFilter {
    #[serde(default)]
    pub status: Vec<CallbackStatus>,
    #[serde(default)]
    pub urgency: Vec<Urgency>,
    #[serde(default)]
    pub outcome: Vec<CallbackOutcome>,
    pub assigned_agent_id: Option<Uuid>,
    pub lead_id: Option<Uuid>,
    #[serde(default)]
    pub source: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub follow_up_required: Option<bool>,
    /// Inclusive lower bound on `created_at`.
    pub created_after: Option<DateTime<Utc>>,
    /// Inclusive upper bound on `created_at`.
    pub created_before: Option<DateTime<Utc>>,
}

/// A typed scalar usable in a compiled constraint.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    Text(String),
    Int(i64),
    Real(f64),
    Bool(bool),
    Timestamp(DateTime<Utc>),
}

/// One predicate of a compiled filter. A filter compiles to a conjunctive
/// (AND) list of these; set-valued filters use membership-OR internally.
///
/// `field` is always a compiler-owned static name matching both the SQLite
/// column and the serialized JSON key -- never caller input.
#[derive(Debug, Clone, PartialEq)]
pub enum Constraint {
    /// `field = value`
    Eq {
        field: &'static str,
        value: FilterValue,
    },
    /// `field IN (values)`
    AnyOf {
        field: &'static str,
        values: Vec<FilterValue>,
    },
    /// Non-empty intersection between a set-valued field and `values`.
    Overlaps {
        field: &'static str,
        values: Vec<FilterValue>,
    },
    /// `field >= value` (inclusive)
    AtLeast {
        field: &'static str,
        value: FilterValue,
    },
    /// `field <= value` (inclusive)
    AtMost {
        field: &'static str,
        value: FilterValue,
    },
}

impl Constraint {
    pub fn field(&self) -> &'static str {
        match self {
            Constraint::Eq { field, .. }
            | Constraint::AnyOf { field, .. }
            | Constraint::Overlaps { field, .. }
            | Constraint::AtLeast { field, .. }
            | Constraint::AtMost { field, .. } => field,
        }
    }
}

/// Sort directive accompanying a list call. Fields come from the same fixed
/// set as constraint fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderBy {
    pub field: &'static str,
    pub descending: bool,
}

impl OrderBy {
    pub fn desc(field: &'static str) -> Self {
        Self {
            field,
            descending: true,
        }
    }

    pub fn asc(field: &'static str) -> Self {
        Self {
            field,
            descending: false,
        }
    }
}

/// A text-search match.
///
/// Relevance is a placeholder constant (always 1.0): search is a plain
/// case-insensitive substring match in arbitrary order, not ranked retrieval.
#[derive(Debug, Clone, Serialize)]
pub struct SearchHit<T> {
    pub item: T,
    pub relevance: f32,
}

impl<T> SearchHit<T> {
    pub fn new(item: T) -> Self {
        Self {
            item,
            relevance: 1.0,
        }
    }
}
