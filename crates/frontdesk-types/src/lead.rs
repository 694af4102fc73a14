//! Lead types for Frontdesk.
//!
//! A lead is the weak-reference target of `Chat.lead_id` and
//! `Callback.lead_id`: a lookup-only contact record with no lifecycle.
//! Deleting a lead never cascades into chats or callbacks; a dangling
//! reference renders as "unknown" at presentation time.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A contact captured by the receptionist.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lead {
    pub id: Uuid,
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub company: Option<String>,
    pub source: Option<String>,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Intake payload for a new lead.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewLead {
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub company: Option<String>,
    pub source: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Closed update-field set for a lead.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LeadUpdate {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub company: Option<String>,
    pub source: Option<String>,
    pub tags: Option<Vec<String>>,
}
