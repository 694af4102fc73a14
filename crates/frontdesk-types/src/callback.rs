//! Callback request types for Frontdesk.
//!
//! A callback is a client's request to be phoned back by an operator. It moves
//! through `pending -> scheduled -> completed | cancelled | no_answer`
//! (scheduling is optional; `no_answer` may be re-scheduled). Attempt tracking
//! is independent of status: a callback can be dialed several times while it is
//! still pending or scheduled.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::fmt;
use std::str::FromStr;

/// Lifecycle status of a callback request.
///
/// Maps to the CHECK constraint in the SQLite schema:
/// `CHECK (status IN ('pending', 'scheduled', 'completed', 'cancelled', 'no_answer'))`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallbackStatus {
    Pending,
    Scheduled,
    Completed,
    Cancelled,
    NoAnswer,
}

impl CallbackStatus {
    /// Whether this status permits no further transitions.
    ///
    /// `no_answer` is deliberately not terminal: a missed callback may be
    /// re-scheduled and re-attempted.
    pub fn is_terminal(&self) -> bool {
        matches!(self, CallbackStatus::Completed | CallbackStatus::Cancelled)
    }
}

impl fmt::Display for CallbackStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CallbackStatus::Pending => write!(f, "pending"),
            CallbackStatus::Scheduled => write!(f, "scheduled"),
            CallbackStatus::Completed => write!(f, "completed"),
            CallbackStatus::Cancelled => write!(f, "cancelled"),
            CallbackStatus::NoAnswer => write!(f, "no_answer"),
        }
    }
}

impl FromStr for CallbackStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(CallbackStatus::Pending),
            "scheduled" => Ok(CallbackStatus::Scheduled),
            "completed" => Ok(CallbackStatus::Completed),
            "cancelled" => Ok(CallbackStatus::Cancelled),
            "no_answer" => Ok(CallbackStatus::NoAnswer),
            other => Err(format!("invalid callback status: '{other}'")),
        }
    }
}

impl Default for CallbackStatus {
    fn default() -> Self {
        CallbackStatus::Pending
    }
}

/// How urgently the client wants to be called back.
///
/// Also used for `Chat.customer_urgency`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    Urgent,
    Normal,
    Low,
}

impl fmt::Display for Urgency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Urgency::Urgent => write!(f, "urgent"),
            Urgency::Normal => write!(f, "normal"),
            Urgency::Low => write!(f, "low"),
        }
    }
}

impl FromStr for Urgency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "urgent" => Ok(Urgency::Urgent),
            "normal" => Ok(Urgency::Normal),
            "low" => Ok(Urgency::Low),
            other => Err(format!("invalid urgency: '{other}'")),
        }
    }
}

impl Default for Urgency {
    fn default() -> Self {
        Urgency::Normal
    }
}

/// Preferred window of the day for the return call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeRange {
    Morning,
    Afternoon,
    Evening,
    Anytime,
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeRange::Morning => write!(f, "morning"),
            TimeRange::Afternoon => write!(f, "afternoon"),
            TimeRange::Evening => write!(f, "evening"),
            TimeRange::Anytime => write!(f, "anytime"),
        }
    }
}

impl FromStr for TimeRange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "morning" => Ok(TimeRange::Morning),
            "afternoon" => Ok(TimeRange::Afternoon),
            "evening" => Ok(TimeRange::Evening),
            "anytime" => Ok(TimeRange::Anytime),
            other => Err(format!("invalid time range: '{other}'")),
        }
    }
}

impl Default for TimeRange {
    fn default() -> Self {
        TimeRange::Anytime
    }
}

/// What happened on a call attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallbackOutcome {
    Successful,
    NoAnswer,
    Busy,
    WrongNumber,
    CallbackRequested,
    NotInterested,
    Voicemail,
    CallbackScheduled,
}

impl fmt::Display for CallbackOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CallbackOutcome::Successful => write!(f, "successful"),
            CallbackOutcome::NoAnswer => write!(f, "no_answer"),
            CallbackOutcome::Busy => write!(f, "busy"),
            CallbackOutcome::WrongNumber => write!(f, "wrong_number"),
            CallbackOutcome::CallbackRequested => write!(f, "callback_requested"),
            CallbackOutcome::NotInterested => write!(f, "not_interested"),
            CallbackOutcome::Voicemail => write!(f, "voicemail"),
            CallbackOutcome::CallbackScheduled => write!(f, "callback_scheduled"),
        }
    }
}

impl FromStr for CallbackOutcome {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "successful" => Ok(CallbackOutcome::Successful),
            "no_answer" => Ok(CallbackOutcome::NoAnswer),
            "busy" => Ok(CallbackOutcome::Busy),
            "wrong_number" => Ok(CallbackOutcome::WrongNumber),
            "callback_requested" => Ok(CallbackOutcome::CallbackRequested),
            "not_interested" => Ok(CallbackOutcome::NotInterested),
            "voicemail" => Ok(CallbackOutcome::Voicemail),
            "callback_scheduled" => Ok(CallbackOutcome::CallbackScheduled),
            other => Err(format!("invalid callback outcome: '{other}'")),
        }
    }
}

/// A client's request to be called back by an operator.
///
/// `lead_id` and `assigned_agent_id` are weak references: lookups only, no
/// ownership, and deleting the referenced entity never cascades here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Callback {
    pub id: Uuid,
    pub lead_id: Option<Uuid>,
    pub client_name: String,
    pub client_phone: String,
    pub client_email: Option<String>,
    pub company_name: Option<String>,
    pub preferred_callback_time: Option<DateTime<Utc>>,
    pub preferred_time_range: TimeRange,
    pub timezone: Option<String>,
    pub urgency: Urgency,
    pub source: Option<String>,
    pub tags: Vec<String>,
    pub status: CallbackStatus,
    /// 1 = highest, 10 = lowest. Validated to 1..=10 on every write.
    pub priority: u8,
    pub attempt_count: u32,
    pub attempted_at: Option<DateTime<Utc>>,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub outcome: Option<CallbackOutcome>,
    pub outcome_notes: Option<String>,
    pub follow_up_required: bool,
    pub follow_up_date: Option<DateTime<Utc>>,
    pub assigned_agent_id: Option<Uuid>,
    pub agent_notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Intake payload for a new callback request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewCallback {
    pub lead_id: Option<Uuid>,
    pub client_name: String,
    pub client_phone: String,
    pub client_email: Option<String>,
    pub company_name: Option<String>,
    pub preferred_callback_time: Option<DateTime<Utc>>,
    pub preferred_time_range: Option<TimeRange>,
    pub timezone: Option<String>,
    pub urgency: Option<Urgency>,
    pub source: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub priority: Option<u8>,
}

/// Closed update-field set for a callback.
///
/// Only these fields are writable through the update operation; lifecycle
/// fields (status, attempts, timestamps) change exclusively through the named
/// lifecycle operations.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CallbackUpdate {
    pub client_name: Option<String>,
    pub client_phone: Option<String>,
    pub client_email: Option<String>,
    pub company_name: Option<String>,
    pub preferred_callback_time: Option<DateTime<Utc>>,
    pub preferred_time_range: Option<TimeRange>,
    pub timezone: Option<String>,
    pub urgency: Option<Urgency>,
    pub priority: Option<u8>,
    pub tags: Option<Vec<String>>,
    pub follow_up_required: Option<bool>,
    pub follow_up_date: Option<DateTime<Utc>>,
    pub assigned_agent_id: Option<Uuid>,
    pub agent_notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_callback_status_roundtrip() {
        for status in [
            CallbackStatus::Pending,
            CallbackStatus::Scheduled,
            CallbackStatus::Completed,
            CallbackStatus::Cancelled,
            CallbackStatus::NoAnswer,
        ] {
            let s = status.to_string();
            let parsed: CallbackStatus = s.parse().unwrap();
            assert_eq!(status, parsed);
        }
    }

    #[test]
    fn test_callback_status_serde_snake_case() {
        let json = serde_json::to_string(&CallbackStatus::NoAnswer).unwrap();
        assert_eq!(json, "\"no_answer\"");
        let parsed: CallbackStatus = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, CallbackStatus::NoAnswer);
    }

    #[test]
    fn test_callback_status_terminal() {
        assert!(CallbackStatus::Completed.is_terminal());
        assert!(CallbackStatus::Cancelled.is_terminal());
        assert!(!CallbackStatus::NoAnswer.is_terminal());
        assert!(!CallbackStatus::Pending.is_terminal());
        assert!(!CallbackStatus::Scheduled.is_terminal());
    }

    #[test]
    fn test_callback_status_rejects_unknown() {
        assert!("archived".parse::<CallbackStatus>().is_err());
    }

    #[test]
    fn test_outcome_roundtrip() {
        for outcome in [
            CallbackOutcome::Successful,
            CallbackOutcome::NoAnswer,
            CallbackOutcome::Busy,
            CallbackOutcome::WrongNumber,
            CallbackOutcome::CallbackRequested,
            CallbackOutcome::NotInterested,
            CallbackOutcome::Voicemail,
            CallbackOutcome::CallbackScheduled,
        ] {
            let parsed: CallbackOutcome = outcome.to_string().parse().unwrap();
            assert_eq!(outcome, parsed);
        }
    }

    #[test]
    fn test_defaults() {
        assert_eq!(CallbackStatus::default(), CallbackStatus::Pending);
        assert_eq!(Urgency::default(), Urgency::Normal);
        assert_eq!(TimeRange::default(), TimeRange::Anytime);
    }
}
