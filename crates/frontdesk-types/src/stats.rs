//! Aggregate statistics shapes for the dashboard.
//!
//! Breakdowns carry one named counter per enum variant instead of a
//! string-keyed map, so an unknown value is a compile-time error rather than a
//! silent no-op. Optional classifications (sentiment, resolution, outcome)
//! only count entities where the field is present.

use serde::Serialize;

/// Chat counts partitioned by status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ChatStatusCounts {
    pub active: u64,
    pub paused: u64,
    pub closed: u64,
    pub transferred: u64,
    pub abandoned: u64,
}

/// Chat counts partitioned by priority.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ChatPriorityCounts {
    pub low: u64,
    pub normal: u64,
    pub high: u64,
    pub urgent: u64,
}

/// Chat counts partitioned by type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ChatTypeCounts {
    pub inbound: u64,
    pub outbound: u64,
    pub transfer: u64,
    pub callback: u64,
}

/// Chat counts partitioned by classified sentiment (present values only).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SentimentCounts {
    pub positive: u64,
    pub neutral: u64,
    pub negative: u64,
    pub frustrated: u64,
}

/// Chat counts partitioned by resolution status (present values only).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ResolutionCounts {
    pub resolved: u64,
    pub unresolved: u64,
    pub escalated: u64,
    pub transferred: u64,
}

/// Cross-chat statistics computed from an in-memory snapshot.
///
/// All averages and rates are 0.0 (never NaN) for an empty snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChatStats {
    pub total: u64,
    pub by_status: ChatStatusCounts,
    pub by_priority: ChatPriorityCounts,
    pub by_type: ChatTypeCounts,
    pub by_sentiment: SentimentCounts,
    pub by_resolution: ResolutionCounts,
    pub average_duration_seconds: f64,
    pub average_messages: f64,
    /// Mean over chats where `customer_satisfaction` is present.
    pub average_satisfaction: f64,
    /// Percentage of chats whose resolution is `resolved`.
    pub resolution_rate: f64,
    pub follow_ups_required: u64,
}

/// Callback counts partitioned by status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CallbackStatusCounts {
    pub pending: u64,
    pub scheduled: u64,
    pub completed: u64,
    pub cancelled: u64,
    pub no_answer: u64,
}

/// Callback counts partitioned by urgency.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct UrgencyCounts {
    pub urgent: u64,
    pub normal: u64,
    pub low: u64,
}

/// Callback counts partitioned by recorded outcome (present values only).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct OutcomeCounts {
    pub successful: u64,
    pub no_answer: u64,
    pub busy: u64,
    pub wrong_number: u64,
    pub callback_requested: u64,
    pub not_interested: u64,
    pub voicemail: u64,
    pub callback_scheduled: u64,
}

/// Cross-callback statistics computed from an in-memory snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CallbackStats {
    pub total: u64,
    pub by_status: CallbackStatusCounts,
    pub by_urgency: UrgencyCounts,
    pub by_outcome: OutcomeCounts,
    pub average_attempts: f64,
    /// Percentage of callbacks whose status is `completed`.
    pub completion_rate: f64,
    pub follow_ups_required: u64,
}
