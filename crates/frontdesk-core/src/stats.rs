//! Aggregator: pure snapshot reductions for the dashboard.
//!
//! Deterministic, side-effect-free single passes over an in-memory
//! collection; no store access beyond the caller's initial fetch. The only
//! guarded failure mode is the empty-denominator division -- every average
//! and rate is 0.0 for an empty snapshot, never NaN and never an error.

use frontdesk_types::callback::{Callback, CallbackOutcome, CallbackStatus, Urgency};
use frontdesk_types::chat::{
    Chat, ChatPriority, ChatStatus, ChatType, ResolutionStatus, Sentiment,
};
use frontdesk_types::stats::{CallbackStats, ChatStats};

fn ratio(numerator: u64, denominator: u64) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

/// Compute cross-chat statistics from a snapshot.
pub fn chat_stats(chats: &[Chat]) -> ChatStats {
    let mut stats = ChatStats {
        total: chats.len() as u64,
        ..Default::default()
    };

    let mut duration_sum: u64 = 0;
    let mut message_sum: u64 = 0;
    let mut satisfaction_sum: u64 = 0;
    let mut satisfaction_count: u64 = 0;

    for chat in chats {
        match chat.status {
            ChatStatus::Active => stats.by_status.active += 1,
            ChatStatus::Paused => stats.by_status.paused += 1,
            ChatStatus::Closed => stats.by_status.closed += 1,
            ChatStatus::Transferred => stats.by_status.transferred += 1,
            ChatStatus::Abandoned => stats.by_status.abandoned += 1,
        }
        match chat.priority {
            ChatPriority::Low => stats.by_priority.low += 1,
            ChatPriority::Normal => stats.by_priority.normal += 1,
            ChatPriority::High => stats.by_priority.high += 1,
            ChatPriority::Urgent => stats.by_priority.urgent += 1,
        }
        match chat.chat_type {
            ChatType::Inbound => stats.by_type.inbound += 1,
            ChatType::Outbound => stats.by_type.outbound += 1,
            ChatType::Transfer => stats.by_type.transfer += 1,
            ChatType::Callback => stats.by_type.callback += 1,
        }
        if let Some(sentiment) = chat.customer_sentiment {
            match sentiment {
                Sentiment::Positive => stats.by_sentiment.positive += 1,
                Sentiment::Neutral => stats.by_sentiment.neutral += 1,
                Sentiment::Negative => stats.by_sentiment.negative += 1,
                Sentiment::Frustrated => stats.by_sentiment.frustrated += 1,
            }
        }
        if let Some(resolution) = chat.resolution_status {
            match resolution {
                ResolutionStatus::Resolved => stats.by_resolution.resolved += 1,
                ResolutionStatus::Unresolved => stats.by_resolution.unresolved += 1,
                ResolutionStatus::Escalated => stats.by_resolution.escalated += 1,
                ResolutionStatus::Transferred => stats.by_resolution.transferred += 1,
            }
        }

        duration_sum += chat.duration_seconds as u64;
        message_sum += chat.message_count as u64;
        if let Some(satisfaction) = chat.customer_satisfaction {
            satisfaction_sum += satisfaction as u64;
            satisfaction_count += 1;
        }
        if chat.follow_up_required {
            stats.follow_ups_required += 1;
        }
    }

    stats.average_duration_seconds = ratio(duration_sum, stats.total);
    stats.average_messages = ratio(message_sum, stats.total);
    // Present-values-only mean: the denominator is how many chats carry a
    // satisfaction score, not the total.
    stats.average_satisfaction = ratio(satisfaction_sum, satisfaction_count);
    stats.resolution_rate = ratio(stats.by_resolution.resolved, stats.total) * 100.0;

    stats
}

/// Compute cross-callback statistics from a snapshot.
pub fn callback_stats(callbacks: &[Callback]) -> CallbackStats {
    let mut stats = CallbackStats {
        total: callbacks.len() as u64,
        ..Default::default()
    };

    let mut attempt_sum: u64 = 0;

    for callback in callbacks {
        match callback.status {
            CallbackStatus::Pending => stats.by_status.pending += 1,
            CallbackStatus::Scheduled => stats.by_status.scheduled += 1,
            CallbackStatus::Completed => stats.by_status.completed += 1,
            CallbackStatus::Cancelled => stats.by_status.cancelled += 1,
            CallbackStatus::NoAnswer => stats.by_status.no_answer += 1,
        }
        match callback.urgency {
            Urgency::Urgent => stats.by_urgency.urgent += 1,
            Urgency::Normal => stats.by_urgency.normal += 1,
            Urgency::Low => stats.by_urgency.low += 1,
        }
        if let Some(outcome) = callback.outcome {
            match outcome {
                CallbackOutcome::Successful => stats.by_outcome.successful += 1,
                CallbackOutcome::NoAnswer => stats.by_outcome.no_answer += 1,
                CallbackOutcome::Busy => stats.by_outcome.busy += 1,
                CallbackOutcome::WrongNumber => stats.by_outcome.wrong_number += 1,
                CallbackOutcome::CallbackRequested => stats.by_outcome.callback_requested += 1,
                CallbackOutcome::NotInterested => stats.by_outcome.not_interested += 1,
                CallbackOutcome::Voicemail => stats.by_outcome.voicemail += 1,
                CallbackOutcome::CallbackScheduled => stats.by_outcome.callback_scheduled += 1,
            }
        }
        attempt_sum += callback.attempt_count as u64;
        if callback.follow_up_required {
            stats.follow_ups_required += 1;
        }
    }

    stats.average_attempts = ratio(attempt_sum, stats.total);
    stats.completion_rate = ratio(stats.by_status.completed, stats.total) * 100.0;

    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use frontdesk_types::callback::TimeRange;
    use uuid::Uuid;

    fn make_chat(status: ChatStatus) -> Chat {
        let now = Utc::now();
        Chat {
            id: Uuid::now_v7(),
            chat_session_id: Uuid::now_v7().to_string(),
            lead_id: None,
            agent_id: None,
            status,
            priority: ChatPriority::Normal,
            chat_type: ChatType::Inbound,
            source: None,
            tags: Vec::new(),
            started_at: now,
            last_activity_at: now,
            ended_at: None,
            duration_seconds: 0,
            chat_history: Vec::new(),
            message_count: 0,
            last_message: None,
            last_message_at: None,
            customer_sentiment: None,
            customer_intent: None,
            customer_urgency: None,
            resolution_status: None,
            resolution_notes: None,
            follow_up_required: false,
            follow_up_date: None,
            customer_satisfaction: None,
            agent_rating: None,
            quality_score: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn make_callback(status: CallbackStatus, attempts: u32) -> Callback {
        let now = Utc::now();
        Callback {
            id: Uuid::now_v7(),
            lead_id: None,
            client_name: "c".to_string(),
            client_phone: "+1".to_string(),
            client_email: None,
            company_name: None,
            preferred_callback_time: None,
            preferred_time_range: TimeRange::Anytime,
            timezone: None,
            urgency: Urgency::Normal,
            source: None,
            tags: Vec::new(),
            status,
            priority: 5,
            attempt_count: attempts,
            attempted_at: None,
            scheduled_at: None,
            completed_at: None,
            outcome: None,
            outcome_notes: None,
            follow_up_required: false,
            follow_up_date: None,
            assigned_agent_id: None,
            agent_notes: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn empty_snapshot_yields_zeroes_not_nan() {
        let stats = chat_stats(&[]);
        assert_eq!(stats.total, 0);
        assert_eq!(stats.average_duration_seconds, 0.0);
        assert_eq!(stats.average_messages, 0.0);
        assert_eq!(stats.average_satisfaction, 0.0);
        assert_eq!(stats.resolution_rate, 0.0);

        let stats = callback_stats(&[]);
        assert_eq!(stats.total, 0);
        assert_eq!(stats.average_attempts, 0.0);
        assert_eq!(stats.completion_rate, 0.0);
    }

    #[test]
    fn aggregator_is_idempotent() {
        let chats = vec![
            make_chat(ChatStatus::Active),
            make_chat(ChatStatus::Closed),
            Chat {
                customer_satisfaction: Some(4),
                duration_seconds: 120,
                message_count: 7,
                ..make_chat(ChatStatus::Closed)
            },
        ];
        assert_eq!(chat_stats(&chats), chat_stats(&chats));

        let callbacks = vec![
            make_callback(CallbackStatus::Pending, 0),
            make_callback(CallbackStatus::Completed, 3),
        ];
        assert_eq!(callback_stats(&callbacks), callback_stats(&callbacks));
    }

    #[test]
    fn status_counts_sum_to_total() {
        let chats = vec![
            make_chat(ChatStatus::Active),
            make_chat(ChatStatus::Active),
            make_chat(ChatStatus::Paused),
            make_chat(ChatStatus::Abandoned),
        ];
        let stats = chat_stats(&chats);
        let sum = stats.by_status.active
            + stats.by_status.paused
            + stats.by_status.closed
            + stats.by_status.transferred
            + stats.by_status.abandoned;
        assert_eq!(sum, stats.total);
        assert_eq!(stats.by_status.active, 2);
    }

    #[test]
    fn satisfaction_averages_over_present_values_only() {
        let chats = vec![
            Chat {
                customer_satisfaction: Some(5),
                ..make_chat(ChatStatus::Closed)
            },
            Chat {
                customer_satisfaction: Some(3),
                ..make_chat(ChatStatus::Closed)
            },
            make_chat(ChatStatus::Closed),
            make_chat(ChatStatus::Closed),
        ];
        let stats = chat_stats(&chats);
        // Denominator is 2 (present values), not 4.
        assert_eq!(stats.average_satisfaction, 4.0);
    }

    #[test]
    fn resolution_rate_is_percentage_of_resolved() {
        let chats = vec![
            Chat {
                resolution_status: Some(ResolutionStatus::Resolved),
                ..make_chat(ChatStatus::Closed)
            },
            Chat {
                resolution_status: Some(ResolutionStatus::Escalated),
                ..make_chat(ChatStatus::Closed)
            },
            make_chat(ChatStatus::Active),
            make_chat(ChatStatus::Active),
        ];
        let stats = chat_stats(&chats);
        assert_eq!(stats.resolution_rate, 25.0);
    }

    #[test]
    fn callback_averages_and_rates() {
        let callbacks = vec![
            make_callback(CallbackStatus::Completed, 2),
            make_callback(CallbackStatus::Completed, 4),
            make_callback(CallbackStatus::Pending, 0),
            make_callback(CallbackStatus::Cancelled, 0),
        ];
        let stats = callback_stats(&callbacks);
        assert_eq!(stats.average_attempts, 1.5);
        assert_eq!(stats.completion_rate, 50.0);
        assert_eq!(stats.by_status.completed, 2);
        assert_eq!(stats.by_status.cancelled, 1);
    }
}
