//! Lifecycle manager: legal state transitions for chats and callbacks.
//!
//! Pure mutations over `&mut Chat` / `&mut Callback`; persistence happens in
//! the service facades after a transition is accepted. Illegal transitions
//! fail with `ServiceError::InvalidTransition` and leave the entity untouched.
//!
//! Chat graph: `active <-> paused`; `active`/`paused` -> `closed` |
//! `transferred` | `abandoned` (terminal).
//! Callback graph: `pending` -> `scheduled` -> `completed` | `cancelled` |
//! `no_answer`; `pending` may skip scheduling; `no_answer` may be
//! re-scheduled. Only `completed` and `cancelled` are terminal.

use chrono::Utc;
use frontdesk_types::callback::{Callback, CallbackOutcome};
use frontdesk_types::chat::{Chat, ChatStatus, ResolutionStatus};
use frontdesk_types::error::ServiceError;
use tracing::info;
use uuid::Uuid;

/// Bump a chat's activity clocks and maintained duration counter.
///
/// `duration_seconds` is a maintained field, not computed-on-read; the max
/// keeps it monotonically non-decreasing even when calls race.
pub(crate) fn touch_chat(chat: &mut Chat) {
    let now = Utc::now();
    chat.last_activity_at = now;
    chat.updated_at = now;
    let elapsed = (now - chat.started_at).num_seconds().max(0) as u32;
    chat.duration_seconds = chat.duration_seconds.max(elapsed);
}

fn chat_guard(chat: &Chat, operation: &str) -> Result<(), ServiceError> {
    if chat.status.is_terminal() {
        return Err(ServiceError::InvalidTransition(format!(
            "cannot {operation} a {} chat",
            chat.status
        )));
    }
    Ok(())
}

/// `active`/`paused` -> `closed`. Sets `ended_at` and the optional resolution
/// fields.
pub fn close_chat(
    chat: &mut Chat,
    resolution_status: Option<ResolutionStatus>,
    resolution_notes: Option<String>,
) -> Result<(), ServiceError> {
    chat_guard(chat, "close")?;
    chat.status = ChatStatus::Closed;
    chat.ended_at = Some(Utc::now());
    if resolution_status.is_some() {
        chat.resolution_status = resolution_status;
    }
    if resolution_notes.is_some() {
        chat.resolution_notes = resolution_notes;
    }
    touch_chat(chat);
    info!(chat_id = %chat.id, resolution = ?chat.resolution_status, "Chat closed");
    Ok(())
}

/// `active`/`paused` -> `transferred`. Reassigns `agent_id`; terminal for
/// this record -- the receiving agent's chat takes over.
pub fn transfer_chat(chat: &mut Chat, new_agent_id: Uuid) -> Result<(), ServiceError> {
    chat_guard(chat, "transfer")?;
    chat.status = ChatStatus::Transferred;
    chat.agent_id = Some(new_agent_id);
    touch_chat(chat);
    info!(chat_id = %chat.id, agent_id = %new_agent_id, "Chat transferred");
    Ok(())
}

/// `active` -> `paused` only.
pub fn pause_chat(chat: &mut Chat, reason: Option<&str>) -> Result<(), ServiceError> {
    if chat.status != ChatStatus::Active {
        return Err(ServiceError::InvalidTransition(format!(
            "cannot pause a {} chat",
            chat.status
        )));
    }
    chat.status = ChatStatus::Paused;
    touch_chat(chat);
    info!(chat_id = %chat.id, reason = reason.unwrap_or(""), "Chat paused");
    Ok(())
}

/// `paused` -> `active` only; resuming anything else (including an already
/// active chat) is an invalid transition.
pub fn resume_chat(chat: &mut Chat) -> Result<(), ServiceError> {
    if chat.status != ChatStatus::Paused {
        return Err(ServiceError::InvalidTransition(format!(
            "cannot resume a {} chat",
            chat.status
        )));
    }
    chat.status = ChatStatus::Active;
    touch_chat(chat);
    info!(chat_id = %chat.id, "Chat resumed");
    Ok(())
}

/// `active`/`paused` -> `abandoned`. Terminal; sets `ended_at`.
pub fn abandon_chat(chat: &mut Chat) -> Result<(), ServiceError> {
    chat_guard(chat, "abandon")?;
    chat.status = ChatStatus::Abandoned;
    chat.ended_at = Some(Utc::now());
    touch_chat(chat);
    info!(chat_id = %chat.id, "Chat abandoned");
    Ok(())
}

// ---------------------------------------------------------------------------
// Callback transitions
// ---------------------------------------------------------------------------

fn callback_guard(callback: &Callback, operation: &str) -> Result<(), ServiceError> {
    if callback.status.is_terminal() {
        return Err(ServiceError::InvalidTransition(format!(
            "cannot {operation} a {} callback",
            callback.status
        )));
    }
    Ok(())
}

/// Any non-terminal state -> `scheduled`. Sets `scheduled_at` and optionally
/// the assigned agent.
pub fn schedule_callback(
    callback: &mut Callback,
    scheduled_at: chrono::DateTime<Utc>,
    assigned_agent_id: Option<Uuid>,
) -> Result<(), ServiceError> {
    callback_guard(callback, "schedule")?;
    callback.status = frontdesk_types::callback::CallbackStatus::Scheduled;
    callback.scheduled_at = Some(scheduled_at);
    if assigned_agent_id.is_some() {
        callback.assigned_agent_id = assigned_agent_id;
    }
    callback.updated_at = Utc::now();
    info!(callback_id = %callback.id, scheduled_at = %scheduled_at, "Callback scheduled");
    Ok(())
}

/// Record one dial attempt: `attempted_at = now`, `attempt_count` incremented
/// by exactly 1, outcome fields set. Never changes `status` -- a callback can
/// be attempted repeatedly while still pending or scheduled.
pub fn record_attempt(
    callback: &mut Callback,
    outcome: CallbackOutcome,
    notes: Option<String>,
) -> Result<(), ServiceError> {
    callback_guard(callback, "record an attempt on")?;
    let now = Utc::now();
    callback.attempted_at = Some(now);
    callback.attempt_count += 1;
    callback.outcome = Some(outcome);
    if notes.is_some() {
        callback.outcome_notes = notes;
    }
    callback.updated_at = now;
    info!(
        callback_id = %callback.id,
        attempt = callback.attempt_count,
        outcome = %outcome,
        "Callback attempt recorded"
    );
    Ok(())
}

/// Any non-terminal state -> `completed`. Terminal.
pub fn complete_callback(
    callback: &mut Callback,
    outcome: CallbackOutcome,
    outcome_notes: Option<String>,
) -> Result<(), ServiceError> {
    callback_guard(callback, "complete")?;
    let now = Utc::now();
    callback.status = frontdesk_types::callback::CallbackStatus::Completed;
    callback.completed_at = Some(now);
    callback.outcome = Some(outcome);
    if outcome_notes.is_some() {
        callback.outcome_notes = outcome_notes;
    }
    callback.updated_at = now;
    info!(callback_id = %callback.id, outcome = %outcome, "Callback completed");
    Ok(())
}

/// Any non-terminal state -> `cancelled`. Terminal.
pub fn cancel_callback(callback: &mut Callback, notes: Option<String>) -> Result<(), ServiceError> {
    callback_guard(callback, "cancel")?;
    callback.status = frontdesk_types::callback::CallbackStatus::Cancelled;
    if notes.is_some() {
        callback.outcome_notes = notes;
    }
    callback.updated_at = Utc::now();
    info!(callback_id = %callback.id, "Callback cancelled");
    Ok(())
}

/// Any non-terminal state -> `no_answer`. Not terminal: the callback may be
/// re-scheduled and re-attempted later.
pub fn mark_no_answer(callback: &mut Callback) -> Result<(), ServiceError> {
    callback_guard(callback, "mark no-answer on")?;
    callback.status = frontdesk_types::callback::CallbackStatus::NoAnswer;
    callback.updated_at = Utc::now();
    info!(callback_id = %callback.id, "Callback marked no-answer");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use frontdesk_types::callback::{CallbackStatus, TimeRange, Urgency};
    use frontdesk_types::chat::{ChatPriority, ChatType};

    fn make_chat() -> Chat {
        let now = Utc::now();
        Chat {
            id: Uuid::now_v7(),
            chat_session_id: "sess-1".to_string(),
            lead_id: None,
            agent_id: None,
            status: ChatStatus::Active,
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

    fn make_callback() -> Callback {
        let now = Utc::now();
        Callback {
            id: Uuid::now_v7(),
            lead_id: None,
            client_name: "John Doe".to_string(),
            client_phone: "+1-555-1000".to_string(),
            client_email: None,
            company_name: None,
            preferred_callback_time: None,
            preferred_time_range: TimeRange::Anytime,
            timezone: None,
            urgency: Urgency::Normal,
            source: None,
            tags: Vec::new(),
            status: CallbackStatus::Pending,
            priority: 5,
            attempt_count: 0,
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
    fn pause_then_resume_round_trips() {
        let mut chat = make_chat();
        pause_chat(&mut chat, Some("lunch")).unwrap();
        assert_eq!(chat.status, ChatStatus::Paused);
        resume_chat(&mut chat).unwrap();
        assert_eq!(chat.status, ChatStatus::Active);
    }

    #[test]
    fn resume_active_chat_is_invalid() {
        let mut chat = make_chat();
        let err = resume_chat(&mut chat).unwrap_err();
        assert!(matches!(err, ServiceError::InvalidTransition(_)));
        assert_eq!(chat.status, ChatStatus::Active);
    }

    #[test]
    fn pause_paused_chat_is_invalid() {
        let mut chat = make_chat();
        pause_chat(&mut chat, None).unwrap();
        assert!(pause_chat(&mut chat, None).is_err());
    }

    #[test]
    fn close_sets_ended_at_and_resolution() {
        let mut chat = make_chat();
        close_chat(
            &mut chat,
            Some(ResolutionStatus::Resolved),
            Some("done".to_string()),
        )
        .unwrap();
        assert_eq!(chat.status, ChatStatus::Closed);
        assert!(chat.ended_at.is_some());
        assert_eq!(chat.resolution_status, Some(ResolutionStatus::Resolved));
        assert_eq!(chat.resolution_notes.as_deref(), Some("done"));
    }

    #[test]
    fn close_from_paused_is_allowed() {
        let mut chat = make_chat();
        pause_chat(&mut chat, None).unwrap();
        close_chat(&mut chat, None, None).unwrap();
        assert_eq!(chat.status, ChatStatus::Closed);
    }

    #[test]
    fn terminal_chat_rejects_every_transition() {
        let mut chat = make_chat();
        close_chat(&mut chat, None, None).unwrap();
        assert!(pause_chat(&mut chat, None).is_err());
        assert!(resume_chat(&mut chat).is_err());
        assert!(close_chat(&mut chat, None, None).is_err());
        assert!(transfer_chat(&mut chat, Uuid::now_v7()).is_err());
        assert!(abandon_chat(&mut chat).is_err());
    }

    #[test]
    fn transfer_reassigns_agent() {
        let mut chat = make_chat();
        let agent = Uuid::now_v7();
        transfer_chat(&mut chat, agent).unwrap();
        assert_eq!(chat.status, ChatStatus::Transferred);
        assert_eq!(chat.agent_id, Some(agent));
    }

    #[test]
    fn duration_is_monotonic() {
        let mut chat = make_chat();
        chat.started_at = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        pause_chat(&mut chat, None).unwrap();
        let first = chat.duration_seconds;
        assert!(first > 0);
        resume_chat(&mut chat).unwrap();
        assert!(chat.duration_seconds >= first);
    }

    #[test]
    fn record_attempt_increments_by_exactly_one() {
        let mut cb = make_callback();
        record_attempt(&mut cb, CallbackOutcome::NoAnswer, None).unwrap();
        record_attempt(&mut cb, CallbackOutcome::NoAnswer, None).unwrap();
        assert_eq!(cb.attempt_count, 2);
        assert_eq!(cb.outcome, Some(CallbackOutcome::NoAnswer));
        assert!(cb.attempted_at.is_some());
        // Status never changes on attempts.
        assert_eq!(cb.status, CallbackStatus::Pending);
    }

    #[test]
    fn schedule_then_complete_preserves_scheduled_at() {
        let mut cb = make_callback();
        let when = Utc.with_ymd_and_hms(2025, 3, 1, 10, 0, 0).unwrap();
        schedule_callback(&mut cb, when, None).unwrap();
        assert_eq!(cb.status, CallbackStatus::Scheduled);

        complete_callback(&mut cb, CallbackOutcome::Successful, None).unwrap();
        assert_eq!(cb.status, CallbackStatus::Completed);
        assert!(cb.completed_at.is_some());
        assert_eq!(cb.scheduled_at, Some(when));
    }

    #[test]
    fn pending_may_complete_without_scheduling() {
        let mut cb = make_callback();
        complete_callback(&mut cb, CallbackOutcome::Successful, None).unwrap();
        assert_eq!(cb.status, CallbackStatus::Completed);
    }

    #[test]
    fn completed_callback_rejects_everything() {
        let mut cb = make_callback();
        complete_callback(&mut cb, CallbackOutcome::Successful, None).unwrap();
        assert!(complete_callback(&mut cb, CallbackOutcome::Successful, None).is_err());
        assert!(schedule_callback(&mut cb, Utc::now(), None).is_err());
        assert!(record_attempt(&mut cb, CallbackOutcome::Busy, None).is_err());
        assert!(cancel_callback(&mut cb, None).is_err());
        assert!(mark_no_answer(&mut cb).is_err());
        assert_eq!(cb.attempt_count, 0);
    }

    #[test]
    fn no_answer_may_be_rescheduled() {
        let mut cb = make_callback();
        mark_no_answer(&mut cb).unwrap();
        assert_eq!(cb.status, CallbackStatus::NoAnswer);
        schedule_callback(&mut cb, Utc::now(), Some(Uuid::now_v7())).unwrap();
        assert_eq!(cb.status, CallbackStatus::Scheduled);
        assert!(cb.assigned_agent_id.is_some());
    }

    #[test]
    fn cancel_is_terminal() {
        let mut cb = make_callback();
        cancel_callback(&mut cb, Some("client asked us to stop".to_string())).unwrap();
        assert_eq!(cb.status, CallbackStatus::Cancelled);
        assert!(schedule_callback(&mut cb, Utc::now(), None).is_err());
    }
}
