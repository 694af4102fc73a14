//! Message ledger: a chat's append-only embedded message history.
//!
//! Appends assign server-side ids and timestamps, never reorder, and keep the
//! derived mirrors (`message_count`, `last_message`, `last_message_at`) in
//! lockstep with the history. `message_count != chat_history.len()` is a bug,
//! not a valid state.

use chrono::Utc;
use frontdesk_types::chat::{Chat, ChatMessage, MessageType, NewMessage};
use frontdesk_types::error::ServiceError;
use uuid::Uuid;

use crate::lifecycle::touch_chat;

/// Append a message to the end of the chat's history.
///
/// Server-assigns `id` (UUID v7) and `timestamp`; `is_read`/`is_edited` start
/// false. Rejected when the chat is in a terminal state. `reply_to` is a soft
/// reference -- a dangling id is tolerated, never validated against the
/// ledger.
pub fn append_message(chat: &mut Chat, input: NewMessage) -> Result<ChatMessage, ServiceError> {
    if chat.status.is_terminal() {
        return Err(ServiceError::InvalidTransition(format!(
            "cannot append a message to a {} chat",
            chat.status
        )));
    }

    let message_type = input.message_type.unwrap_or_default();
    if message_type == MessageType::Text && input.content.trim().is_empty() {
        return Err(ServiceError::Validation(
            "text message content must not be empty".to_string(),
        ));
    }

    let message = ChatMessage {
        id: Uuid::now_v7(),
        timestamp: Utc::now(),
        sender: input.sender,
        sender_id: input.sender_id,
        message_type,
        content: input.content,
        metadata: input.metadata,
        is_read: false,
        is_edited: false,
        reply_to: input.reply_to,
    };

    chat.last_message = Some(message.content.clone());
    chat.last_message_at = Some(message.timestamp);
    chat.chat_history.push(message.clone());
    chat.message_count = chat.chat_history.len() as u32;
    touch_chat(chat);

    Ok(message)
}

/// Mark the given messages as read. Tolerant match: ids not present in the
/// ledger are skipped, not an error. Returns how many messages matched.
pub fn mark_read(chat: &mut Chat, message_ids: &[Uuid]) -> usize {
    let mut marked = 0;
    for message in &mut chat.chat_history {
        if message_ids.contains(&message.id) && !message.is_read {
            message.is_read = true;
            marked += 1;
        }
    }
    if marked > 0 {
        chat.updated_at = Utc::now();
    }
    marked
}

/// Replace a message's content in place, flagging it as edited.
///
/// Position and `timestamp` are untouched -- insertion order is causal order
/// and never changes.
pub fn edit_message(chat: &mut Chat, message_id: &Uuid, content: String) -> Result<(), ServiceError> {
    let message = chat
        .chat_history
        .iter_mut()
        .find(|m| m.id == *message_id)
        .ok_or_else(|| ServiceError::not_found("message", message_id))?;

    message.content.clone_from(&content);
    message.is_edited = true;

    // Keep the tail mirror consistent when the edited message is the last one.
    if chat.chat_history.last().map(|m| m.id) == Some(*message_id) {
        chat.last_message = Some(content);
    }
    chat.updated_at = Utc::now();
    Ok(())
}
