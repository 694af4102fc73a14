//! Chat conversation and message types for Frontdesk.
//!
//! A `Chat` is a single conversation between a customer and the AI
//! receptionist (optionally handed to a human operator). Its message history
//! is embedded and append-only; `message_count`, `last_message`, and
//! `last_message_at` always mirror the history and are recomputed by the
//! message ledger on every append.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::fmt;
use std::str::FromStr;

// Re-export Urgency from the callback module (used for both callback urgency
// and a chat's classified customer urgency).
pub use crate::callback::Urgency;

/// Lifecycle status of a chat.
///
/// Maps to the CHECK constraint in the SQLite schema:
/// `CHECK (status IN ('active', 'paused', 'closed', 'transferred', 'abandoned'))`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatStatus {
    Active,
    Paused,
    Closed,
    Transferred,
    Abandoned,
}

impl ChatStatus {
    /// Whether this status permits no further transitions.
    ///
    /// `transferred` counts as terminal for this record; a new chat takes over.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ChatStatus::Closed | ChatStatus::Transferred | ChatStatus::Abandoned
        )
    }
}

impl fmt::Display for ChatStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChatStatus::Active => write!(f, "active"),
            ChatStatus::Paused => write!(f, "paused"),
            ChatStatus::Closed => write!(f, "closed"),
            ChatStatus::Transferred => write!(f, "transferred"),
            ChatStatus::Abandoned => write!(f, "abandoned"),
        }
    }
}

impl FromStr for ChatStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "active" => Ok(ChatStatus::Active),
            "paused" => Ok(ChatStatus::Paused),
            "closed" => Ok(ChatStatus::Closed),
            "transferred" => Ok(ChatStatus::Transferred),
            "abandoned" => Ok(ChatStatus::Abandoned),
            other => Err(format!("invalid chat status: '{other}'")),
        }
    }
}

impl Default for ChatStatus {
    fn default() -> Self {
        ChatStatus::Active
    }
}

/// Triage priority of a chat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatPriority {
    Low,
    Normal,
    High,
    Urgent,
}

impl fmt::Display for ChatPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChatPriority::Low => write!(f, "low"),
            ChatPriority::Normal => write!(f, "normal"),
            ChatPriority::High => write!(f, "high"),
            ChatPriority::Urgent => write!(f, "urgent"),
        }
    }
}

impl FromStr for ChatPriority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "low" => Ok(ChatPriority::Low),
            "normal" => Ok(ChatPriority::Normal),
            "high" => Ok(ChatPriority::High),
            "urgent" => Ok(ChatPriority::Urgent),
            other => Err(format!("invalid chat priority: '{other}'")),
        }
    }
}

impl Default for ChatPriority {
    fn default() -> Self {
        ChatPriority::Normal
    }
}

/// How the conversation was initiated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatType {
    Inbound,
    Outbound,
    Transfer,
    Callback,
}

impl fmt::Display for ChatType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChatType::Inbound => write!(f, "inbound"),
            ChatType::Outbound => write!(f, "outbound"),
            ChatType::Transfer => write!(f, "transfer"),
            ChatType::Callback => write!(f, "callback"),
        }
    }
}

impl FromStr for ChatType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "inbound" => Ok(ChatType::Inbound),
            "outbound" => Ok(ChatType::Outbound),
            "transfer" => Ok(ChatType::Transfer),
            "callback" => Ok(ChatType::Callback),
            other => Err(format!("invalid chat type: '{other}'")),
        }
    }
}

impl Default for ChatType {
    fn default() -> Self {
        ChatType::Inbound
    }
}

/// Who authored a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    Customer,
    Agent,
    System,
}

impl fmt::Display for Sender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sender::Customer => write!(f, "customer"),
            Sender::Agent => write!(f, "agent"),
            Sender::System => write!(f, "system"),
        }
    }
}

impl FromStr for Sender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "customer" => Ok(Sender::Customer),
            "agent" => Ok(Sender::Agent),
            "system" => Ok(Sender::System),
            other => Err(format!("invalid sender: '{other}'")),
        }
    }
}

/// Payload kind of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageType {
    Text,
    Image,
    File,
    System,
    Typing,
    ReadReceipt,
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageType::Text => write!(f, "text"),
            MessageType::Image => write!(f, "image"),
            MessageType::File => write!(f, "file"),
            MessageType::System => write!(f, "system"),
            MessageType::Typing => write!(f, "typing"),
            MessageType::ReadReceipt => write!(f, "read_receipt"),
        }
    }
}

impl FromStr for MessageType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(MessageType::Text),
            "image" => Ok(MessageType::Image),
            "file" => Ok(MessageType::File),
            "system" => Ok(MessageType::System),
            "typing" => Ok(MessageType::Typing),
            "read_receipt" => Ok(MessageType::ReadReceipt),
            other => Err(format!("invalid message type: '{other}'")),
        }
    }
}

impl Default for MessageType {
    fn default() -> Self {
        MessageType::Text
    }
}

/// Classified mood of the customer across the conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
    Frustrated,
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sentiment::Positive => write!(f, "positive"),
            Sentiment::Neutral => write!(f, "neutral"),
            Sentiment::Negative => write!(f, "negative"),
            Sentiment::Frustrated => write!(f, "frustrated"),
        }
    }
}

impl FromStr for Sentiment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "positive" => Ok(Sentiment::Positive),
            "neutral" => Ok(Sentiment::Neutral),
            "negative" => Ok(Sentiment::Negative),
            "frustrated" => Ok(Sentiment::Frustrated),
            other => Err(format!("invalid sentiment: '{other}'")),
        }
    }
}

/// How the conversation ended, from the operator's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolutionStatus {
    Resolved,
    Unresolved,
    Escalated,
    Transferred,
}

impl fmt::Display for ResolutionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolutionStatus::Resolved => write!(f, "resolved"),
            ResolutionStatus::Unresolved => write!(f, "unresolved"),
            ResolutionStatus::Escalated => write!(f, "escalated"),
            ResolutionStatus::Transferred => write!(f, "transferred"),
        }
    }
}

impl FromStr for ResolutionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "resolved" => Ok(ResolutionStatus::Resolved),
            "unresolved" => Ok(ResolutionStatus::Unresolved),
            "escalated" => Ok(ResolutionStatus::Escalated),
            "transferred" => Ok(ResolutionStatus::Transferred),
            other => Err(format!("invalid resolution status: '{other}'")),
        }
    }
}

/// A single message within a chat's embedded history.
///
/// Owned exclusively by its parent chat; never reordered. Editing changes
/// `content` and `is_edited` but not `timestamp` or position. `reply_to` is a
/// soft reference into the same ledger -- dangling ids are tolerated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub sender: Sender,
    pub sender_id: Option<Uuid>,
    pub message_type: MessageType,
    pub content: String,
    pub metadata: Option<serde_json::Value>,
    pub is_read: bool,
    pub is_edited: bool,
    pub reply_to: Option<Uuid>,
}

/// A conversation between a customer and the receptionist.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chat {
    pub id: Uuid,
    /// Caller-assigned external session id, unique per conversation.
    pub chat_session_id: String,
    pub lead_id: Option<Uuid>,
    pub agent_id: Option<Uuid>,
    pub status: ChatStatus,
    pub priority: ChatPriority,
    pub chat_type: ChatType,
    pub source: Option<String>,
    pub tags: Vec<String>,
    pub started_at: DateTime<Utc>,
    pub last_activity_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
    /// Maintained by lifecycle/ledger operations; monotonically non-decreasing.
    pub duration_seconds: u32,
    pub chat_history: Vec<ChatMessage>,
    /// Invariant: always equals `chat_history.len()`.
    pub message_count: u32,
    pub last_message: Option<String>,
    pub last_message_at: Option<DateTime<Utc>>,
    pub customer_sentiment: Option<Sentiment>,
    pub customer_intent: Option<String>,
    pub customer_urgency: Option<Urgency>,
    pub resolution_status: Option<ResolutionStatus>,
    pub resolution_notes: Option<String>,
    pub follow_up_required: bool,
    pub follow_up_date: Option<DateTime<Utc>>,
    /// 1-5 when present.
    pub customer_satisfaction: Option<u8>,
    /// 1-5 when present.
    pub agent_rating: Option<u8>,
    /// 0.00-10.00 when present.
    pub quality_score: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload for opening a new conversation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewChat {
    pub chat_session_id: String,
    pub lead_id: Option<Uuid>,
    pub agent_id: Option<Uuid>,
    pub priority: Option<ChatPriority>,
    pub chat_type: Option<ChatType>,
    pub source: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Payload for appending a message; id/timestamp are server-assigned.
#[derive(Debug, Clone, Deserialize)]
pub struct NewMessage {
    pub sender: Sender,
    pub sender_id: Option<Uuid>,
    pub message_type: Option<MessageType>,
    pub content: String,
    pub metadata: Option<serde_json::Value>,
    pub reply_to: Option<Uuid>,
}

/// Closed update-field set for a chat.
///
/// Status, timestamps, and the message ledger change exclusively through the
/// named lifecycle/ledger operations.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatUpdate {
    pub priority: Option<ChatPriority>,
    pub agent_id: Option<Uuid>,
    pub lead_id: Option<Uuid>,
    pub source: Option<String>,
    pub tags: Option<Vec<String>>,
    pub customer_sentiment: Option<Sentiment>,
    pub customer_intent: Option<String>,
    pub customer_urgency: Option<Urgency>,
    pub follow_up_required: Option<bool>,
    pub follow_up_date: Option<DateTime<Utc>>,
    pub customer_satisfaction: Option<u8>,
    pub agent_rating: Option<u8>,
    pub quality_score: Option<f64>,
}
