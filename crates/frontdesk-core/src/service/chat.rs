//! Chat service: conversation CRUD, lifecycle, ledger, search, and stats.
//!
//! Generic over `ChatRepository` and `NotificationDispatcher` to maintain
//! clean architecture (frontdesk-core never depends on frontdesk-infra).
//! Every write that needs prior state loads the current snapshot first,
//! applies the pure mutation, then persists the whole entity.

use chrono::Utc;
use frontdesk_types::chat::{
    Chat, ChatStatus, ChatUpdate, NewChat, NewMessage, ResolutionStatus, Sender,
};
use frontdesk_types::error::ServiceError;
use frontdesk_types::filter::{ChatFilter, OrderBy, SearchHit};
use frontdesk_types::stats::ChatStats;
use tracing::{info, warn};
use uuid::Uuid;

use crate::filter::compile_chat_filter;
use crate::ledger;
use crate::lifecycle;
use crate::notify::{DeliveryMethod, NotificationDispatcher, NotificationKind};
use crate::repository::ChatRepository;
use crate::service::{validate_quality_score, validate_rating};
use crate::stats;

/// Orchestrates the conversation side of the dashboard.
pub struct ChatService<R: ChatRepository, N: NotificationDispatcher> {
    repo: R,
    notifier: N,
}

impl<R: ChatRepository, N: NotificationDispatcher> ChatService<R, N> {
    pub fn new(repo: R, notifier: N) -> Self {
        Self { repo, notifier }
    }

    /// Access the chat repository.
    pub fn repo(&self) -> &R {
        &self.repo
    }

    async fn load(&self, id: &Uuid) -> Result<Chat, ServiceError> {
        self.repo
            .get(id)
            .await
            .map_err(ServiceError::storage("get_chat", "chat", id))?
            .ok_or_else(|| ServiceError::not_found("chat", id))
    }

    async fn persist(&self, chat: &Chat, operation: &str) -> Result<(), ServiceError> {
        self.repo
            .update(chat)
            .await
            .map_err(ServiceError::storage(operation, "chat", chat.id))
    }

    // --- CRUD ---

    /// Open a new conversation. `chat_session_id` is caller-assigned and must
    /// be unique; a duplicate is rejected before any write.
    pub async fn create_chat(&self, input: NewChat) -> Result<Chat, ServiceError> {
        if input.chat_session_id.trim().is_empty() {
            return Err(ServiceError::Validation(
                "chat_session_id must not be empty".to_string(),
            ));
        }

        let existing = self
            .repo
            .get_by_session_id(&input.chat_session_id)
            .await
            .map_err(ServiceError::storage(
                "get_chat_by_session_id",
                "chat",
                &input.chat_session_id,
            ))?;
        if existing.is_some() {
            return Err(ServiceError::Validation(format!(
                "chat_session_id '{}' already exists",
                input.chat_session_id
            )));
        }

        let now = Utc::now();
        let chat = Chat {
            id: Uuid::now_v7(),
            chat_session_id: input.chat_session_id,
            lead_id: input.lead_id,
            agent_id: input.agent_id,
            status: ChatStatus::Active,
            priority: input.priority.unwrap_or_default(),
            chat_type: input.chat_type.unwrap_or_default(),
            source: input.source,
            tags: input.tags,
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
        };

        let created = self
            .repo
            .insert(&chat)
            .await
            .map_err(ServiceError::storage("create_chat", "chat", chat.id))?;
        info!(chat_id = %created.id, session_id = %created.chat_session_id, "Chat created");
        Ok(created)
    }

    pub async fn get_chat(&self, id: &Uuid) -> Result<Chat, ServiceError> {
        self.load(id).await
    }

    /// Look a chat up by its caller-assigned external session id.
    pub async fn get_chat_by_session_id(&self, session_id: &str) -> Result<Chat, ServiceError> {
        self.repo
            .get_by_session_id(session_id)
            .await
            .map_err(ServiceError::storage(
                "get_chat_by_session_id",
                "chat",
                session_id,
            ))?
            .ok_or_else(|| ServiceError::not_found("chat", session_id))
    }

    /// List chats matching the filter, most recently started first.
    pub async fn list_chats(
        &self,
        filter: &ChatFilter,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<Vec<Chat>, ServiceError> {
        let constraints = compile_chat_filter(filter);
        self.repo
            .list(&constraints, Some(OrderBy::desc("started_at")), limit, offset)
            .await
            .map_err(ServiceError::storage("list_chats", "chat", "*"))
    }

    /// Apply a closed-field update. All bounds are validated before the
    /// entity is loaded, so an invalid payload never causes a partial write.
    pub async fn update_chat(&self, id: &Uuid, update: ChatUpdate) -> Result<Chat, ServiceError> {
        if let Some(satisfaction) = update.customer_satisfaction {
            validate_rating("customer_satisfaction", satisfaction)?;
        }
        if let Some(rating) = update.agent_rating {
            validate_rating("agent_rating", rating)?;
        }
        if let Some(score) = update.quality_score {
            validate_quality_score(score)?;
        }

        let mut chat = self.load(id).await?;

        if let Some(priority) = update.priority {
            chat.priority = priority;
        }
        if update.agent_id.is_some() {
            chat.agent_id = update.agent_id;
        }
        if update.lead_id.is_some() {
            chat.lead_id = update.lead_id;
        }
        if update.source.is_some() {
            chat.source = update.source;
        }
        if let Some(tags) = update.tags {
            chat.tags = tags;
        }
        if update.customer_sentiment.is_some() {
            chat.customer_sentiment = update.customer_sentiment;
        }
        if update.customer_intent.is_some() {
            chat.customer_intent = update.customer_intent;
        }
        if update.customer_urgency.is_some() {
            chat.customer_urgency = update.customer_urgency;
        }
        if let Some(flag) = update.follow_up_required {
            chat.follow_up_required = flag;
        }
        if update.follow_up_date.is_some() {
            chat.follow_up_date = update.follow_up_date;
        }
        if update.customer_satisfaction.is_some() {
            chat.customer_satisfaction = update.customer_satisfaction;
        }
        if update.agent_rating.is_some() {
            chat.agent_rating = update.agent_rating;
        }
        if update.quality_score.is_some() {
            chat.quality_score = update.quality_score;
        }
        chat.updated_at = Utc::now();

        self.persist(&chat, "update_chat").await?;
        Ok(chat)
    }

    /// Hard delete. No tombstone, no undo.
    pub async fn delete_chat(&self, id: &Uuid) -> Result<(), ServiceError> {
        self.repo
            .delete(id)
            .await
            .map_err(ServiceError::storage("delete_chat", "chat", id))?;
        info!(chat_id = %id, "Chat deleted");
        Ok(())
    }

    /// Case-insensitive substring search. Every hit carries the placeholder
    /// relevance 1.0; order is arbitrary.
    pub async fn search_chats(
        &self,
        query: &str,
        limit: i64,
    ) -> Result<Vec<SearchHit<Chat>>, ServiceError> {
        let hits = self
            .repo
            .search(query, limit)
            .await
            .map_err(ServiceError::storage("search_chats", "chat", query))?;
        Ok(hits.into_iter().map(SearchHit::new).collect())
    }

    /// Dashboard statistics over the full unfiltered snapshot.
    pub async fn chat_stats(&self) -> Result<ChatStats, ServiceError> {
        let chats = self
            .repo
            .list(&[], None, None, None)
            .await
            .map_err(ServiceError::storage("chat_stats", "chat", "*"))?;
        Ok(stats::chat_stats(&chats))
    }

    // --- Ledger ---

    /// Append a message and return the updated chat snapshot.
    pub async fn append_message(
        &self,
        id: &Uuid,
        input: NewMessage,
    ) -> Result<Chat, ServiceError> {
        let mut chat = self.load(id).await?;
        ledger::append_message(&mut chat, input)?;
        self.persist(&chat, "append_message").await?;
        Ok(chat)
    }

    /// Mark messages as read (tolerant: unknown ids are skipped).
    pub async fn mark_messages_read(
        &self,
        id: &Uuid,
        message_ids: &[Uuid],
    ) -> Result<Chat, ServiceError> {
        let mut chat = self.load(id).await?;
        let marked = ledger::mark_read(&mut chat, message_ids);
        if marked > 0 {
            self.persist(&chat, "mark_messages_read").await?;
        }
        Ok(chat)
    }

    /// Edit a message's content in place.
    pub async fn edit_message(
        &self,
        id: &Uuid,
        message_id: &Uuid,
        content: String,
    ) -> Result<Chat, ServiceError> {
        let mut chat = self.load(id).await?;
        ledger::edit_message(&mut chat, message_id, content)?;
        self.persist(&chat, "edit_message").await?;
        Ok(chat)
    }

    // --- Lifecycle ---

    pub async fn close_chat(
        &self,
        id: &Uuid,
        resolution_status: Option<ResolutionStatus>,
        resolution_notes: Option<String>,
    ) -> Result<Chat, ServiceError> {
        let mut chat = self.load(id).await?;
        lifecycle::close_chat(&mut chat, resolution_status, resolution_notes)?;
        self.persist(&chat, "close_chat").await?;
        Ok(chat)
    }

    pub async fn pause_chat(&self, id: &Uuid, reason: Option<String>) -> Result<Chat, ServiceError> {
        let mut chat = self.load(id).await?;
        lifecycle::pause_chat(&mut chat, reason.as_deref())?;
        self.persist(&chat, "pause_chat").await?;
        Ok(chat)
    }

    pub async fn resume_chat(&self, id: &Uuid) -> Result<Chat, ServiceError> {
        let mut chat = self.load(id).await?;
        lifecycle::resume_chat(&mut chat)?;
        self.persist(&chat, "resume_chat").await?;
        Ok(chat)
    }

    pub async fn abandon_chat(&self, id: &Uuid) -> Result<Chat, ServiceError> {
        let mut chat = self.load(id).await?;
        lifecycle::abandon_chat(&mut chat)?;
        self.persist(&chat, "abandon_chat").await?;
        Ok(chat)
    }

    /// Hand the conversation to another agent. Records a system message in
    /// the ledger, applies the terminal transition, and notifies the
    /// receiving agent (fire-and-forget).
    pub async fn transfer_chat(
        &self,
        id: &Uuid,
        new_agent_id: Uuid,
        notes: Option<String>,
    ) -> Result<Chat, ServiceError> {
        let mut chat = self.load(id).await?;

        let content = match &notes {
            Some(notes) => format!("Conversation transferred to agent {new_agent_id}: {notes}"),
            None => format!("Conversation transferred to agent {new_agent_id}"),
        };
        // Appended before the transition: once transferred the ledger is closed.
        ledger::append_message(
            &mut chat,
            NewMessage {
                sender: Sender::System,
                sender_id: None,
                message_type: Some(frontdesk_types::chat::MessageType::System),
                content,
                metadata: None,
                reply_to: None,
            },
        )?;
        lifecycle::transfer_chat(&mut chat, new_agent_id)?;
        self.persist(&chat, "transfer_chat").await?;

        if let Err(err) = self
            .notifier
            .dispatch(
                new_agent_id,
                NotificationKind::ChatTransferred,
                "Chat transferred to you",
                &format!("Chat {} was transferred to you", chat.chat_session_id),
                DeliveryMethod::Push,
            )
            .await
        {
            warn!(chat_id = %chat.id, error = %err, "Transfer notification failed");
        }

        Ok(chat)
    }
}
