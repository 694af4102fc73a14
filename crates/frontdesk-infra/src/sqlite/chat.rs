//! SQLite chat repository implementation.
//!
//! Implements `ChatRepository` from `frontdesk-core` using sqlx with split
//! read/write pools: raw queries, private Row structs, enum columns stored as
//! their string form, `chat_history` and `tags` as JSON TEXT columns.

use frontdesk_core::repository::ChatRepository;
use frontdesk_types::chat::{
    Chat, ChatMessage, ChatPriority, ChatStatus, ChatType, ResolutionStatus, Sentiment, Urgency,
};
use frontdesk_types::error::RepositoryError;
use frontdesk_types::filter::{Constraint, OrderBy};
use sqlx::Row;
use uuid::Uuid;

use super::pool::DatabasePool;
use super::predicate::{bind_all, render, render_tail};
use super::{format_datetime, parse_datetime};

/// SQLite-backed implementation of `ChatRepository`.
pub struct SqliteChatRepository {
    pool: DatabasePool,
}

impl SqliteChatRepository {
    /// Create a new repository backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

/// Internal row type for mapping SQLite rows to domain Chat.
struct ChatRow {
    id: String,
    chat_session_id: String,
    lead_id: Option<String>,
    agent_id: Option<String>,
    status: String,
    priority: String,
    chat_type: String,
    source: Option<String>,
    tags: String,
    started_at: String,
    last_activity_at: String,
    ended_at: Option<String>,
    duration_seconds: i64,
    chat_history: String,
    message_count: i64,
    last_message: Option<String>,
    last_message_at: Option<String>,
    customer_sentiment: Option<String>,
    customer_intent: Option<String>,
    customer_urgency: Option<String>,
    resolution_status: Option<String>,
    resolution_notes: Option<String>,
    follow_up_required: i64,
    follow_up_date: Option<String>,
    customer_satisfaction: Option<i64>,
    agent_rating: Option<i64>,
    quality_score: Option<f64>,
    created_at: String,
    updated_at: String,
}

impl ChatRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            chat_session_id: row.try_get("chat_session_id")?,
            lead_id: row.try_get("lead_id")?,
            agent_id: row.try_get("agent_id")?,
            status: row.try_get("status")?,
            priority: row.try_get("priority")?,
            chat_type: row.try_get("chat_type")?,
            source: row.try_get("source")?,
            tags: row.try_get("tags")?,
            started_at: row.try_get("started_at")?,
            last_activity_at: row.try_get("last_activity_at")?,
            ended_at: row.try_get("ended_at")?,
            duration_seconds: row.try_get("duration_seconds")?,
            chat_history: row.try_get("chat_history")?,
            message_count: row.try_get("message_count")?,
            last_message: row.try_get("last_message")?,
            last_message_at: row.try_get("last_message_at")?,
            customer_sentiment: row.try_get("customer_sentiment")?,
            customer_intent: row.try_get("customer_intent")?,
            customer_urgency: row.try_get("customer_urgency")?,
            resolution_status: row.try_get("resolution_status")?,
            resolution_notes: row.try_get("resolution_notes")?,
            follow_up_required: row.try_get("follow_up_required")?,
            follow_up_date: row.try_get("follow_up_date")?,
            customer_satisfaction: row.try_get("customer_satisfaction")?,
            agent_rating: row.try_get("agent_rating")?,
            quality_score: row.try_get("quality_score")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    fn into_chat(self) -> Result<Chat, RepositoryError> {
        let id = Uuid::parse_str(&self.id)
            .map_err(|e| RepositoryError::Query(format!("invalid chat id: {e}")))?;
        let lead_id = parse_opt_uuid(self.lead_id.as_deref(), "lead_id")?;
        let agent_id = parse_opt_uuid(self.agent_id.as_deref(), "agent_id")?;
        let status: ChatStatus = self
            .status
            .parse()
            .map_err(|e: String| RepositoryError::Query(e))?;
        let priority: ChatPriority = self
            .priority
            .parse()
            .map_err(|e: String| RepositoryError::Query(e))?;
        let chat_type: ChatType = self
            .chat_type
            .parse()
            .map_err(|e: String| RepositoryError::Query(e))?;
        let tags: Vec<String> = serde_json::from_str(&self.tags)
            .map_err(|e| RepositoryError::Query(format!("invalid tags json: {e}")))?;
        let chat_history: Vec<ChatMessage> = serde_json::from_str(&self.chat_history)
            .map_err(|e| RepositoryError::Query(format!("invalid chat_history json: {e}")))?;
        let customer_sentiment: Option<Sentiment> = parse_opt_enum(self.customer_sentiment)?;
        let customer_urgency: Option<Urgency> = parse_opt_enum(self.customer_urgency)?;
        let resolution_status: Option<ResolutionStatus> = parse_opt_enum(self.resolution_status)?;

        Ok(Chat {
            id,
            chat_session_id: self.chat_session_id,
            lead_id,
            agent_id,
            status,
            priority,
            chat_type,
            source: self.source,
            tags,
            started_at: parse_datetime(&self.started_at)?,
            last_activity_at: parse_datetime(&self.last_activity_at)?,
            ended_at: self.ended_at.as_deref().map(parse_datetime).transpose()?,
            duration_seconds: self.duration_seconds as u32,
            chat_history,
            message_count: self.message_count as u32,
            last_message: self.last_message,
            last_message_at: self
                .last_message_at
                .as_deref()
                .map(parse_datetime)
                .transpose()?,
            customer_sentiment,
            customer_intent: self.customer_intent,
            customer_urgency,
            resolution_status,
            resolution_notes: self.resolution_notes,
            follow_up_required: self.follow_up_required != 0,
            follow_up_date: self
                .follow_up_date
                .as_deref()
                .map(parse_datetime)
                .transpose()?,
            customer_satisfaction: self.customer_satisfaction.map(|v| v as u8),
            agent_rating: self.agent_rating.map(|v| v as u8),
            quality_score: self.quality_score,
            created_at: parse_datetime(&self.created_at)?,
            updated_at: parse_datetime(&self.updated_at)?,
        })
    }
}

fn parse_opt_uuid(value: Option<&str>, field: &str) -> Result<Option<Uuid>, RepositoryError> {
    value
        .map(Uuid::parse_str)
        .transpose()
        .map_err(|e| RepositoryError::Query(format!("invalid {field}: {e}")))
}

fn parse_opt_enum<T: std::str::FromStr<Err = String>>(
    value: Option<String>,
) -> Result<Option<T>, RepositoryError> {
    value
        .as_deref()
        .map(str::parse)
        .transpose()
        .map_err(RepositoryError::Query)
}

fn history_json(chat: &Chat) -> Result<String, RepositoryError> {
    serde_json::to_string(&chat.chat_history)
        .map_err(|e| RepositoryError::Query(format!("serialize chat_history: {e}")))
}

fn tags_json(tags: &[String]) -> Result<String, RepositoryError> {
    serde_json::to_string(tags).map_err(|e| RepositoryError::Query(format!("serialize tags: {e}")))
}

impl ChatRepository for SqliteChatRepository {
    async fn insert(&self, chat: &Chat) -> Result<Chat, RepositoryError> {
        sqlx::query(
            r#"INSERT INTO chats (
                   id, chat_session_id, lead_id, agent_id, status, priority, chat_type,
                   source, tags, started_at, last_activity_at, ended_at, duration_seconds,
                   chat_history, message_count, last_message, last_message_at,
                   customer_sentiment, customer_intent, customer_urgency,
                   resolution_status, resolution_notes, follow_up_required, follow_up_date,
                   customer_satisfaction, agent_rating, quality_score, created_at, updated_at
               ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(chat.id.to_string())
        .bind(&chat.chat_session_id)
        .bind(chat.lead_id.map(|v| v.to_string()))
        .bind(chat.agent_id.map(|v| v.to_string()))
        .bind(chat.status.to_string())
        .bind(chat.priority.to_string())
        .bind(chat.chat_type.to_string())
        .bind(&chat.source)
        .bind(tags_json(&chat.tags)?)
        .bind(format_datetime(&chat.started_at))
        .bind(format_datetime(&chat.last_activity_at))
        .bind(chat.ended_at.as_ref().map(format_datetime))
        .bind(chat.duration_seconds as i64)
        .bind(history_json(chat)?)
        .bind(chat.message_count as i64)
        .bind(&chat.last_message)
        .bind(chat.last_message_at.as_ref().map(format_datetime))
        .bind(chat.customer_sentiment.map(|v| v.to_string()))
        .bind(&chat.customer_intent)
        .bind(chat.customer_urgency.map(|v| v.to_string()))
        .bind(chat.resolution_status.map(|v| v.to_string()))
        .bind(&chat.resolution_notes)
        .bind(chat.follow_up_required as i64)
        .bind(chat.follow_up_date.as_ref().map(format_datetime))
        .bind(chat.customer_satisfaction.map(|v| v as i64))
        .bind(chat.agent_rating.map(|v| v as i64))
        .bind(chat.quality_score)
        .bind(format_datetime(&chat.created_at))
        .bind(format_datetime(&chat.updated_at))
        .execute(&self.pool.writer)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                RepositoryError::Conflict(format!(
                    "chat_session_id '{}' already exists",
                    chat.chat_session_id
                ))
            }
            _ => RepositoryError::Query(e.to_string()),
        })?;

        Ok(chat.clone())
    }

    async fn get(&self, id: &Uuid) -> Result<Option<Chat>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM chats WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        match row {
            Some(row) => {
                let chat_row =
                    ChatRow::from_row(&row).map_err(|e| RepositoryError::Query(e.to_string()))?;
                Ok(Some(chat_row.into_chat()?))
            }
            None => Ok(None),
        }
    }

    async fn get_by_session_id(&self, session_id: &str) -> Result<Option<Chat>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM chats WHERE chat_session_id = ?")
            .bind(session_id)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        match row {
            Some(row) => {
                let chat_row =
                    ChatRow::from_row(&row).map_err(|e| RepositoryError::Query(e.to_string()))?;
                Ok(Some(chat_row.into_chat()?))
            }
            None => Ok(None),
        }
    }

    async fn list(
        &self,
        constraints: &[Constraint],
        order: Option<OrderBy>,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<Vec<Chat>, RepositoryError> {
        let predicate = render(constraints);
        let sql = format!(
            "SELECT * FROM chats{}{}",
            predicate.clause,
            render_tail(order, limit, offset)
        );

        let rows = bind_all(sqlx::query(&sql), predicate.binds)
            .fetch_all(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let mut chats = Vec::with_capacity(rows.len());
        for row in &rows {
            let chat_row =
                ChatRow::from_row(row).map_err(|e| RepositoryError::Query(e.to_string()))?;
            chats.push(chat_row.into_chat()?);
        }

        Ok(chats)
    }

    async fn update(&self, chat: &Chat) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r#"UPDATE chats
               SET chat_session_id = ?, lead_id = ?, agent_id = ?, status = ?, priority = ?,
                   chat_type = ?, source = ?, tags = ?, started_at = ?, last_activity_at = ?,
                   ended_at = ?, duration_seconds = ?, chat_history = ?, message_count = ?,
                   last_message = ?, last_message_at = ?, customer_sentiment = ?,
                   customer_intent = ?, customer_urgency = ?, resolution_status = ?,
                   resolution_notes = ?, follow_up_required = ?, follow_up_date = ?,
                   customer_satisfaction = ?, agent_rating = ?, quality_score = ?, updated_at = ?
               WHERE id = ?"#,
        )
        .bind(&chat.chat_session_id)
        .bind(chat.lead_id.map(|v| v.to_string()))
        .bind(chat.agent_id.map(|v| v.to_string()))
        .bind(chat.status.to_string())
        .bind(chat.priority.to_string())
        .bind(chat.chat_type.to_string())
        .bind(&chat.source)
        .bind(tags_json(&chat.tags)?)
        .bind(format_datetime(&chat.started_at))
        .bind(format_datetime(&chat.last_activity_at))
        .bind(chat.ended_at.as_ref().map(format_datetime))
        .bind(chat.duration_seconds as i64)
        .bind(history_json(chat)?)
        .bind(chat.message_count as i64)
        .bind(&chat.last_message)
        .bind(chat.last_message_at.as_ref().map(format_datetime))
        .bind(chat.customer_sentiment.map(|v| v.to_string()))
        .bind(&chat.customer_intent)
        .bind(chat.customer_urgency.map(|v| v.to_string()))
        .bind(chat.resolution_status.map(|v| v.to_string()))
        .bind(&chat.resolution_notes)
        .bind(chat.follow_up_required as i64)
        .bind(chat.follow_up_date.as_ref().map(format_datetime))
        .bind(chat.customer_satisfaction.map(|v| v as i64))
        .bind(chat.agent_rating.map(|v| v as i64))
        .bind(chat.quality_score)
        .bind(format_datetime(&chat.updated_at))
        .bind(chat.id.to_string())
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    async fn delete(&self, id: &Uuid) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM chats WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool.writer)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    async fn count(&self, constraints: &[Constraint]) -> Result<u64, RepositoryError> {
        let predicate = render(constraints);
        let sql = format!("SELECT COUNT(*) as cnt FROM chats{}", predicate.clause);

        let row = bind_all(sqlx::query(&sql), predicate.binds)
            .fetch_one(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let count: i64 = row
            .try_get("cnt")
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(count as u64)
    }

    async fn search(&self, query: &str, limit: i64) -> Result<Vec<Chat>, RepositoryError> {
        let pattern = format!("%{query}%");
        let rows = sqlx::query(
            r#"SELECT * FROM chats
               WHERE chat_session_id LIKE ?1
                  OR last_message LIKE ?1
                  OR customer_intent LIKE ?1
                  OR source LIKE ?1
               ORDER BY last_activity_at DESC
               LIMIT ?2"#,
        )
        .bind(&pattern)
        .bind(limit)
        .fetch_all(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let mut chats = Vec::with_capacity(rows.len());
        for row in &rows {
            let chat_row =
                ChatRow::from_row(row).map_err(|e| RepositoryError::Query(e.to_string()))?;
            chats.push(chat_row.into_chat()?);
        }

        Ok(chats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use frontdesk_types::chat::{MessageType, Sender};
    use frontdesk_types::filter::FilterValue;

    async fn test_pool() -> DatabasePool {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let url = format!("sqlite://{}?mode=rwc", db_path.display());
        // Leak tempdir so it lives for the test
        std::mem::forget(dir);
        DatabasePool::new(&url).await.unwrap()
    }

    fn make_chat(session_id: &str) -> Chat {
        let now = Utc::now();
        Chat {
            id: Uuid::now_v7(),
            chat_session_id: session_id.to_string(),
            lead_id: None,
            agent_id: None,
            status: ChatStatus::Active,
            priority: ChatPriority::Normal,
            chat_type: ChatType::Inbound,
            source: Some("website".to_string()),
            tags: vec!["VIP".to_string()],
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

    fn make_message(content: &str) -> ChatMessage {
        ChatMessage {
            id: Uuid::now_v7(),
            timestamp: Utc::now(),
            sender: Sender::Customer,
            sender_id: None,
            message_type: MessageType::Text,
            content: content.to_string(),
            metadata: None,
            is_read: false,
            is_edited: false,
            reply_to: None,
        }
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let pool = test_pool().await;
        let repo = SqliteChatRepository::new(pool);

        let chat = make_chat("sess-001");
        let created = repo.insert(&chat).await.unwrap();
        assert_eq!(created.id, chat.id);

        let found = repo.get(&chat.id).await.unwrap().unwrap();
        assert_eq!(found.chat_session_id, "sess-001");
        assert_eq!(found.status, ChatStatus::Active);
        assert_eq!(found.tags, vec!["VIP".to_string()]);
    }

    #[tokio::test]
    async fn test_duplicate_session_id_is_conflict() {
        let pool = test_pool().await;
        let repo = SqliteChatRepository::new(pool);

        repo.insert(&make_chat("sess-dup")).await.unwrap();
        let err = repo.insert(&make_chat("sess-dup")).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_get_by_session_id() {
        let pool = test_pool().await;
        let repo = SqliteChatRepository::new(pool);

        let chat = make_chat("sess-lookup");
        repo.insert(&chat).await.unwrap();

        let found = repo.get_by_session_id("sess-lookup").await.unwrap().unwrap();
        assert_eq!(found.id, chat.id);

        let missing = repo.get_by_session_id("sess-none").await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_history_roundtrips_through_json_column() {
        let pool = test_pool().await;
        let repo = SqliteChatRepository::new(pool);

        let mut chat = make_chat("sess-hist");
        chat.chat_history = vec![make_message("Hello"), make_message("I need a plumber")];
        chat.message_count = 2;
        chat.last_message = Some("I need a plumber".to_string());
        repo.insert(&chat).await.unwrap();

        let found = repo.get(&chat.id).await.unwrap().unwrap();
        assert_eq!(found.chat_history.len(), 2);
        assert_eq!(found.chat_history[1].content, "I need a plumber");
        assert_eq!(found.message_count, 2);
    }

    #[tokio::test]
    async fn test_update_full_snapshot() {
        let pool = test_pool().await;
        let repo = SqliteChatRepository::new(pool);

        let mut chat = make_chat("sess-upd");
        repo.insert(&chat).await.unwrap();

        chat.status = ChatStatus::Closed;
        chat.resolution_status = Some(ResolutionStatus::Resolved);
        chat.ended_at = Some(Utc::now());
        chat.customer_satisfaction = Some(5);
        chat.quality_score = Some(8.5);
        repo.update(&chat).await.unwrap();

        let found = repo.get(&chat.id).await.unwrap().unwrap();
        assert_eq!(found.status, ChatStatus::Closed);
        assert_eq!(found.resolution_status, Some(ResolutionStatus::Resolved));
        assert_eq!(found.customer_satisfaction, Some(5));
        assert_eq!(found.quality_score, Some(8.5));
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let pool = test_pool().await;
        let repo = SqliteChatRepository::new(pool);

        let err = repo.update(&make_chat("sess-ghost")).await.unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound));
    }

    #[tokio::test]
    async fn test_list_with_constraints_and_order() {
        let pool = test_pool().await;
        let repo = SqliteChatRepository::new(pool);

        let mut closed = make_chat("sess-a");
        closed.status = ChatStatus::Closed;
        repo.insert(&closed).await.unwrap();
        repo.insert(&make_chat("sess-b")).await.unwrap();
        repo.insert(&make_chat("sess-c")).await.unwrap();

        let active = repo
            .list(
                &[Constraint::Eq {
                    field: "status",
                    value: FilterValue::Text("active".to_string()),
                }],
                Some(OrderBy::desc("started_at")),
                None,
                None,
            )
            .await
            .unwrap();
        assert_eq!(active.len(), 2);

        let page = repo.list(&[], None, Some(2), Some(0)).await.unwrap();
        assert_eq!(page.len(), 2);
    }

    #[tokio::test]
    async fn test_list_tag_overlap() {
        let pool = test_pool().await;
        let repo = SqliteChatRepository::new(pool);

        repo.insert(&make_chat("sess-vip")).await.unwrap();
        let mut plain = make_chat("sess-plain");
        plain.tags = Vec::new();
        repo.insert(&plain).await.unwrap();

        let tagged = repo
            .list(
                &[Constraint::Overlaps {
                    field: "tags",
                    values: vec![FilterValue::Text("VIP".to_string())],
                }],
                None,
                None,
                None,
            )
            .await
            .unwrap();
        assert_eq!(tagged.len(), 1);
        assert_eq!(tagged[0].chat_session_id, "sess-vip");
    }

    #[tokio::test]
    async fn test_count() {
        let pool = test_pool().await;
        let repo = SqliteChatRepository::new(pool);

        repo.insert(&make_chat("sess-1")).await.unwrap();
        repo.insert(&make_chat("sess-2")).await.unwrap();

        assert_eq!(repo.count(&[]).await.unwrap(), 2);
        assert_eq!(
            repo.count(&[Constraint::Eq {
                field: "status",
                value: FilterValue::Text("closed".to_string()),
            }])
            .await
            .unwrap(),
            0
        );
    }

    #[tokio::test]
    async fn test_delete() {
        let pool = test_pool().await;
        let repo = SqliteChatRepository::new(pool);

        let chat = make_chat("sess-del");
        repo.insert(&chat).await.unwrap();
        repo.delete(&chat.id).await.unwrap();

        assert!(repo.get(&chat.id).await.unwrap().is_none());
        let err = repo.delete(&chat.id).await.unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound));
    }

    #[tokio::test]
    async fn test_search_matches_last_message() {
        let pool = test_pool().await;
        let repo = SqliteChatRepository::new(pool);

        let mut chat = make_chat("sess-srch");
        chat.last_message = Some("My sink is leaking".to_string());
        repo.insert(&chat).await.unwrap();
        repo.insert(&make_chat("sess-other")).await.unwrap();

        let hits = repo.search("LEAKING", 10).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, chat.id);
    }
}
