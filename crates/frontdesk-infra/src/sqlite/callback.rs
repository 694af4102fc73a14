//! SQLite callback repository implementation.
//!
//! Same shape as `SqliteChatRepository`: raw queries, a private Row struct,
//! enum columns stored as strings, `tags` as a JSON TEXT column.

use frontdesk_core::repository::CallbackRepository;
use frontdesk_types::callback::{Callback, CallbackOutcome, CallbackStatus, TimeRange, Urgency};
use frontdesk_types::error::RepositoryError;
use frontdesk_types::filter::{Constraint, OrderBy};
use sqlx::Row;
use uuid::Uuid;

use super::pool::DatabasePool;
use super::predicate::{bind_all, render, render_tail};
use super::{format_datetime, parse_datetime};

/// SQLite-backed implementation of `CallbackRepository`.
pub struct SqliteCallbackRepository {
    pool: DatabasePool,
}

impl SqliteCallbackRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

/// Internal row type for mapping SQLite rows to domain Callback.
struct CallbackRow {
    id: String,
    lead_id: Option<String>,
    client_name: String,
    client_phone: String,
    client_email: Option<String>,
    company_name: Option<String>,
    preferred_callback_time: Option<String>,
    preferred_time_range: String,
    timezone: Option<String>,
    urgency: String,
    source: Option<String>,
    tags: String,
    status: String,
    priority: i64,
    attempt_count: i64,
    attempted_at: Option<String>,
    scheduled_at: Option<String>,
    completed_at: Option<String>,
    outcome: Option<String>,
    outcome_notes: Option<String>,
    follow_up_required: i64,
    follow_up_date: Option<String>,
    assigned_agent_id: Option<String>,
    agent_notes: Option<String>,
    created_at: String,
    updated_at: String,
}

impl CallbackRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            lead_id: row.try_get("lead_id")?,
            client_name: row.try_get("client_name")?,
            client_phone: row.try_get("client_phone")?,
            client_email: row.try_get("client_email")?,
            company_name: row.try_get("company_name")?,
            preferred_callback_time: row.try_get("preferred_callback_time")?,
            preferred_time_range: row.try_get("preferred_time_range")?,
            timezone: row.try_get("timezone")?,
            urgency: row.try_get("urgency")?,
            source: row.try_get("source")?,
            tags: row.try_get("tags")?,
            status: row.try_get("status")?,
            priority: row.try_get("priority")?,
            attempt_count: row.try_get("attempt_count")?,
            attempted_at: row.try_get("attempted_at")?,
            scheduled_at: row.try_get("scheduled_at")?,
            completed_at: row.try_get("completed_at")?,
            outcome: row.try_get("outcome")?,
            outcome_notes: row.try_get("outcome_notes")?,
            follow_up_required: row.try_get("follow_up_required")?,
            follow_up_date: row.try_get("follow_up_date")?,
            assigned_agent_id: row.try_get("assigned_agent_id")?,
            agent_notes: row.try_get("agent_notes")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    fn into_callback(self) -> Result<Callback, RepositoryError> {
        let id = Uuid::parse_str(&self.id)
            .map_err(|e| RepositoryError::Query(format!("invalid callback id: {e}")))?;
        let lead_id = self
            .lead_id
            .as_deref()
            .map(Uuid::parse_str)
            .transpose()
            .map_err(|e| RepositoryError::Query(format!("invalid lead_id: {e}")))?;
        let assigned_agent_id = self
            .assigned_agent_id
            .as_deref()
            .map(Uuid::parse_str)
            .transpose()
            .map_err(|e| RepositoryError::Query(format!("invalid assigned_agent_id: {e}")))?;
        let preferred_time_range: TimeRange = self
            .preferred_time_range
            .parse()
            .map_err(|e: String| RepositoryError::Query(e))?;
        let urgency: Urgency = self
            .urgency
            .parse()
            .map_err(|e: String| RepositoryError::Query(e))?;
        let status: CallbackStatus = self
            .status
            .parse()
            .map_err(|e: String| RepositoryError::Query(e))?;
        let outcome: Option<CallbackOutcome> = self
            .outcome
            .as_deref()
            .map(str::parse)
            .transpose()
            .map_err(RepositoryError::Query)?;
        let tags: Vec<String> = serde_json::from_str(&self.tags)
            .map_err(|e| RepositoryError::Query(format!("invalid tags json: {e}")))?;

        Ok(Callback {
            id,
            lead_id,
            client_name: self.client_name,
            client_phone: self.client_phone,
            client_email: self.client_email,
            company_name: self.company_name,
            preferred_callback_time: self
                .preferred_callback_time
                .as_deref()
                .map(parse_datetime)
                .transpose()?,
            preferred_time_range,
            timezone: self.timezone,
            urgency,
            source: self.source,
            tags,
            status,
            priority: self.priority as u8,
            attempt_count: self.attempt_count as u32,
            attempted_at: self
                .attempted_at
                .as_deref()
                .map(parse_datetime)
                .transpose()?,
            scheduled_at: self
                .scheduled_at
                .as_deref()
                .map(parse_datetime)
                .transpose()?,
            completed_at: self
                .completed_at
                .as_deref()
                .map(parse_datetime)
                .transpose()?,
            outcome,
            outcome_notes: self.outcome_notes,
            follow_up_required: self.follow_up_required != 0,
            follow_up_date: self
                .follow_up_date
                .as_deref()
                .map(parse_datetime)
                .transpose()?,
            assigned_agent_id,
            agent_notes: self.agent_notes,
            created_at: parse_datetime(&self.created_at)?,
            updated_at: parse_datetime(&self.updated_at)?,
        })
    }
}

fn tags_json(tags: &[String]) -> Result<String, RepositoryError> {
    serde_json::to_string(tags).map_err(|e| RepositoryError::Query(format!("serialize tags: {e}")))
}

impl CallbackRepository for SqliteCallbackRepository {
    async fn insert(&self, callback: &Callback) -> Result<Callback, RepositoryError> {
        sqlx::query(
            r#"INSERT INTO callbacks (
                   id, lead_id, client_name, client_phone, client_email, company_name,
                   preferred_callback_time, preferred_time_range, timezone, urgency, source,
                   tags, status, priority, attempt_count, attempted_at, scheduled_at,
                   completed_at, outcome, outcome_notes, follow_up_required, follow_up_date,
                   assigned_agent_id, agent_notes, created_at, updated_at
               ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(callback.id.to_string())
        .bind(callback.lead_id.map(|v| v.to_string()))
        .bind(&callback.client_name)
        .bind(&callback.client_phone)
        .bind(&callback.client_email)
        .bind(&callback.company_name)
        .bind(callback.preferred_callback_time.as_ref().map(format_datetime))
        .bind(callback.preferred_time_range.to_string())
        .bind(&callback.timezone)
        .bind(callback.urgency.to_string())
        .bind(&callback.source)
        .bind(tags_json(&callback.tags)?)
        .bind(callback.status.to_string())
        .bind(callback.priority as i64)
        .bind(callback.attempt_count as i64)
        .bind(callback.attempted_at.as_ref().map(format_datetime))
        .bind(callback.scheduled_at.as_ref().map(format_datetime))
        .bind(callback.completed_at.as_ref().map(format_datetime))
        .bind(callback.outcome.map(|v| v.to_string()))
        .bind(&callback.outcome_notes)
        .bind(callback.follow_up_required as i64)
        .bind(callback.follow_up_date.as_ref().map(format_datetime))
        .bind(callback.assigned_agent_id.map(|v| v.to_string()))
        .bind(&callback.agent_notes)
        .bind(format_datetime(&callback.created_at))
        .bind(format_datetime(&callback.updated_at))
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(callback.clone())
    }

    async fn get(&self, id: &Uuid) -> Result<Option<Callback>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM callbacks WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        match row {
            Some(row) => {
                let callback_row = CallbackRow::from_row(&row)
                    .map_err(|e| RepositoryError::Query(e.to_string()))?;
                Ok(Some(callback_row.into_callback()?))
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
    ) -> Result<Vec<Callback>, RepositoryError> {
        let predicate = render(constraints);
        let sql = format!(
            "SELECT * FROM callbacks{}{}",
            predicate.clause,
            render_tail(order, limit, offset)
        );

        let rows = bind_all(sqlx::query(&sql), predicate.binds)
            .fetch_all(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let mut callbacks = Vec::with_capacity(rows.len());
        for row in &rows {
            let callback_row =
                CallbackRow::from_row(row).map_err(|e| RepositoryError::Query(e.to_string()))?;
            callbacks.push(callback_row.into_callback()?);
        }

        Ok(callbacks)
    }

    async fn update(&self, callback: &Callback) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r#"UPDATE callbacks
               SET lead_id = ?, client_name = ?, client_phone = ?, client_email = ?,
                   company_name = ?, preferred_callback_time = ?, preferred_time_range = ?,
                   timezone = ?, urgency = ?, source = ?, tags = ?, status = ?, priority = ?,
                   attempt_count = ?, attempted_at = ?, scheduled_at = ?, completed_at = ?,
                   outcome = ?, outcome_notes = ?, follow_up_required = ?, follow_up_date = ?,
                   assigned_agent_id = ?, agent_notes = ?, updated_at = ?
               WHERE id = ?"#,
        )
        .bind(callback.lead_id.map(|v| v.to_string()))
        .bind(&callback.client_name)
        .bind(&callback.client_phone)
        .bind(&callback.client_email)
        .bind(&callback.company_name)
        .bind(callback.preferred_callback_time.as_ref().map(format_datetime))
        .bind(callback.preferred_time_range.to_string())
        .bind(&callback.timezone)
        .bind(callback.urgency.to_string())
        .bind(&callback.source)
        .bind(tags_json(&callback.tags)?)
        .bind(callback.status.to_string())
        .bind(callback.priority as i64)
        .bind(callback.attempt_count as i64)
        .bind(callback.attempted_at.as_ref().map(format_datetime))
        .bind(callback.scheduled_at.as_ref().map(format_datetime))
        .bind(callback.completed_at.as_ref().map(format_datetime))
        .bind(callback.outcome.map(|v| v.to_string()))
        .bind(&callback.outcome_notes)
        .bind(callback.follow_up_required as i64)
        .bind(callback.follow_up_date.as_ref().map(format_datetime))
        .bind(callback.assigned_agent_id.map(|v| v.to_string()))
        .bind(&callback.agent_notes)
        .bind(format_datetime(&callback.updated_at))
        .bind(callback.id.to_string())
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    async fn delete(&self, id: &Uuid) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM callbacks WHERE id = ?")
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
        let sql = format!("SELECT COUNT(*) as cnt FROM callbacks{}", predicate.clause);

        let row = bind_all(sqlx::query(&sql), predicate.binds)
            .fetch_one(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let count: i64 = row
            .try_get("cnt")
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(count as u64)
    }

    async fn search(&self, query: &str, limit: i64) -> Result<Vec<Callback>, RepositoryError> {
        let pattern = format!("%{query}%");
        let rows = sqlx::query(
            r#"SELECT * FROM callbacks
               WHERE client_name LIKE ?1
                  OR client_phone LIKE ?1
                  OR client_email LIKE ?1
                  OR company_name LIKE ?1
               ORDER BY created_at DESC
               LIMIT ?2"#,
        )
        .bind(&pattern)
        .bind(limit)
        .fetch_all(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let mut callbacks = Vec::with_capacity(rows.len());
        for row in &rows {
            let callback_row =
                CallbackRow::from_row(row).map_err(|e| RepositoryError::Query(e.to_string()))?;
            callbacks.push(callback_row.into_callback()?);
        }

        Ok(callbacks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use frontdesk_types::filter::FilterValue;

    async fn test_pool() -> DatabasePool {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let url = format!("sqlite://{}?mode=rwc", db_path.display());
        std::mem::forget(dir);
        DatabasePool::new(&url).await.unwrap()
    }

    fn make_callback(name: &str, phone: &str) -> Callback {
        let now = Utc::now();
        Callback {
            id: Uuid::now_v7(),
            lead_id: None,
            client_name: name.to_string(),
            client_phone: phone.to_string(),
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

    #[tokio::test]
    async fn test_insert_and_get() {
        let pool = test_pool().await;
        let repo = SqliteCallbackRepository::new(pool);

        let cb = make_callback("John Doe", "+1-555-1000");
        repo.insert(&cb).await.unwrap();

        let found = repo.get(&cb.id).await.unwrap().unwrap();
        assert_eq!(found.client_name, "John Doe");
        assert_eq!(found.status, CallbackStatus::Pending);
        assert_eq!(found.priority, 5);
        assert_eq!(found.attempt_count, 0);
    }

    #[tokio::test]
    async fn test_update_attempt_tracking() {
        let pool = test_pool().await;
        let repo = SqliteCallbackRepository::new(pool);

        let mut cb = make_callback("Jane Doe", "+1-555-2000");
        repo.insert(&cb).await.unwrap();

        cb.attempt_count = 2;
        cb.attempted_at = Some(Utc::now());
        cb.outcome = Some(CallbackOutcome::NoAnswer);
        repo.update(&cb).await.unwrap();

        let found = repo.get(&cb.id).await.unwrap().unwrap();
        assert_eq!(found.attempt_count, 2);
        assert_eq!(found.outcome, Some(CallbackOutcome::NoAnswer));
        assert_eq!(found.status, CallbackStatus::Pending);
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let pool = test_pool().await;
        let repo = SqliteCallbackRepository::new(pool);

        let err = repo
            .update(&make_callback("Ghost", "+1-555-0000"))
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound));
    }

    #[tokio::test]
    async fn test_list_filters_by_urgency() {
        let pool = test_pool().await;
        let repo = SqliteCallbackRepository::new(pool);

        let mut urgent = make_callback("Urgent Client", "+1-555-3000");
        urgent.urgency = Urgency::Urgent;
        repo.insert(&urgent).await.unwrap();
        repo.insert(&make_callback("Calm Client", "+1-555-4000"))
            .await
            .unwrap();

        let found = repo
            .list(
                &[Constraint::AnyOf {
                    field: "urgency",
                    values: vec![FilterValue::Text("urgent".to_string())],
                }],
                Some(OrderBy::desc("created_at")),
                None,
                None,
            )
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].client_name, "Urgent Client");
    }

    #[tokio::test]
    async fn test_delete_and_count() {
        let pool = test_pool().await;
        let repo = SqliteCallbackRepository::new(pool);

        let cb = make_callback("Temp", "+1-555-5000");
        repo.insert(&cb).await.unwrap();
        assert_eq!(repo.count(&[]).await.unwrap(), 1);

        repo.delete(&cb.id).await.unwrap();
        assert_eq!(repo.count(&[]).await.unwrap(), 0);
        assert!(repo.get(&cb.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_search_matches_name_and_phone() {
        let pool = test_pool().await;
        let repo = SqliteCallbackRepository::new(pool);

        repo.insert(&make_callback("Alice Smith", "+1-555-6000"))
            .await
            .unwrap();
        repo.insert(&make_callback("Bob Jones", "+1-555-7000"))
            .await
            .unwrap();

        let by_name = repo.search("smith", 10).await.unwrap();
        assert_eq!(by_name.len(), 1);
        assert_eq!(by_name[0].client_name, "Alice Smith");

        let by_phone = repo.search("555-7000", 10).await.unwrap();
        assert_eq!(by_phone.len(), 1);
        assert_eq!(by_phone[0].client_name, "Bob Jones");
    }
}
