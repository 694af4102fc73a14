//! DashMap-backed in-memory repositories.
//!
//! Used for tests and ephemeral deployments where no database file is wanted.
//! Constraint evaluation delegates to `frontdesk_core::filter::matches` over
//! each entity's JSON form, so the in-memory store and the SQLite predicate
//! renderer share one definition of what a constraint means.

use dashmap::DashMap;
use frontdesk_core::filter::matches;
use frontdesk_core::repository::{CallbackRepository, ChatRepository, LeadRepository};
use frontdesk_types::callback::Callback;
use frontdesk_types::chat::Chat;
use frontdesk_types::error::RepositoryError;
use frontdesk_types::filter::{Constraint, OrderBy};
use frontdesk_types::lead::Lead;
use serde::Serialize;
use uuid::Uuid;

fn to_json<T: Serialize>(entity: &T) -> Result<serde_json::Value, RepositoryError> {
    serde_json::to_value(entity).map_err(|e| RepositoryError::Query(format!("serialize: {e}")))
}

/// Filter, sort, and paginate a snapshot of entities.
fn select<T: Serialize + Clone>(
    entities: impl Iterator<Item = T>,
    constraints: &[Constraint],
    order: Option<OrderBy>,
    limit: Option<i64>,
    offset: Option<i64>,
) -> Result<Vec<T>, RepositoryError> {
    let mut selected = Vec::new();
    for entity in entities {
        let json = to_json(&entity)?;
        if matches(constraints, &json) {
            selected.push((json, entity));
        }
    }

    if let Some(order) = order {
        // Timestamps are serialized as RFC 3339 with a fixed offset, so
        // string comparison orders them correctly.
        selected.sort_by(|(a, _), (b, _)| {
            let a = a.get(order.field).and_then(|v| v.as_str()).unwrap_or("");
            let b = b.get(order.field).and_then(|v| v.as_str()).unwrap_or("");
            if order.descending { b.cmp(a) } else { a.cmp(b) }
        });
    }

    let offset = offset.unwrap_or(0).max(0) as usize;
    let mut items: Vec<T> = selected.into_iter().skip(offset).map(|(_, e)| e).collect();
    if let Some(limit) = limit {
        items.truncate(limit.max(0) as usize);
    }
    Ok(items)
}

fn contains_ci(haystack: Option<&str>, needle: &str) -> bool {
    haystack.is_some_and(|h| h.to_lowercase().contains(needle))
}

/// In-memory implementation of `ChatRepository`.
#[derive(Default)]
pub struct InMemoryChatRepository {
    chats: DashMap<Uuid, Chat>,
}

impl InMemoryChatRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ChatRepository for InMemoryChatRepository {
    async fn insert(&self, chat: &Chat) -> Result<Chat, RepositoryError> {
        if self
            .chats
            .iter()
            .any(|e| e.chat_session_id == chat.chat_session_id)
        {
            return Err(RepositoryError::Conflict(format!(
                "chat_session_id '{}' already exists",
                chat.chat_session_id
            )));
        }
        self.chats.insert(chat.id, chat.clone());
        Ok(chat.clone())
    }

    async fn get(&self, id: &Uuid) -> Result<Option<Chat>, RepositoryError> {
        Ok(self.chats.get(id).map(|e| e.clone()))
    }

    async fn get_by_session_id(&self, session_id: &str) -> Result<Option<Chat>, RepositoryError> {
        Ok(self
            .chats
            .iter()
            .find(|e| e.chat_session_id == session_id)
            .map(|e| e.clone()))
    }

    async fn list(
        &self,
        constraints: &[Constraint],
        order: Option<OrderBy>,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<Vec<Chat>, RepositoryError> {
        select(
            self.chats.iter().map(|e| e.clone()),
            constraints,
            order,
            limit,
            offset,
        )
    }

    async fn update(&self, chat: &Chat) -> Result<(), RepositoryError> {
        if !self.chats.contains_key(&chat.id) {
            return Err(RepositoryError::NotFound);
        }
        self.chats.insert(chat.id, chat.clone());
        Ok(())
    }

    async fn delete(&self, id: &Uuid) -> Result<(), RepositoryError> {
        self.chats
            .remove(id)
            .map(|_| ())
            .ok_or(RepositoryError::NotFound)
    }

    async fn count(&self, constraints: &[Constraint]) -> Result<u64, RepositoryError> {
        let mut count = 0;
        for entry in self.chats.iter() {
            if matches(constraints, &to_json(&*entry)?) {
                count += 1;
            }
        }
        Ok(count)
    }

    async fn search(&self, query: &str, limit: i64) -> Result<Vec<Chat>, RepositoryError> {
        let needle = query.to_lowercase();
        let mut hits: Vec<Chat> = self
            .chats
            .iter()
            .filter(|e| {
                e.chat_session_id.to_lowercase().contains(&needle)
                    || contains_ci(e.last_message.as_deref(), &needle)
                    || contains_ci(e.customer_intent.as_deref(), &needle)
                    || contains_ci(e.source.as_deref(), &needle)
            })
            .map(|e| e.clone())
            .collect();
        hits.sort_by(|a, b| b.last_activity_at.cmp(&a.last_activity_at));
        hits.truncate(limit.max(0) as usize);
        Ok(hits)
    }
}

/// In-memory implementation of `CallbackRepository`.
#[derive(Default)]
pub struct InMemoryCallbackRepository {
    callbacks: DashMap<Uuid, Callback>,
}

impl InMemoryCallbackRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CallbackRepository for InMemoryCallbackRepository {
    async fn insert(&self, callback: &Callback) -> Result<Callback, RepositoryError> {
        self.callbacks.insert(callback.id, callback.clone());
        Ok(callback.clone())
    }

    async fn get(&self, id: &Uuid) -> Result<Option<Callback>, RepositoryError> {
        Ok(self.callbacks.get(id).map(|e| e.clone()))
    }

    async fn list(
        &self,
        constraints: &[Constraint],
        order: Option<OrderBy>,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<Vec<Callback>, RepositoryError> {
        select(
            self.callbacks.iter().map(|e| e.clone()),
            constraints,
            order,
            limit,
            offset,
        )
    }

    async fn update(&self, callback: &Callback) -> Result<(), RepositoryError> {
        if !self.callbacks.contains_key(&callback.id) {
            return Err(RepositoryError::NotFound);
        }
        self.callbacks.insert(callback.id, callback.clone());
        Ok(())
    }

    async fn delete(&self, id: &Uuid) -> Result<(), RepositoryError> {
        self.callbacks
            .remove(id)
            .map(|_| ())
            .ok_or(RepositoryError::NotFound)
    }

    async fn count(&self, constraints: &[Constraint]) -> Result<u64, RepositoryError> {
        let mut count = 0;
        for entry in self.callbacks.iter() {
            if matches(constraints, &to_json(&*entry)?) {
                count += 1;
            }
        }
        Ok(count)
    }

    async fn search(&self, query: &str, limit: i64) -> Result<Vec<Callback>, RepositoryError> {
        let needle = query.to_lowercase();
        let mut hits: Vec<Callback> = self
            .callbacks
            .iter()
            .filter(|e| {
                e.client_name.to_lowercase().contains(&needle)
                    || e.client_phone.to_lowercase().contains(&needle)
                    || contains_ci(e.client_email.as_deref(), &needle)
                    || contains_ci(e.company_name.as_deref(), &needle)
            })
            .map(|e| e.clone())
            .collect();
        hits.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        hits.truncate(limit.max(0) as usize);
        Ok(hits)
    }
}

/// In-memory implementation of `LeadRepository`.
#[derive(Default)]
pub struct InMemoryLeadRepository {
    leads: DashMap<Uuid, Lead>,
}

impl InMemoryLeadRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LeadRepository for InMemoryLeadRepository {
    async fn insert(&self, lead: &Lead) -> Result<Lead, RepositoryError> {
        self.leads.insert(lead.id, lead.clone());
        Ok(lead.clone())
    }

    async fn get(&self, id: &Uuid) -> Result<Option<Lead>, RepositoryError> {
        Ok(self.leads.get(id).map(|e| e.clone()))
    }

    async fn list(
        &self,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<Vec<Lead>, RepositoryError> {
        let mut leads: Vec<Lead> = self.leads.iter().map(|e| e.clone()).collect();
        leads.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        let offset = offset.unwrap_or(0).max(0) as usize;
        let mut leads: Vec<Lead> = leads.into_iter().skip(offset).collect();
        if let Some(limit) = limit {
            leads.truncate(limit.max(0) as usize);
        }
        Ok(leads)
    }

    async fn update(&self, lead: &Lead) -> Result<(), RepositoryError> {
        if !self.leads.contains_key(&lead.id) {
            return Err(RepositoryError::NotFound);
        }
        self.leads.insert(lead.id, lead.clone());
        Ok(())
    }

    async fn delete(&self, id: &Uuid) -> Result<(), RepositoryError> {
        self.leads
            .remove(id)
            .map(|_| ())
            .ok_or(RepositoryError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use frontdesk_types::chat::{ChatPriority, ChatStatus, ChatType};
    use frontdesk_types::filter::FilterValue;

    fn make_chat(session_id: &str, status: ChatStatus) -> Chat {
        let now = Utc::now();
        Chat {
            id: Uuid::now_v7(),
            chat_session_id: session_id.to_string(),
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

    #[tokio::test]
    async fn chat_duplicate_session_id_is_conflict() {
        let repo = InMemoryChatRepository::new();
        repo.insert(&make_chat("sess-1", ChatStatus::Active))
            .await
            .unwrap();
        let err = repo
            .insert(&make_chat("sess-1", ChatStatus::Active))
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));
    }

    #[tokio::test]
    async fn chat_list_applies_constraints_and_order() {
        let repo = InMemoryChatRepository::new();
        repo.insert(&make_chat("sess-a", ChatStatus::Active))
            .await
            .unwrap();
        repo.insert(&make_chat("sess-b", ChatStatus::Closed))
            .await
            .unwrap();
        repo.insert(&make_chat("sess-c", ChatStatus::Active))
            .await
            .unwrap();

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
        // Descending: most recently started first
        assert!(active[0].started_at >= active[1].started_at);

        let count = repo.count(&[]).await.unwrap();
        assert_eq!(count, 3);
    }

    #[tokio::test]
    async fn chat_search_is_case_insensitive() {
        let repo = InMemoryChatRepository::new();
        let mut chat = make_chat("sess-search", ChatStatus::Active);
        chat.last_message = Some("Need an Electrician".to_string());
        repo.insert(&chat).await.unwrap();

        let hits = repo.search("electrician", 10).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert!(repo.search("plumber", 10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn lead_crud_roundtrip() {
        let repo = InMemoryLeadRepository::new();
        let now = Utc::now();
        let lead = Lead {
            id: Uuid::now_v7(),
            name: "Test Lead".to_string(),
            phone: None,
            email: None,
            company: None,
            source: None,
            tags: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        repo.insert(&lead).await.unwrap();
        assert!(repo.get(&lead.id).await.unwrap().is_some());
        repo.delete(&lead.id).await.unwrap();
        assert!(matches!(
            repo.delete(&lead.id).await.unwrap_err(),
            RepositoryError::NotFound
        ));
    }
}
