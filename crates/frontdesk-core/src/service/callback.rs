//! Callback service: intake, CRUD, lifecycle, search, and stats for
//! callback requests.

use chrono::{DateTime, Utc};
use frontdesk_types::callback::{
    Callback, CallbackOutcome, CallbackStatus, CallbackUpdate, NewCallback,
};
use frontdesk_types::error::ServiceError;
use frontdesk_types::filter::{CallbackFilter, OrderBy, SearchHit};
use frontdesk_types::stats::CallbackStats;
use tracing::{info, warn};
use uuid::Uuid;

use crate::filter::compile_callback_filter;
use crate::lifecycle;
use crate::notify::{DeliveryMethod, NotificationDispatcher, NotificationKind};
use crate::repository::CallbackRepository;
use crate::service::validate_callback_priority;
use crate::stats;

/// Orchestrates the callback side of the dashboard.
pub struct CallbackService<R: CallbackRepository, N: NotificationDispatcher> {
    repo: R,
    notifier: N,
}

impl<R: CallbackRepository, N: NotificationDispatcher> CallbackService<R, N> {
    pub fn new(repo: R, notifier: N) -> Self {
        Self { repo, notifier }
    }

    /// Access the callback repository.
    pub fn repo(&self) -> &R {
        &self.repo
    }

    async fn load(&self, id: &Uuid) -> Result<Callback, ServiceError> {
        self.repo
            .get(id)
            .await
            .map_err(ServiceError::storage("get_callback", "callback", id))?
            .ok_or_else(|| ServiceError::not_found("callback", id))
    }

    async fn persist(&self, callback: &Callback, operation: &str) -> Result<(), ServiceError> {
        self.repo
            .update(callback)
            .await
            .map_err(ServiceError::storage(operation, "callback", callback.id))
    }

    // --- CRUD ---

    /// Intake a new callback request. Starts `pending` with zero attempts.
    pub async fn create_callback(&self, input: NewCallback) -> Result<Callback, ServiceError> {
        if input.client_name.trim().is_empty() {
            return Err(ServiceError::Validation(
                "client_name must not be empty".to_string(),
            ));
        }
        if input.client_phone.trim().is_empty() {
            return Err(ServiceError::Validation(
                "client_phone must not be empty".to_string(),
            ));
        }
        let priority = input.priority.unwrap_or(5);
        validate_callback_priority(priority)?;

        let now = Utc::now();
        let callback = Callback {
            id: Uuid::now_v7(),
            lead_id: input.lead_id,
            client_name: input.client_name,
            client_phone: input.client_phone,
            client_email: input.client_email,
            company_name: input.company_name,
            preferred_callback_time: input.preferred_callback_time,
            preferred_time_range: input.preferred_time_range.unwrap_or_default(),
            timezone: input.timezone,
            urgency: input.urgency.unwrap_or_default(),
            source: input.source,
            tags: input.tags,
            status: CallbackStatus::Pending,
            priority,
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
        };

        let created = self
            .repo
            .insert(&callback)
            .await
            .map_err(ServiceError::storage(
                "create_callback",
                "callback",
                callback.id,
            ))?;
        info!(callback_id = %created.id, client = %created.client_name, "Callback created");
        Ok(created)
    }

    pub async fn get_callback(&self, id: &Uuid) -> Result<Callback, ServiceError> {
        self.load(id).await
    }

    /// List callbacks matching the filter, most recently created first.
    pub async fn list_callbacks(
        &self,
        filter: &CallbackFilter,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<Vec<Callback>, ServiceError> {
        let constraints = compile_callback_filter(filter);
        self.repo
            .list(&constraints, Some(OrderBy::desc("created_at")), limit, offset)
            .await
            .map_err(ServiceError::storage("list_callbacks", "callback", "*"))
    }

    /// Apply a closed-field update; bounds validated before any write.
    pub async fn update_callback(
        &self,
        id: &Uuid,
        update: CallbackUpdate,
    ) -> Result<Callback, ServiceError> {
        if let Some(priority) = update.priority {
            validate_callback_priority(priority)?;
        }
        if let Some(name) = &update.client_name {
            if name.trim().is_empty() {
                return Err(ServiceError::Validation(
                    "client_name must not be empty".to_string(),
                ));
            }
        }
        if let Some(phone) = &update.client_phone {
            if phone.trim().is_empty() {
                return Err(ServiceError::Validation(
                    "client_phone must not be empty".to_string(),
                ));
            }
        }

        let mut callback = self.load(id).await?;

        if let Some(name) = update.client_name {
            callback.client_name = name;
        }
        if let Some(phone) = update.client_phone {
            callback.client_phone = phone;
        }
        if update.client_email.is_some() {
            callback.client_email = update.client_email;
        }
        if update.company_name.is_some() {
            callback.company_name = update.company_name;
        }
        if update.preferred_callback_time.is_some() {
            callback.preferred_callback_time = update.preferred_callback_time;
        }
        if let Some(range) = update.preferred_time_range {
            callback.preferred_time_range = range;
        }
        if update.timezone.is_some() {
            callback.timezone = update.timezone;
        }
        if let Some(urgency) = update.urgency {
            callback.urgency = urgency;
        }
        if let Some(priority) = update.priority {
            callback.priority = priority;
        }
        if let Some(tags) = update.tags {
            callback.tags = tags;
        }
        if let Some(flag) = update.follow_up_required {
            callback.follow_up_required = flag;
        }
        if update.follow_up_date.is_some() {
            callback.follow_up_date = update.follow_up_date;
        }
        if update.assigned_agent_id.is_some() {
            callback.assigned_agent_id = update.assigned_agent_id;
        }
        if update.agent_notes.is_some() {
            callback.agent_notes = update.agent_notes;
        }
        callback.updated_at = Utc::now();

        self.persist(&callback, "update_callback").await?;
        Ok(callback)
    }

    /// Hard delete. No tombstone, no undo.
    pub async fn delete_callback(&self, id: &Uuid) -> Result<(), ServiceError> {
        self.repo
            .delete(id)
            .await
            .map_err(ServiceError::storage("delete_callback", "callback", id))?;
        info!(callback_id = %id, "Callback deleted");
        Ok(())
    }

    /// Case-insensitive substring search with placeholder relevance.
    pub async fn search_callbacks(
        &self,
        query: &str,
        limit: i64,
    ) -> Result<Vec<SearchHit<Callback>>, ServiceError> {
        let hits = self
            .repo
            .search(query, limit)
            .await
            .map_err(ServiceError::storage("search_callbacks", "callback", query))?;
        Ok(hits.into_iter().map(SearchHit::new).collect())
    }

    /// Dashboard statistics over the full unfiltered snapshot.
    pub async fn callback_stats(&self) -> Result<CallbackStats, ServiceError> {
        let callbacks = self
            .repo
            .list(&[], None, None, None)
            .await
            .map_err(ServiceError::storage("callback_stats", "callback", "*"))?;
        Ok(stats::callback_stats(&callbacks))
    }

    // --- Lifecycle ---

    /// Schedule the return call and notify the assigned agent
    /// (fire-and-forget).
    pub async fn schedule_callback(
        &self,
        id: &Uuid,
        scheduled_at: DateTime<Utc>,
        assigned_agent_id: Option<Uuid>,
    ) -> Result<Callback, ServiceError> {
        let mut callback = self.load(id).await?;
        lifecycle::schedule_callback(&mut callback, scheduled_at, assigned_agent_id)?;
        self.persist(&callback, "schedule_callback").await?;

        if let Some(agent_id) = callback.assigned_agent_id {
            if let Err(err) = self
                .notifier
                .dispatch(
                    agent_id,
                    NotificationKind::CallbackScheduled,
                    "Callback scheduled",
                    &format!(
                        "Callback for {} ({}) scheduled at {}",
                        callback.client_name, callback.client_phone, scheduled_at
                    ),
                    DeliveryMethod::Push,
                )
                .await
            {
                warn!(callback_id = %callback.id, error = %err, "Schedule notification failed");
            }
        }

        Ok(callback)
    }

    /// Record one dial attempt; never changes status.
    pub async fn record_attempt(
        &self,
        id: &Uuid,
        outcome: CallbackOutcome,
        notes: Option<String>,
    ) -> Result<Callback, ServiceError> {
        let mut callback = self.load(id).await?;
        lifecycle::record_attempt(&mut callback, outcome, notes)?;
        self.persist(&callback, "record_attempt").await?;
        Ok(callback)
    }

    pub async fn complete_callback(
        &self,
        id: &Uuid,
        outcome: CallbackOutcome,
        outcome_notes: Option<String>,
    ) -> Result<Callback, ServiceError> {
        let mut callback = self.load(id).await?;
        lifecycle::complete_callback(&mut callback, outcome, outcome_notes)?;
        self.persist(&callback, "complete_callback").await?;
        Ok(callback)
    }

    pub async fn cancel_callback(
        &self,
        id: &Uuid,
        notes: Option<String>,
    ) -> Result<Callback, ServiceError> {
        let mut callback = self.load(id).await?;
        lifecycle::cancel_callback(&mut callback, notes)?;
        self.persist(&callback, "cancel_callback").await?;
        Ok(callback)
    }

    pub async fn mark_no_answer(&self, id: &Uuid) -> Result<Callback, ServiceError> {
        let mut callback = self.load(id).await?;
        lifecycle::mark_no_answer(&mut callback)?;
        self.persist(&callback, "mark_no_answer").await?;
        Ok(callback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use frontdesk_types::error::{NotifyError, RepositoryError};
    use frontdesk_types::filter::Constraint;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeCallbackRepo {
        inner: Mutex<HashMap<Uuid, Callback>>,
    }

    impl CallbackRepository for FakeCallbackRepo {
        async fn insert(&self, callback: &Callback) -> Result<Callback, RepositoryError> {
            self.inner
                .lock()
                .unwrap()
                .insert(callback.id, callback.clone());
            Ok(callback.clone())
        }

        async fn get(&self, id: &Uuid) -> Result<Option<Callback>, RepositoryError> {
            Ok(self.inner.lock().unwrap().get(id).cloned())
        }

        async fn list(
            &self,
            constraints: &[Constraint],
            _order: Option<OrderBy>,
            limit: Option<i64>,
            _offset: Option<i64>,
        ) -> Result<Vec<Callback>, RepositoryError> {
            let mut callbacks: Vec<Callback> = self
                .inner
                .lock()
                .unwrap()
                .values()
                .filter(|c| {
                    crate::filter::matches(constraints, &serde_json::to_value(c).unwrap())
                })
                .cloned()
                .collect();
            if let Some(limit) = limit {
                callbacks.truncate(limit as usize);
            }
            Ok(callbacks)
        }

        async fn update(&self, callback: &Callback) -> Result<(), RepositoryError> {
            let mut inner = self.inner.lock().unwrap();
            if !inner.contains_key(&callback.id) {
                return Err(RepositoryError::NotFound);
            }
            inner.insert(callback.id, callback.clone());
            Ok(())
        }

        async fn delete(&self, id: &Uuid) -> Result<(), RepositoryError> {
            self.inner
                .lock()
                .unwrap()
                .remove(id)
                .map(|_| ())
                .ok_or(RepositoryError::NotFound)
        }

        async fn count(&self, constraints: &[Constraint]) -> Result<u64, RepositoryError> {
            Ok(self.list(constraints, None, None, None).await?.len() as u64)
        }

        async fn search(&self, query: &str, limit: i64) -> Result<Vec<Callback>, RepositoryError> {
            let needle = query.to_lowercase();
            let mut callbacks: Vec<Callback> = self
                .inner
                .lock()
                .unwrap()
                .values()
                .filter(|c| {
                    c.client_name.to_lowercase().contains(&needle)
                        || c.client_phone.to_lowercase().contains(&needle)
                })
                .cloned()
                .collect();
            callbacks.truncate(limit as usize);
            Ok(callbacks)
        }
    }

    #[derive(Default)]
    struct FakeNotifier {
        sent: Mutex<Vec<(Uuid, NotificationKind)>>,
    }

    impl NotificationDispatcher for FakeNotifier {
        async fn dispatch(
            &self,
            recipient: Uuid,
            kind: NotificationKind,
            _title: &str,
            _body: &str,
            _method: DeliveryMethod,
        ) -> Result<Option<Uuid>, NotifyError> {
            self.sent.lock().unwrap().push((recipient, kind));
            Ok(None)
        }
    }

    fn service() -> CallbackService<FakeCallbackRepo, FakeNotifier> {
        CallbackService::new(FakeCallbackRepo::default(), FakeNotifier::default())
    }

    fn intake(name: &str, phone: &str) -> NewCallback {
        NewCallback {
            client_name: name.to_string(),
            client_phone: phone.to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn intake_defaults() {
        let svc = service();
        let cb = svc
            .create_callback(intake("John Doe", "+1-555-1000"))
            .await
            .unwrap();
        assert_eq!(cb.status, CallbackStatus::Pending);
        assert_eq!(cb.attempt_count, 0);
        assert_eq!(cb.priority, 5);
        assert!(cb.outcome.is_none());
    }

    #[tokio::test]
    async fn intake_rejects_missing_phone() {
        let svc = service();
        let err = svc.create_callback(intake("Jane", "  ")).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }

    #[tokio::test]
    async fn intake_rejects_out_of_range_priority() {
        let svc = service();
        let err = svc
            .create_callback(NewCallback {
                priority: Some(11),
                ..intake("Jane", "+1-555-2000")
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }

    #[tokio::test]
    async fn two_attempts_reach_count_two() {
        let svc = service();
        let cb = svc
            .create_callback(intake("John Doe", "+1-555-1000"))
            .await
            .unwrap();

        svc.record_attempt(&cb.id, CallbackOutcome::NoAnswer, None)
            .await
            .unwrap();
        let after = svc
            .record_attempt(&cb.id, CallbackOutcome::NoAnswer, None)
            .await
            .unwrap();

        assert_eq!(after.attempt_count, 2);
        assert_eq!(after.outcome, Some(CallbackOutcome::NoAnswer));
        assert!(after.attempted_at.is_some());
        assert_eq!(after.status, CallbackStatus::Pending);
    }

    #[tokio::test]
    async fn schedule_then_complete_preserves_schedule() {
        let svc = service();
        let cb = svc
            .create_callback(intake("John Doe", "+1-555-1000"))
            .await
            .unwrap();
        let when = "2025-03-01T10:00:00Z".parse::<DateTime<Utc>>().unwrap();

        svc.schedule_callback(&cb.id, when, Some(Uuid::now_v7()))
            .await
            .unwrap();
        let done = svc
            .complete_callback(&cb.id, CallbackOutcome::Successful, None)
            .await
            .unwrap();

        assert_eq!(done.status, CallbackStatus::Completed);
        assert!(done.completed_at.is_some());
        assert_eq!(done.scheduled_at, Some(when));
    }

    #[tokio::test]
    async fn schedule_with_agent_sends_notification() {
        let svc = service();
        let cb = svc
            .create_callback(intake("Notify Me", "+1-555-3000"))
            .await
            .unwrap();
        let agent = Uuid::now_v7();

        svc.schedule_callback(&cb.id, Utc::now(), Some(agent))
            .await
            .unwrap();

        let sent = svc.notifier.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0], (agent, NotificationKind::CallbackScheduled));
    }

    #[tokio::test]
    async fn completing_twice_is_invalid() {
        let svc = service();
        let cb = svc
            .create_callback(intake("John Doe", "+1-555-1000"))
            .await
            .unwrap();

        svc.complete_callback(&cb.id, CallbackOutcome::Successful, None)
            .await
            .unwrap();
        let err = svc
            .complete_callback(&cb.id, CallbackOutcome::Successful, None)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidTransition(_)));
    }

    #[tokio::test]
    async fn missing_callback_is_not_found() {
        let svc = service();
        let err = svc.get_callback(&Uuid::now_v7()).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound { .. }));
    }

    #[tokio::test]
    async fn stats_on_empty_store_are_zero() {
        let svc = service();
        let stats = svc.callback_stats().await.unwrap();
        assert_eq!(stats.total, 0);
        assert_eq!(stats.average_attempts, 0.0);
        assert_eq!(stats.completion_rate, 0.0);
    }

    #[tokio::test]
    async fn list_filters_by_status() {
        let svc = service();
        let a = svc
            .create_callback(intake("A", "+1-555-0001"))
            .await
            .unwrap();
        svc.create_callback(intake("B", "+1-555-0002"))
            .await
            .unwrap();
        svc.cancel_callback(&a.id, None).await.unwrap();

        let pending = svc
            .list_callbacks(
                &CallbackFilter {
                    status: vec![CallbackStatus::Pending],
                    ..Default::default()
                },
                None,
                None,
            )
            .await
            .unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].client_name, "B");
    }
}
