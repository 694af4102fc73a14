//! Lead service: plain CRUD over lookup-only contact records.

use chrono::Utc;
use frontdesk_types::error::ServiceError;
use frontdesk_types::lead::{Lead, LeadUpdate, NewLead};
use tracing::info;
use uuid::Uuid;

use crate::repository::LeadRepository;

pub struct LeadService<R: LeadRepository> {
    repo: R,
}

impl<R: LeadRepository> LeadService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn repo(&self) -> &R {
        &self.repo
    }

    pub async fn create_lead(&self, input: NewLead) -> Result<Lead, ServiceError> {
        if input.name.trim().is_empty() {
            return Err(ServiceError::Validation(
                "lead name must not be empty".to_string(),
            ));
        }

        let now = Utc::now();
        let lead = Lead {
            id: Uuid::now_v7(),
            name: input.name,
            phone: input.phone,
            email: input.email,
            company: input.company,
            source: input.source,
            tags: input.tags,
            created_at: now,
            updated_at: now,
        };

        let created = self
            .repo
            .insert(&lead)
            .await
            .map_err(ServiceError::storage("create_lead", "lead", lead.id))?;
        info!(lead_id = %created.id, name = %created.name, "Lead created");
        Ok(created)
    }

    pub async fn get_lead(&self, id: &Uuid) -> Result<Lead, ServiceError> {
        self.repo
            .get(id)
            .await
            .map_err(ServiceError::storage("get_lead", "lead", id))?
            .ok_or_else(|| ServiceError::not_found("lead", id))
    }

    pub async fn list_leads(
        &self,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<Vec<Lead>, ServiceError> {
        self.repo
            .list(limit, offset)
            .await
            .map_err(ServiceError::storage("list_leads", "lead", "*"))
    }

    pub async fn update_lead(&self, id: &Uuid, update: LeadUpdate) -> Result<Lead, ServiceError> {
        if let Some(name) = &update.name {
            if name.trim().is_empty() {
                return Err(ServiceError::Validation(
                    "lead name must not be empty".to_string(),
                ));
            }
        }

        let mut lead = self.get_lead(id).await?;
        if let Some(name) = update.name {
            lead.name = name;
        }
        if update.phone.is_some() {
            lead.phone = update.phone;
        }
        if update.email.is_some() {
            lead.email = update.email;
        }
        if update.company.is_some() {
            lead.company = update.company;
        }
        if update.source.is_some() {
            lead.source = update.source;
        }
        if let Some(tags) = update.tags {
            lead.tags = tags;
        }
        lead.updated_at = Utc::now();

        self.repo
            .update(&lead)
            .await
            .map_err(ServiceError::storage("update_lead", "lead", lead.id))?;
        Ok(lead)
    }

    /// Hard delete. Chats and callbacks referencing this lead keep their
    /// dangling id; presentation renders it as unknown.
    pub async fn delete_lead(&self, id: &Uuid) -> Result<(), ServiceError> {
        self.repo
            .delete(id)
            .await
            .map_err(ServiceError::storage("delete_lead", "lead", id))?;
        info!(lead_id = %id, "Lead deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use frontdesk_types::error::RepositoryError;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeLeadRepo {
        inner: Mutex<HashMap<Uuid, Lead>>,
    }

    impl LeadRepository for FakeLeadRepo {
        async fn insert(&self, lead: &Lead) -> Result<Lead, RepositoryError> {
            self.inner.lock().unwrap().insert(lead.id, lead.clone());
            Ok(lead.clone())
        }

        async fn get(&self, id: &Uuid) -> Result<Option<Lead>, RepositoryError> {
            Ok(self.inner.lock().unwrap().get(id).cloned())
        }

        async fn list(
            &self,
            limit: Option<i64>,
            offset: Option<i64>,
        ) -> Result<Vec<Lead>, RepositoryError> {
            let mut leads: Vec<Lead> = self.inner.lock().unwrap().values().cloned().collect();
            leads.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            let offset = offset.unwrap_or(0) as usize;
            let mut leads: Vec<Lead> = leads.into_iter().skip(offset).collect();
            if let Some(limit) = limit {
                leads.truncate(limit as usize);
            }
            Ok(leads)
        }

        async fn update(&self, lead: &Lead) -> Result<(), RepositoryError> {
            let mut inner = self.inner.lock().unwrap();
            if !inner.contains_key(&lead.id) {
                return Err(RepositoryError::NotFound);
            }
            inner.insert(lead.id, lead.clone());
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
    }

    fn service() -> LeadService<FakeLeadRepo> {
        LeadService::new(FakeLeadRepo::default())
    }

    #[tokio::test]
    async fn create_and_get() {
        let svc = service();
        let lead = svc
            .create_lead(NewLead {
                name: "Acme Corp".to_string(),
                phone: Some("+1-555-7000".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        let fetched = svc.get_lead(&lead.id).await.unwrap();
        assert_eq!(fetched.name, "Acme Corp");
    }

    #[tokio::test]
    async fn create_rejects_blank_name() {
        let svc = service();
        let err = svc
            .create_lead(NewLead {
                name: "   ".to_string(),
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }

    #[tokio::test]
    async fn update_merges_fields() {
        let svc = service();
        let lead = svc
            .create_lead(NewLead {
                name: "Old Name".to_string(),
                ..Default::default()
            })
            .await
            .unwrap();

        let updated = svc
            .update_lead(
                &lead.id,
                LeadUpdate {
                    name: Some("New Name".to_string()),
                    email: Some("new@example.com".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.name, "New Name");
        assert_eq!(updated.email.as_deref(), Some("new@example.com"));
        assert!(updated.updated_at >= lead.updated_at);
    }

    #[tokio::test]
    async fn delete_then_get_is_not_found() {
        let svc = service();
        let lead = svc
            .create_lead(NewLead {
                name: "Ephemeral".to_string(),
                ..Default::default()
            })
            .await
            .unwrap();
        svc.delete_lead(&lead.id).await.unwrap();
        let err = svc.get_lead(&lead.id).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound { .. }));
    }
}
