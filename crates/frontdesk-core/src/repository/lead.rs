//! LeadRepository trait definition.
//!
//! Leads are lookup-only weak-reference targets; the trait is plain CRUD with
//! no filtering beyond pagination. Deleting a lead must not cascade into
//! chats or callbacks -- the store holds no foreign-key ownership here.

use frontdesk_types::error::RepositoryError;
use frontdesk_types::lead::Lead;
use uuid::Uuid;

pub trait LeadRepository: Send + Sync {
    fn insert(
        &self,
        lead: &Lead,
    ) -> impl std::future::Future<Output = Result<Lead, RepositoryError>> + Send;

    fn get(
        &self,
        id: &Uuid,
    ) -> impl std::future::Future<Output = Result<Option<Lead>, RepositoryError>> + Send;

    fn list(
        &self,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> impl std::future::Future<Output = Result<Vec<Lead>, RepositoryError>> + Send;

    fn update(
        &self,
        lead: &Lead,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    fn delete(
        &self,
        id: &Uuid,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;
}
