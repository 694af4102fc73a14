//! CallbackRepository trait definition.

use frontdesk_types::callback::Callback;
use frontdesk_types::error::RepositoryError;
use frontdesk_types::filter::{Constraint, OrderBy};
use uuid::Uuid;

/// Repository trait for callback persistence.
///
/// Same contract shape as `ChatRepository`: full-snapshot writes, conjunctive
/// constraint lists, hard deletes.
pub trait CallbackRepository: Send + Sync {
    fn insert(
        &self,
        callback: &Callback,
    ) -> impl std::future::Future<Output = Result<Callback, RepositoryError>> + Send;

    fn get(
        &self,
        id: &Uuid,
    ) -> impl std::future::Future<Output = Result<Option<Callback>, RepositoryError>> + Send;

    fn list(
        &self,
        constraints: &[Constraint],
        order: Option<OrderBy>,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> impl std::future::Future<Output = Result<Vec<Callback>, RepositoryError>> + Send;

    fn update(
        &self,
        callback: &Callback,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    fn delete(
        &self,
        id: &Uuid,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    fn count(
        &self,
        constraints: &[Constraint],
    ) -> impl std::future::Future<Output = Result<u64, RepositoryError>> + Send;

    /// Case-insensitive substring search over client name, phone, email,
    /// company, and notes. Arbitrary order.
    fn search(
        &self,
        query: &str,
        limit: i64,
    ) -> impl std::future::Future<Output = Result<Vec<Callback>, RepositoryError>> + Send;
}
