//! ChatRepository trait definition.

use frontdesk_types::chat::Chat;
use frontdesk_types::error::RepositoryError;
use frontdesk_types::filter::{Constraint, OrderBy};
use uuid::Uuid;

/// Repository trait for chat persistence.
///
/// Implementations live in frontdesk-infra (`SqliteChatRepository`,
/// `InMemoryChatRepository`). Writes replace the full entity snapshot; the
/// store provides no client-side locking, so read-modify-write races are the
/// store's concern, not this trait's.
pub trait ChatRepository: Send + Sync {
    /// Persist a new chat. Fails with `Conflict` when `chat_session_id`
    /// already exists.
    fn insert(
        &self,
        chat: &Chat,
    ) -> impl std::future::Future<Output = Result<Chat, RepositoryError>> + Send;

    /// Fetch a chat by its system-assigned id.
    fn get(
        &self,
        id: &Uuid,
    ) -> impl std::future::Future<Output = Result<Option<Chat>, RepositoryError>> + Send;

    /// Fetch a chat by its caller-assigned external session id.
    fn get_by_session_id(
        &self,
        session_id: &str,
    ) -> impl std::future::Future<Output = Result<Option<Chat>, RepositoryError>> + Send;

    /// List chats matching every constraint (conjunctive).
    fn list(
        &self,
        constraints: &[Constraint],
        order: Option<OrderBy>,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> impl std::future::Future<Output = Result<Vec<Chat>, RepositoryError>> + Send;

    /// Replace the stored snapshot of an existing chat.
    fn update(
        &self,
        chat: &Chat,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Hard-delete a chat. No tombstone, no undo.
    fn delete(
        &self,
        id: &Uuid,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Count chats matching every constraint.
    fn count(
        &self,
        constraints: &[Constraint],
    ) -> impl std::future::Future<Output = Result<u64, RepositoryError>> + Send;

    /// Case-insensitive substring search over the chat's text fields
    /// (session id, last message, customer intent, source). Arbitrary order.
    fn search(
        &self,
        query: &str,
        limit: i64,
    ) -> impl std::future::Future<Output = Result<Vec<Chat>, RepositoryError>> + Send;
}
