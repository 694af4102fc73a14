//! SQLite-backed repository implementations.

pub mod callback;
pub mod chat;
pub mod lead;
pub mod pool;
pub mod predicate;

pub use callback::SqliteCallbackRepository;
pub use chat::SqliteChatRepository;
pub use lead::SqliteLeadRepository;
pub use pool::DatabasePool;

use chrono::{DateTime, Utc};
use frontdesk_types::error::RepositoryError;

pub(crate) fn parse_datetime(s: &str) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::Query(format!("invalid datetime: {e}")))
}

pub(crate) fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339()
}
