use thiserror::Error;

/// Errors from repository operations (used by trait definitions in frontdesk-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),

    #[error("entity not found")]
    NotFound,

    #[error("conflict: {0}")]
    Conflict(String),
}

/// Errors from notification dispatch.
///
/// The service facades treat these as fire-and-forget failures: logged,
/// never propagated to the caller.
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("dispatch failed: {0}")]
    Dispatch(String),

    #[error("no delivery endpoint configured")]
    NotConfigured,
}

/// The public error taxonomy surfaced by the service facades.
///
/// The facade is the sole boundary converting raw [`RepositoryError`]s into
/// `Storage` variants carrying the failing operation and entity id. Nothing
/// below the facade swallows an error; the only guarded case is the
/// aggregator's empty-denominator division.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Input field outside its enumerated domain or bounds. The operation is
    /// aborted before any write.
    #[error("validation error: {0}")]
    Validation(String),

    /// Referenced entity does not exist at read time.
    #[error("{entity} '{id}' not found")]
    NotFound { entity: &'static str, id: String },

    /// Lifecycle operation attempted from a state that does not permit it.
    #[error("invalid transition: {0}")]
    InvalidTransition(String),

    /// Underlying persistence call failed; wrapped with operation context.
    #[error("storage error during {operation}: {source}")]
    Storage {
        operation: String,
        source: RepositoryError,
    },
}

impl ServiceError {
    /// Wrap a repository failure with the failing operation's name, mapping
    /// the store's own not-found signal into the taxonomy's `NotFound`.
    pub fn storage(operation: impl Into<String>, entity: &'static str, id: impl ToString) -> impl FnOnce(RepositoryError) -> ServiceError {
        let operation = operation.into();
        let id = id.to_string();
        move |source| match source {
            RepositoryError::NotFound => ServiceError::NotFound { entity, id },
            source => ServiceError::Storage { operation, source },
        }
    }

    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        ServiceError::NotFound {
            entity,
            id: id.to_string(),
        }
    }
}
