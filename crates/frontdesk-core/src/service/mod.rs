//! Service facades orchestrating the filter compiler, lifecycle manager,
//! message ledger, and aggregator against the persistence and notification
//! collaborators.
//!
//! All collaborators are injected at construction time; the facades hold no
//! process-wide state of their own and re-fetch what they need per call.
//! The facade layer is the sole boundary that wraps raw `RepositoryError`s
//! into the public `ServiceError` taxonomy.

pub mod callback;
pub mod chat;
pub mod lead;

pub use callback::CallbackService;
pub use chat::ChatService;
pub use lead::LeadService;

use frontdesk_types::error::ServiceError;

/// Bounds check for 1-5 rating fields.
pub(crate) fn validate_rating(field: &str, value: u8) -> Result<(), ServiceError> {
    if !(1..=5).contains(&value) {
        return Err(ServiceError::Validation(format!(
            "{field} must be between 1 and 5, got {value}"
        )));
    }
    Ok(())
}

/// Bounds check for the 0.00-10.00 quality score.
pub(crate) fn validate_quality_score(value: f64) -> Result<(), ServiceError> {
    if !(0.0..=10.0).contains(&value) {
        return Err(ServiceError::Validation(format!(
            "quality_score must be between 0.0 and 10.0, got {value}"
        )));
    }
    Ok(())
}

/// Bounds check for callback priority (1 = highest, 10 = lowest).
pub(crate) fn validate_callback_priority(value: u8) -> Result<(), ServiceError> {
    if !(1..=10).contains(&value) {
        return Err(ServiceError::Validation(format!(
            "priority must be between 1 and 10, got {value}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rating_bounds() {
        assert!(validate_rating("customer_satisfaction", 1).is_ok());
        assert!(validate_rating("customer_satisfaction", 5).is_ok());
        assert!(validate_rating("customer_satisfaction", 0).is_err());
        assert!(validate_rating("customer_satisfaction", 6).is_err());
    }

    #[test]
    fn quality_bounds() {
        assert!(validate_quality_score(0.0).is_ok());
        assert!(validate_quality_score(10.0).is_ok());
        assert!(validate_quality_score(10.01).is_err());
        assert!(validate_quality_score(-0.1).is_err());
    }

    #[test]
    fn callback_priority_bounds() {
        assert!(validate_callback_priority(1).is_ok());
        assert!(validate_callback_priority(10).is_ok());
        assert!(validate_callback_priority(0).is_err());
        assert!(validate_callback_priority(11).is_err());
    }
}
