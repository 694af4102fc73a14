//! Observability setup for Frontdesk.

pub mod tracing_setup;
