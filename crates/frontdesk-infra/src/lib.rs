//! Infrastructure implementations for Frontdesk.
//!
//! Concrete backends for the traits defined in `frontdesk-core`:
//! SQLite repositories over a split reader/writer pool, a DashMap-backed
//! in-memory store for tests and ephemeral deployments, a webhook
//! notification dispatcher, and the TOML configuration loader.

pub mod config;
pub mod notify;
pub mod sqlite;
pub mod store;
