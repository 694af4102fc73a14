//! Business logic for Frontdesk.
//!
//! Layers, leaf-first: the filter compiler lowers dashboard filters into
//! store-agnostic constraints; the lifecycle module enforces the chat and
//! callback state machines; the ledger owns a chat's embedded message history;
//! the stats module reduces snapshots into dashboard aggregates; and the
//! service facades orchestrate all of it against the repository and
//! notification collaborator traits. Implementations of the collaborators
//! live in `frontdesk-infra` -- this crate never depends on it.

pub mod filter;
pub mod ledger;
pub mod lifecycle;
pub mod notify;
pub mod repository;
pub mod service;
pub mod stats;
