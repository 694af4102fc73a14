//! Shared domain types for Frontdesk.
//!
//! This crate holds the entity model for the receptionist dashboard: chats with
//! their embedded message history, callback requests, leads, filter and
//! statistics shapes, and the error taxonomy. Pure data, no behavior beyond
//! parsing/formatting of the enumerations -- every other crate treats these
//! shapes as the single source of truth for valid field values.

pub mod callback;
pub mod chat;
pub mod config;
pub mod error;
pub mod filter;
pub mod lead;
pub mod stats;
