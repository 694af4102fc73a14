//! HTTP request handlers organized by resource.

pub mod callback;
pub mod chat;
pub mod lead;
pub mod stats;
