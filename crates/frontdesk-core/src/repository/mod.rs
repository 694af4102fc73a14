//! Repository trait definitions.
//!
//! One trait per aggregate, implemented in `frontdesk-infra` (SQLite and
//! in-memory). All use native async fn in traits (RPITIT, Rust 2024 edition)
//! with `Send` futures so services stay executor-agnostic.

pub mod callback;
pub mod chat;
pub mod lead;

pub use callback::CallbackRepository;
pub use chat::ChatRepository;
pub use lead::LeadRepository;
