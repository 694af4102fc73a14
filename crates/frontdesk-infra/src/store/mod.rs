//! Non-SQLite storage backends.

pub mod memory;

pub use memory::{InMemoryCallbackRepository, InMemoryChatRepository, InMemoryLeadRepository};
