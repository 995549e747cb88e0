//! Conversation thread stores for Persona.
//!
//! All backends implement the `persona_core::ThreadStore` trait.

pub mod in_memory;
#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use in_memory::InMemoryStore;
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteStore;
