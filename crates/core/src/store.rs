//! ThreadStore trait — durable conversation history.
//!
//! The store is what makes multi-turn conversations work: every generation
//! replays the prior turns for a thread, and successful turns are appended
//! afterwards. Rows are keyed by the (resource id, thread id) pair the
//! generation service binds at call time.

use crate::error::StoreError;
use crate::message::{Message, ThreadId, Transcript};
use async_trait::async_trait;

/// The core ThreadStore trait.
///
/// Implementations: SQLite (durable), in-memory (testing / ephemeral).
#[async_trait]
pub trait ThreadStore: Send + Sync {
    /// The backend name (e.g., "sqlite", "in_memory").
    fn name(&self) -> &str;

    /// Load the full transcript for a thread, oldest message first.
    /// An unknown thread yields an empty transcript, not an error.
    async fn history(
        &self,
        resource_id: &ThreadId,
        thread_id: &ThreadId,
    ) -> std::result::Result<Transcript, StoreError>;

    /// Append messages to a thread, preserving order.
    async fn append(
        &self,
        resource_id: &ThreadId,
        thread_id: &ThreadId,
        messages: Vec<Message>,
    ) -> std::result::Result<(), StoreError>;

    /// List the thread ids known for a resource.
    async fn threads(&self, resource_id: &ThreadId)
    -> std::result::Result<Vec<ThreadId>, StoreError>;

    /// Delete a thread and all its messages. Returns whether it existed.
    async fn delete_thread(
        &self,
        resource_id: &ThreadId,
        thread_id: &ThreadId,
    ) -> std::result::Result<bool, StoreError>;
}
