//! In-memory store — useful for testing and ephemeral sessions.

use async_trait::async_trait;
use persona_core::error::StoreError;
use persona_core::message::{Message, ThreadId, Transcript};
use persona_core::store::ThreadStore;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

type ThreadKey = (String, String);

/// An in-memory store keeping transcripts in a HashMap.
/// Useful for testing and sessions where persistence isn't needed.
pub struct InMemoryStore {
    threads: Arc<RwLock<HashMap<ThreadKey, Vec<Message>>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            threads: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    fn key(resource_id: &ThreadId, thread_id: &ThreadId) -> ThreadKey {
        (resource_id.0.clone(), thread_id.0.clone())
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ThreadStore for InMemoryStore {
    fn name(&self) -> &str {
        "in_memory"
    }

    async fn history(
        &self,
        resource_id: &ThreadId,
        thread_id: &ThreadId,
    ) -> Result<Transcript, StoreError> {
        let threads = self.threads.read().await;
        let messages = threads
            .get(&Self::key(resource_id, thread_id))
            .cloned()
            .unwrap_or_default();
        Ok(Transcript { messages })
    }

    async fn append(
        &self,
        resource_id: &ThreadId,
        thread_id: &ThreadId,
        messages: Vec<Message>,
    ) -> Result<(), StoreError> {
        let mut threads = self.threads.write().await;
        threads
            .entry(Self::key(resource_id, thread_id))
            .or_default()
            .extend(messages);
        Ok(())
    }

    async fn threads(&self, resource_id: &ThreadId) -> Result<Vec<ThreadId>, StoreError> {
        let threads = self.threads.read().await;
        Ok(threads
            .keys()
            .filter(|(r, _)| r == &resource_id.0)
            .map(|(_, t)| ThreadId::from(t))
            .collect())
    }

    async fn delete_thread(
        &self,
        resource_id: &ThreadId,
        thread_id: &ThreadId,
    ) -> Result<bool, StoreError> {
        let mut threads = self.threads.write().await;
        Ok(threads.remove(&Self::key(resource_id, thread_id)).is_some())
    }
}
