//! Memory-backed generation service.
//!
//! The concrete collaborator behind the orchestrator: replay the thread's
//! history from the store, put the per-request instruction first, call the
//! provider once, and append the new turn pair only after the completion
//! succeeded. A failed call leaves the store untouched, so the caller never
//! sees a half-recorded conversation.

use async_trait::async_trait;
use persona_core::error::ServiceError;
use persona_core::message::Message;
use persona_core::provider::{CompletionRequest, Provider};
use persona_core::service::{GenerationService, ServiceCall, ServiceReply};
use persona_core::store::ThreadStore;
use std::sync::Arc;
use tracing::debug;

/// Model settings for the service. All explicit — there are no ambient
/// defaults pulled from the environment at call time.
#[derive(Debug, Clone)]
pub struct ModelSettings {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: Option<u32>,
}

/// A generation service combining an LLM provider with a thread store.
pub struct MemoryBackedService {
    provider: Arc<dyn Provider>,
    store: Arc<dyn ThreadStore>,
    settings: ModelSettings,
}

impl MemoryBackedService {
    /// Create a new service. The store and provider are required up front;
    /// construction never falls back to an implicit storage location.
    pub fn new(
        provider: Arc<dyn Provider>,
        store: Arc<dyn ThreadStore>,
        settings: ModelSettings,
    ) -> Self {
        Self {
            provider,
            store,
            settings,
        }
    }
}

#[async_trait]
impl GenerationService for MemoryBackedService {
    async fn generate(&self, call: ServiceCall) -> Result<ServiceReply, ServiceError> {
        let history = self.store.history(&call.resource_id, &call.thread_id).await?;

        debug!(
            thread_id = %call.thread_id,
            prior_turns = history.len(),
            provider = %self.provider.name(),
            "Assembling prompt"
        );

        // Instruction first, then the replayed turns, then the new message.
        let mut messages = Vec::with_capacity(history.len() + 2);
        messages.push(Message::system(&call.instruction));
        messages.extend(history.messages);

        let user_turn = Message::user(&call.message);
        messages.push(user_turn.clone());

        let completion = self
            .provider
            .complete(CompletionRequest {
                model: self.settings.model.clone(),
                messages,
                temperature: self.settings.temperature,
                max_tokens: self.settings.max_tokens,
            })
            .await?;

        // Persist the turn pair only after a successful completion.
        let assistant_turn = Message::assistant(&completion.text);
        self.store
            .append(
                &call.resource_id,
                &call.thread_id,
                vec![user_turn, assistant_turn],
            )
            .await?;

        Ok(ServiceReply {
            text: completion.text,
        })
    }
}
