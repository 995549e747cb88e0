//! The per-request generation pipeline.
//!
//! Stateless: no field changes between calls, no cross-call locks. The
//! agent's persona is recomputed from the request's role label on every
//! call, and the resolved thread identifier is bound to both identity
//! roles the conversation store expects before the single awaited call
//! into the generation service.

use persona_core::message::ThreadId;
use persona_core::service::{GenerationService, ServiceCall};
use persona_core::{Error, instruction, session};
use std::sync::Arc;
use tracing::{debug, info};

/// One inbound generation request.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    /// The caller's message (required, non-empty)
    pub message: String,

    /// The persona label for this request
    pub role: String,

    /// Optional thread to continue; absent means a fresh conversation
    pub thread_id: Option<String>,
}

/// The response envelope returned to the caller.
#[derive(Debug, Clone)]
pub struct GenerationResult {
    /// The generated response text
    pub text: String,

    /// The resolved thread identifier, echoed back so the caller can
    /// continue the conversation
    pub thread_id: ThreadId,
}

/// The generation orchestrator.
pub struct DynamicAgent {
    service: Arc<dyn GenerationService>,
}

impl DynamicAgent {
    /// Create an agent over a generation service.
    pub fn new(service: Arc<dyn GenerationService>) -> Self {
        Self { service }
    }

    /// Process one request: validate, build the instruction, resolve the
    /// thread, call the service once, and return the envelope.
    ///
    /// No retries and no partial caller-visible mutation: a failed service
    /// call propagates as-is and produces no response text.
    pub async fn generate(&self, request: GenerationRequest) -> Result<GenerationResult, Error> {
        if request.message.trim().is_empty() {
            return Err(Error::InvalidInput("message must not be empty".into()));
        }

        let instruction = instruction::build(&request.role);
        let thread_id = session::resolve(request.thread_id.as_deref());

        info!(
            thread_id = %thread_id,
            role = %request.role,
            message_len = request.message.len(),
            "Generating response"
        );

        let reply = self
            .service
            .generate(ServiceCall {
                message: request.message,
                instruction,
                resource_id: thread_id.clone(),
                thread_id: thread_id.clone(),
            })
            .await?;

        debug!(thread_id = %thread_id, text_len = reply.text.len(), "Generation complete");

        Ok(GenerationResult {
            text: reply.text,
            thread_id,
        })
    }
}
