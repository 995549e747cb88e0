//! Generation orchestrator for Persona.
//!
//! `DynamicAgent` is the per-call pipeline: build the role-conditioned
//! instruction, resolve the thread identifier, make one call into the
//! generation service, and hand back `{text, thread_id}`.
//! `MemoryBackedService` is the concrete generation service combining an
//! LLM provider with a conversation store.

pub mod orchestrator;
pub mod service;

pub use orchestrator::{DynamicAgent, GenerationRequest, GenerationResult};
pub use service::{MemoryBackedService, ModelSettings};
