//! GenerationService trait — the single opaque operation the orchestrator
//! calls.
//!
//! From the orchestrator's point of view the language model and the
//! conversation store are one collaborator: it hands over the message, the
//! role-conditioned instruction, and the resolved identifier bound to both
//! identity roles, and gets text back or a failure. Retrieval, ranking,
//! and decoding are the collaborator's concern.

use crate::error::ServiceError;
use crate::message::ThreadId;
use async_trait::async_trait;

/// One call into the generation service.
#[derive(Debug, Clone)]
pub struct ServiceCall {
    /// The caller's message text
    pub message: String,

    /// The system instruction, computed per request from the role
    pub instruction: String,

    /// The long-lived entity the conversation belongs to
    pub resource_id: ThreadId,

    /// The specific conversation stream
    pub thread_id: ThreadId,
}

/// The service's reply.
#[derive(Debug, Clone)]
pub struct ServiceReply {
    /// The generated response text
    pub text: String,
}

/// The core GenerationService trait.
///
/// Implementations combine a [`crate::Provider`] with a
/// [`crate::ThreadStore`]; tests substitute a mock.
#[async_trait]
pub trait GenerationService: Send + Sync {
    async fn generate(
        &self,
        call: ServiceCall,
    ) -> std::result::Result<ServiceReply, ServiceError>;
}
