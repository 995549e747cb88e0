//! Provider trait — the abstraction over LLM backends.
//!
//! A Provider knows how to send a conversation to an LLM and get a chat
//! completion back. Implementations: OpenAI-compatible endpoints
//! (OpenAI, OpenRouter, Ollama, vLLM, custom).

use crate::error::ProviderError;
use crate::message::Message;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Configuration for a single completion request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionRequest {
    /// The model to use (e.g., "gpt-4.1-mini")
    pub model: String,

    /// The conversation messages, system instruction first
    pub messages: Vec<Message>,

    /// Temperature (0.0 = deterministic, higher = creative)
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Maximum tokens to generate
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

fn default_temperature() -> f32 {
    0.7
}

/// A completed response from a provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Completion {
    /// The generated assistant text
    pub text: String,

    /// Which model actually responded (may differ from requested)
    pub model: String,

    /// Token usage statistics
    pub usage: Option<Usage>,
}

/// Token usage information.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// The core Provider trait.
///
/// The agent calls `complete()` without knowing which backend is being
/// used — pure polymorphism. Decoding strategy, token accounting, and
/// retry policy are the backend's concern, not the caller's.
#[async_trait]
pub trait Provider: Send + Sync {
    /// A human-readable name for this provider (e.g., "openai", "ollama").
    fn name(&self) -> &str;

    /// Send a request and get a complete response.
    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> std::result::Result<Completion, ProviderError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn completion_request_defaults() {
        let json = r#"{"model": "gpt-4.1-mini", "messages": []}"#;
        let req: CompletionRequest = serde_json::from_str(json).unwrap();
        assert!((req.temperature - 0.7).abs() < f32::EPSILON);
        assert!(req.max_tokens.is_none());
    }

    #[test]
    fn completion_serialization() {
        let completion = Completion {
            text: "Arr, matey!".into(),
            model: "gpt-4.1-mini".into(),
            usage: Some(Usage {
                prompt_tokens: 12,
                completion_tokens: 4,
                total_tokens: 16,
            }),
        };
        let json = serde_json::to_string(&completion).unwrap();
        assert!(json.contains("Arr, matey!"));
        assert!(json.contains("16"));
    }
}
