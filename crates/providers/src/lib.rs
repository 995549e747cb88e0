//! LLM provider implementations for Persona.
//!
//! All providers implement the `persona_core::Provider` trait.

pub mod openai_compat;

pub use openai_compat::OpenAiCompatProvider;
