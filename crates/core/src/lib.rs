//! # Persona Core
//!
//! Domain types, traits, and error definitions for the Persona
//! role-conditioned agent service. This crate has **zero framework
//! dependencies** — it defines the domain model that all other crates
//! implement against.
//!
//! ## Design Philosophy
//!
//! Every collaborator is defined as a trait here. Implementations live in
//! their respective crates. This enables:
//! - Swapping implementations via configuration
//! - Easy testing with mock/stub implementations
//! - Clean dependency graph (all crates depend inward on core)

pub mod error;
pub mod instruction;
pub mod message;
pub mod provider;
pub mod service;
pub mod session;
pub mod store;

// Re-export key types at crate root for ergonomics
pub use error::{Error, ProviderError, Result, ServiceError, StoreError};
pub use message::{ChatRole, Message, ThreadId, Transcript};
pub use provider::{Completion, CompletionRequest, Provider, Usage};
pub use service::{GenerationService, ServiceCall, ServiceReply};
pub use store::ThreadStore;
