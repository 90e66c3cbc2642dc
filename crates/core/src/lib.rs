//! # Shastho Core
//!
//! Domain types, traits, and error definitions for the Shastho FAQ chat
//! backend. This crate has **zero framework dependencies** — it defines the
//! domain model that all other crates implement against.
//!
//! ## Design Philosophy
//!
//! The completion backend is defined as a trait here; the Groq
//! implementation lives in `shastho-providers`. This enables:
//! - Testing the gateway with scripted mock providers
//! - Swapping the upstream completion API via configuration
//! - A clean dependency graph (all crates depend inward on core)

pub mod error;
pub mod message;
pub mod provider;

// Re-export key types at crate root for ergonomics
pub use error::{Error, ProviderError, Result};
pub use message::{History, Role, Turn};
pub use provider::{CompletionProvider, CompletionRequest, CompletionResponse, Usage};
