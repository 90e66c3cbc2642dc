//! Completion API client implementations for Shastho.
//!
//! All providers implement the `shastho_core::CompletionProvider` trait.

pub mod groq;

pub use groq::GroqProvider;
