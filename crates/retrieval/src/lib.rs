//! Retrieval subsystem for Shastho.
//!
//! The reference document is split once at startup into bounded-size,
//! sentence-aligned chunks ([`chunker`]); per request, chunks are scored by
//! lexical word overlap against the query ([`selector`]) and the top-K are
//! embedded into the system prompt ([`prompt`]).
//!
//! The [`KnowledgeIndex`] holds the immutable chunk list and is shared
//! read-only across request handlers — no locking needed after startup.

pub mod chunker;
pub mod index;
pub mod prompt;
pub mod selector;

pub use chunker::chunk_text;
pub use index::KnowledgeIndex;
pub use prompt::build_system_prompt;
pub use selector::select_relevant;
