//! The process-wide chunk list.
//!
//! Built once at startup from the reference document and shared read-only
//! (behind an `Arc`) with every request handler. A missing document file is
//! recoverable: the server runs with an empty index and every query gets no
//! relevant context.

use std::path::Path;

use shastho_core::Error;
use tracing::{info, warn};

use crate::chunker::chunk_text;

/// The immutable, ordered chunk list for the reference document.
#[derive(Debug, Clone, Default)]
pub struct KnowledgeIndex {
    chunks: Vec<String>,
}

impl KnowledgeIndex {
    /// An empty index (degraded mode — no document available).
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build an index from pre-chunked text (tests, fixtures).
    pub fn from_chunks(chunks: Vec<String>) -> Self {
        Self { chunks }
    }

    /// Build an index by chunking `text`.
    pub fn from_text(text: &str, max_chunk_size: usize) -> Self {
        let chunks = chunk_text(text, max_chunk_size);
        info!(chunks = chunks.len(), max_chunk_size, "Knowledge index built");
        Self { chunks }
    }

    /// Read the document at `path` and build an index from it.
    pub fn load(path: &Path, max_chunk_size: usize) -> Result<Self, Error> {
        let text = std::fs::read_to_string(path).map_err(|e| Error::Document {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self::from_text(&text, max_chunk_size))
    }

    /// Like [`KnowledgeIndex::load`], but a missing or unreadable document
    /// degrades to an empty index with a warning instead of failing.
    pub fn load_or_empty(path: &Path, max_chunk_size: usize) -> Self {
        match Self::load(path, max_chunk_size) {
            Ok(index) => index,
            Err(e) => {
                warn!(error = %e, "Document not available; serving with empty index");
                Self::empty()
            }
        }
    }

    /// The chunk list, in document order.
    pub fn chunks(&self) -> &[String] {
        &self.chunks
    }

    /// Number of chunks.
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    /// Whether the index holds no chunks.
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }
}
