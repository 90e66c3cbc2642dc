//! System prompt assembly.
//!
//! Pure function of (query, chunk list): selects the most relevant chunks
//! and interpolates them into a fixed instructional template.

use crate::index::KnowledgeIndex;
use crate::selector::select_relevant;

/// Build the system prompt for `query` from the `top_k` most relevant
/// chunks of the index.
pub fn build_system_prompt(query: &str, index: &KnowledgeIndex, top_k: usize) -> String {
    let relevant_content = select_relevant(query, index.chunks(), top_k);

    format!(
        "You are a helpful assistant specialized in answering questions about Bengali family health.\n\
         Answer based on these relevant FAQ sections:\n\
         \n\
         {relevant_content}\n\
         \n\
         Guidelines:\n\
         1. Answer based solely on the provided FAQ content\n\
         2. If the information isn't in the provided sections, say so\n\
         3. Respond in the same language as the user's question (Bengali or English)\n\
         4. Keep responses clear and concise\n\
         5. Stay focused on the specific question asked\n\
         6. Maintain conversation context and refer back to previous messages when relevant"
    )
}
