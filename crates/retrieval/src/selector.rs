//! Lexical-overlap relevance selector.
//!
//! Scores each chunk by the number of distinct lowercase words it shares
//! with the query, then returns the top-K chunks joined by a blank line.
//! Ties are broken by original chunk order (stable sort), so selection is
//! deterministic for a fixed chunk list.

use std::collections::HashSet;

/// Count of distinct words shared between `query_words` and `chunk`,
/// case-insensitive. Duplicate words within the chunk do not raise the
/// score.
fn overlap_score(query_words: &HashSet<String>, chunk: &str) -> usize {
    let chunk_words: HashSet<String> = chunk
        .to_lowercase()
        .split_whitespace()
        .map(str::to_string)
        .collect();

    query_words.intersection(&chunk_words).count()
}

/// Select the `top_k` most relevant chunks for `query` and join their text
/// with a blank-line separator.
///
/// An empty query scores every chunk 0, so the first `top_k` chunks in
/// document order are returned. Fewer than `top_k` chunks means all of
/// them are returned. An empty chunk list yields an empty string.
pub fn select_relevant(query: &str, chunks: &[String], top_k: usize) -> String {
    let query_words: HashSet<String> = query
        .to_lowercase()
        .split_whitespace()
        .map(str::to_string)
        .collect();

    let mut scored: Vec<(usize, &str)> = chunks
        .iter()
        .map(|chunk| (overlap_score(&query_words, chunk), chunk.as_str()))
        .collect();

    // Stable sort: equal scores keep document order.
    scored.sort_by(|a, b| b.0.cmp(&a.0));

    scored
        .iter()
        .take(top_k)
        .map(|(_, chunk)| *chunk)
        .collect::<Vec<_>>()
        .join("\n\n")
}
