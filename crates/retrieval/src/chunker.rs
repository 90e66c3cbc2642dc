//! Sentence-boundary text chunker.
//!
//! Splits document text into chunks that respect a configurable estimated
//! token limit. Splitting occurs on sentence boundaries — the Bengali danda
//! (`।`), a newline, or a period followed by whitespace — so no sentence is
//! ever divided across two chunks.
//!
//! Token counts are estimated as `chars / 3`, a heuristic that works
//! reasonably for Bengali script as well as Latin text.
//!
//! The size bound holds for the running sum of per-unit estimates, not
//! for the joined chunk string: the single-space joins and the remainder
//! each integer division drops mean `chars(chunk) / 3` can come out one
//! or two tokens above `max_chunk_size`. Callers sizing prompt budgets
//! should treat the limit as approximate to within that margin.

/// Approximate chars-per-token ratio for mixed Bengali/Latin text.
const CHARS_PER_TOKEN: usize = 3;

/// Split text into sentence-aligned chunks, respecting `max_chunk_size`
/// (estimated tokens). Returns chunks in document order.
///
/// A single sentence whose own estimate exceeds the limit becomes a
/// standalone oversized chunk; it is never split further. Empty input
/// yields an empty Vec.
pub fn chunk_text(text: &str, max_chunk_size: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    let mut current_len = 0usize;

    for unit in split_units(text) {
        let unit = unit.trim();
        if unit.is_empty() {
            continue;
        }

        let unit_len = unit.chars().count() / CHARS_PER_TOKEN;

        if current_len + unit_len > max_chunk_size && !current.is_empty() {
            chunks.push(current.join(" "));
            current.clear();
            current_len = 0;
        }

        current.push(unit);
        current_len += unit_len;
    }

    if !current.is_empty() {
        chunks.push(current.join(" "));
    }

    chunks
}

/// Split `text` into sentence-like units, keeping boundary markers as their
/// own tokens. Markers: `।`, `\n`, or `.` plus the single whitespace
/// character that follows it.
fn split_units(text: &str) -> Vec<&str> {
    let mut units = Vec::new();
    let mut start = 0;
    let mut iter = text.char_indices().peekable();

    while let Some((i, c)) = iter.next() {
        let marker_len = match c {
            '।' | '\n' => Some(c.len_utf8()),
            '.' => match iter.peek() {
                Some(&(_, next)) if next.is_whitespace() => Some(c.len_utf8() + next.len_utf8()),
                _ => None,
            },
            _ => None,
        };

        if let Some(len) = marker_len {
            if i > start {
                units.push(&text[start..i]);
            }
            units.push(&text[i..i + len]);
            start = i + len;
            if len > c.len_utf8() {
                // consume the whitespace that belongs to the marker
                iter.next();
            }
        }
    }

    if start < text.len() {
        units.push(&text[start..]);
    }

    units
}
