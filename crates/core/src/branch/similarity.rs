//! Word-set similarity between messages.

use std::collections::HashSet;

use claude_reader_types::{ChatMessage, ContentType};

/// Two messages scoring strictly above this are treated as edits of each other.
pub const SIMILARITY_THRESHOLD: f64 = 0.7;

/// Jaccard index of the lowercase whitespace-separated word sets of `a` and `b`.
///
/// Two blank strings are identical (1.0); a blank string against a non-blank
/// one shares nothing (0.0).
pub fn similarity(a: &str, b: &str) -> f64 {
    let a = a.to_lowercase();
    let b = b.to_lowercase();
    let words_a: HashSet<&str> = a.split_whitespace().collect();
    let words_b: HashSet<&str> = b.split_whitespace().collect();

    match (words_a.is_empty(), words_b.is_empty()) {
        (true, true) => return 1.0,
        (true, false) | (false, true) => return 0.0,
        _ => {}
    }

    let intersection = words_a.intersection(&words_b).count();
    let union = words_a.union(&words_b).count();
    intersection as f64 / union as f64
}

/// The text a message is compared by.
///
/// Prefers the first non-empty `text` content block, then the message's own
/// `text` field.
pub fn message_text(message: &ChatMessage) -> &str {
    message
        .content
        .iter()
        .filter(|block| block.kind == ContentType::Text)
        .filter_map(|block| block.text.as_deref())
        .find(|text| !text.is_empty())
        .unwrap_or(message.text.as_str())
}

/// Whether `a` and `b` are the same message or edited versions of each other.
pub fn messages_are_similar(a: &ChatMessage, b: &ChatMessage) -> bool {
    if a.uuid == b.uuid {
        return true;
    }
    similarity(message_text(a), message_text(b)) > SIMILARITY_THRESHOLD
}
