// crates/core/src/format.rs
//! Small text helpers shared by list and detail output.

use chrono::{DateTime, Utc};

/// Preview length used by the conversation list.
pub const DEFAULT_PREVIEW_LEN: usize = 100;

/// Cut `text` to at most `max_len` characters, ending in `ellipsis` when cut.
///
/// Lengths count chars, not bytes, so multi-byte text never splits mid-character.
pub fn truncate_text(text: &str, max_len: usize, ellipsis: &str) -> String {
    if text.chars().count() <= max_len {
        return text.to_string();
    }
    let keep = max_len.saturating_sub(ellipsis.chars().count());
    let mut out: String = text.chars().take(keep).collect();
    out.push_str(ellipsis);
    out
}

/// Long-form date such as `March 5, 2024`.
pub fn format_date(date: &DateTime<Utc>) -> String {
    date.format("%B %-d, %Y").to_string()
}

/// Collapse runs of whitespace (including newlines) to single spaces.
pub fn single_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
