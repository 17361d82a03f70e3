// crates/core/src/browse.rs
//! Search, ordering, and pagination for the conversation list.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use claude_reader_types::Conversation;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Conversations shown per page unless the caller asks otherwise.
pub const DEFAULT_PAGE_SIZE: usize = 20;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "codegen", ts(export, export_to = "../../../src/types/generated/"))]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Most recently updated first.
    #[default]
    Newest,
    Oldest,
    /// Alphabetical by display name.
    Name,
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SortOrder::Newest => "newest",
            SortOrder::Oldest => "oldest",
            SortOrder::Name => "name",
        })
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "newest" => Ok(SortOrder::Newest),
            "oldest" => Ok(SortOrder::Oldest),
            "name" => Ok(SortOrder::Name),
            other => Err(format!("unknown sort order '{other}' (expected newest, oldest, or name)")),
        }
    }
}

/// One page of a larger list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "codegen", ts(export, export_to = "../../../src/types/generated/"))]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 1-based page number actually returned.
    pub page: usize,
    pub per_page: usize,
    pub total: usize,
    pub total_pages: usize,
    pub has_more: bool,
}

/// Whether `conversation` mentions `needle` (already lowercased) in its name,
/// a message's text, or a content block's text.
fn mentions(conversation: &Conversation, needle: &str) -> bool {
    if conversation.name.to_lowercase().contains(needle) {
        return true;
    }
    conversation.chat_messages.iter().any(|msg| {
        msg.text.to_lowercase().contains(needle)
            || msg
                .content
                .iter()
                .filter_map(|block| block.text.as_deref())
                .any(|text| text.to_lowercase().contains(needle))
    })
}

/// Conversations matching `term`, case-insensitively, in their original order.
///
/// A blank term matches everything. Any other term is matched as typed,
/// surrounding whitespace included.
pub fn filter_conversations<'a>(conversations: &'a [Conversation], term: &str) -> Vec<&'a Conversation> {
    if term.trim().is_empty() {
        return conversations.iter().collect();
    }
    let needle = term.to_lowercase();
    conversations
        .iter()
        .filter(|c| mentions(c, &needle))
        .collect()
}

fn compare_names(a: &Conversation, b: &Conversation) -> Ordering {
    let (a, b) = (a.display_name(), b.display_name());
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Stable sort of `conversations` by `order`.
pub fn sort_conversations(conversations: &mut [&Conversation], order: SortOrder) {
    match order {
        SortOrder::Newest => conversations.sort_by(|a, b| b.updated_at.cmp(&a.updated_at)),
        SortOrder::Oldest => conversations.sort_by_key(|c| c.updated_at),
        SortOrder::Name => conversations.sort_by(|a, b| compare_names(a, b)),
    }
}

/// Slice `items` into the 1-based `page` of size `per_page`.
///
/// Page 0 is treated as page 1 and a zero page size as
/// [`DEFAULT_PAGE_SIZE`]. Pages past the end come back empty.
pub fn paginate<T: Clone>(items: &[T], page: usize, per_page: usize) -> Page<T> {
    let per_page = if per_page == 0 { DEFAULT_PAGE_SIZE } else { per_page };
    let page = page.max(1);
    let total = items.len();
    let total_pages = total.div_ceil(per_page);
    let start = (page - 1).saturating_mul(per_page).min(total);
    let end = start.saturating_add(per_page).min(total);

    Page {
        items: items[start..end].to_vec(),
        page,
        per_page,
        total,
        total_pages,
        has_more: end < total,
    }
}

pub fn find_conversation<'a>(conversations: &'a [Conversation], uuid: &str) -> Option<&'a Conversation> {
    conversations.iter().find(|c| c.uuid == uuid)
}
