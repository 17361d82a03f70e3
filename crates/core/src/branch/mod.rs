//! Branch reconstruction for flat conversation exports.
//!
//! Exports carry no parent/child links between messages, so edited prompts and
//! retried replies all land in one time-ordered list. The detectors here
//! rebuild a main thread plus side branches from timestamps, sender roles, and
//! word-set similarity alone. Every detector is a pure function of its input:
//! it copies and sorts the messages, never mutates them, and keeps no state
//! between calls.

pub mod detector;
pub mod edit;
pub mod extract;
pub mod logical;
pub mod similarity;
pub mod tree;
pub mod turns;

pub use detector::*;
pub use edit::*;
pub use extract::*;
pub use logical::*;
pub use similarity::*;
pub use tree::*;
pub use turns::*;

use claude_reader_types::ChatMessage;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Id of the primary thread in every detector's output.
pub const MAIN_BRANCH_ID: &str = "main";

/// Display name of the primary thread.
pub const MAIN_BRANCH_NAME: &str = "Main Conversation";

/// Generated id for the `n`-th side branch of a detection run.
pub fn branch_id(n: usize) -> String {
    format!("branch-{n}")
}

/// A named thread of messages reconstructed from a conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "codegen", ts(export, export_to = "../../../src/types/generated/"))]
#[serde(rename_all = "camelCase")]
pub struct Branch {
    pub id: String,
    pub name: String,
    pub messages: Vec<ChatMessage>,
    /// `None` for the main branch.
    pub parent_branch_id: Option<String>,
    /// Index into the parent's human-message sequence where this branch
    /// diverges, when the detector can tell.
    pub branch_point: Option<usize>,
}

impl Branch {
    pub fn main(messages: Vec<ChatMessage>) -> Self {
        Self {
            id: MAIN_BRANCH_ID.to_string(),
            name: MAIN_BRANCH_NAME.to_string(),
            messages,
            parent_branch_id: None,
            branch_point: None,
        }
    }

    /// The `n`-th side branch forked from main.
    pub fn side(n: usize, messages: Vec<ChatMessage>, branch_point: Option<usize>) -> Self {
        Self {
            id: branch_id(n),
            name: format!("Branch {n}"),
            messages,
            parent_branch_id: Some(MAIN_BRANCH_ID.to_string()),
            branch_point,
        }
    }

    pub fn is_main(&self) -> bool {
        self.id == MAIN_BRANCH_ID
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

/// A message annotated by a single-pass detector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "codegen", ts(export, export_to = "../../../src/types/generated/"))]
#[serde(rename_all = "camelCase")]
pub struct MessageNode {
    pub message: ChatMessage,
    /// Set when the message looks like a quick rewrite of the one before it.
    pub is_edited_message: bool,
    pub branch_id: String,
}

impl MessageNode {
    pub fn new(message: ChatMessage, branch_id: impl Into<String>) -> Self {
        Self {
            message,
            is_edited_message: false,
            branch_id: branch_id.into(),
        }
    }
}

/// Copy `messages` and stable-sort the copy by creation time.
///
/// Messages sharing a timestamp keep their input order.
pub(crate) fn sorted_by_time(messages: &[ChatMessage]) -> Vec<ChatMessage> {
    let mut sorted = messages.to_vec();
    sorted.sort_by_key(|m| m.created_at);
    sorted
}

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::{DateTime, TimeZone, Utc};
    use claude_reader_types::ChatMessage;

    pub fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
    }

    pub fn human(uuid: &str, text: &str, secs: i64) -> ChatMessage {
        ChatMessage::human(uuid, text, at(secs))
    }

    pub fn assistant(uuid: &str, text: &str, secs: i64) -> ChatMessage {
        ChatMessage::assistant(uuid, text, at(secs))
    }

    pub fn uuids(messages: &[ChatMessage]) -> Vec<&str> {
        messages.iter().map(|m| m.uuid.as_str()).collect()
    }
}
