//! Display-ready view of logical segments.

use claude_reader_types::ChatMessage;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::{branch_id, segment_logical_branches, MAIN_BRANCH_ID};

/// A side branch as shown by the branch view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "codegen", ts(export, export_to = "../../../src/types/generated/"))]
pub struct ExtractedBranch {
    pub id: String,
    pub messages: Vec<ChatMessage>,
}

/// Main conversation plus side branches, as consumed by the branch view.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "codegen", ts(export, export_to = "../../../src/types/generated/"))]
#[serde(rename_all = "camelCase")]
pub struct ExtractedBranches {
    pub main_conversation: Vec<ChatMessage>,
    pub branches: Vec<ExtractedBranch>,
}

impl ExtractedBranches {
    /// Messages of the branch with `id`; `"main"` selects the main conversation.
    pub fn messages_for(&self, id: &str) -> Option<&[ChatMessage]> {
        if id == MAIN_BRANCH_ID {
            return Some(&self.main_conversation);
        }
        self.branches
            .iter()
            .find(|b| b.id == id)
            .map(|b| b.messages.as_slice())
    }

    pub fn has_branches(&self) -> bool {
        !self.branches.is_empty()
    }
}

/// Segment `messages` and present the first segment as the main conversation
/// and the rest as `branch-1`, `branch-2`, ….
pub fn extract_branches(messages: &[ChatMessage]) -> ExtractedBranches {
    let mut segments = segment_logical_branches(messages).into_iter();

    let main_conversation = segments
        .next()
        .map(|nodes| nodes.into_iter().map(|n| n.message).collect())
        .unwrap_or_default();

    let branches = segments
        .enumerate()
        .map(|(i, nodes)| ExtractedBranch {
            id: branch_id(i + 1),
            messages: nodes.into_iter().map(|n| n.message).collect(),
        })
        .collect();

    ExtractedBranches {
        main_conversation,
        branches,
    }
}

/// Human-readable label for a branch, based on when it started.
pub fn branch_display_name(messages: &[ChatMessage]) -> String {
    match messages.first() {
        None => "Empty Branch".to_string(),
        Some(first) => format!(
            "Conversation from {} at {}",
            first.created_at.format("%-m/%-d/%Y"),
            first.created_at.format("%-I:%M:%S %p")
        ),
    }
}
