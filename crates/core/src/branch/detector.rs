//! One interface over the branch detection strategies.

use std::fmt;
use std::str::FromStr;

use claude_reader_types::ChatMessage;
use serde::{Deserialize, Serialize};

use super::{
    build_conversation_tree, detect_edit_branches_with, extract_branches, Branch, GrowthPolicy,
};

/// Something that can split a conversation into a main branch and side branches.
///
/// Implementations return the main branch first. They must be deterministic
/// and must not retain state between calls.
pub trait BranchDetector {
    fn detect(&self, messages: &[ChatMessage]) -> Vec<Branch>;
}

/// Re-asked prompts found by word similarity.
#[derive(Debug, Clone, Copy, Default)]
pub struct EditBranchDetector {
    pub policy: GrowthPolicy,
}

impl BranchDetector for EditBranchDetector {
    fn detect(&self, messages: &[ChatMessage]) -> Vec<Branch> {
        detect_edit_branches_with(messages, self.policy)
    }
}

/// Segments split by long silences and repeated speakers.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogicalBranchDetector;

impl BranchDetector for LogicalBranchDetector {
    fn detect(&self, messages: &[ChatMessage]) -> Vec<Branch> {
        let extracted = extract_branches(messages);
        let sides = extracted
            .branches
            .into_iter()
            .enumerate()
            .map(|(i, b)| Branch::side(i + 1, b.messages, None));
        std::iter::once(Branch::main(extracted.main_conversation))
            .chain(sides)
            .collect()
    }
}

/// Quick re-prompts found by timing alone.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimingTreeDetector;

impl BranchDetector for TimingTreeDetector {
    fn detect(&self, messages: &[ChatMessage]) -> Vec<Branch> {
        build_conversation_tree(messages).into_branches()
    }
}

/// Selectable detection strategy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetectionStrategy {
    #[default]
    Edit,
    Logical,
    Tree,
}

impl DetectionStrategy {
    pub const ALL: [DetectionStrategy; 3] = [
        DetectionStrategy::Edit,
        DetectionStrategy::Logical,
        DetectionStrategy::Tree,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            DetectionStrategy::Edit => "edit",
            DetectionStrategy::Logical => "logical",
            DetectionStrategy::Tree => "tree",
        }
    }

    pub fn detector(self) -> Box<dyn BranchDetector> {
        match self {
            DetectionStrategy::Edit => Box::new(EditBranchDetector::default()),
            DetectionStrategy::Logical => Box::new(LogicalBranchDetector),
            DetectionStrategy::Tree => Box::new(TimingTreeDetector),
        }
    }
}

impl fmt::Display for DetectionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DetectionStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|strategy| strategy.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown detection strategy '{s}' (expected edit, logical, or tree)"))
    }
}
