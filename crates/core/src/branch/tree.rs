//! Quick-rewrite detection from prompt timing alone.
//!
//! After the first exchange, a prompt sent less than [`EDIT_WINDOW`] after the
//! previous prompt is read as a rewrite and opens a new branch. Later messages
//! follow the most recently opened branch.

use chrono::{DateTime, Utc};
use claude_reader_types::ChatMessage;
use serde::{Deserialize, Serialize};
use tracing::debug;
use ts_rs::TS;

use super::{branch_id, sorted_by_time, Branch, MessageNode, EDIT_WINDOW, MAIN_BRANCH_ID};

/// Nodes grouped under one branch id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "codegen", ts(export, export_to = "../../../src/types/generated/"))]
pub struct TreeBranch {
    pub id: String,
    pub nodes: Vec<MessageNode>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "codegen", ts(export, export_to = "../../../src/types/generated/"))]
#[serde(rename_all = "camelCase")]
pub struct ConversationTree {
    /// First node of every non-empty branch, in [`Self::branches`] order.
    pub root_nodes: Vec<MessageNode>,
    /// Number of side branches opened.
    pub branch_count: usize,
    /// Side branches in the order they were opened, then `main`.
    pub branches: Vec<TreeBranch>,
}

impl ConversationTree {
    pub fn branch(&self, id: &str) -> Option<&TreeBranch> {
        self.branches.iter().find(|b| b.id == id)
    }

    /// The tree as flat branches, main first.
    pub fn into_branches(self) -> Vec<Branch> {
        let mut main = Branch::main(Vec::new());
        let mut sides = Vec::with_capacity(self.branch_count);
        for tree_branch in self.branches {
            let messages = tree_branch.nodes.into_iter().map(|n| n.message).collect();
            if tree_branch.id == MAIN_BRANCH_ID {
                main.messages = messages;
            } else {
                sides.push(Branch::side(sides.len() + 1, messages, None));
            }
        }
        std::iter::once(main).chain(sides).collect()
    }
}

/// Build the timing-based rewrite tree for `messages`.
///
/// A prompt arriving after a rewrite branch has opened, but outside the edit
/// window of the previous prompt, is placed in no branch.
pub fn build_conversation_tree(messages: &[ChatMessage]) -> ConversationTree {
    let sorted = sorted_by_time(messages);
    if sorted.is_empty() {
        return ConversationTree::default();
    }

    let total = sorted.len();
    let mut main: Vec<MessageNode> = Vec::new();
    let mut sides: Vec<TreeBranch> = Vec::new();
    // Index into `sides` of the branch new messages follow; `None` is main.
    let mut current: Option<usize> = None;
    let mut last_human: Option<DateTime<Utc>> = None;
    let mut seen_assistant = false;
    let mut unplaced = 0usize;

    for message in sorted {
        let timestamp = message.created_at;
        let is_human = message.is_human();
        let current_id = match current {
            Some(i) => sides[i].id.clone(),
            None => MAIN_BRANCH_ID.to_string(),
        };
        let mut node = MessageNode::new(message, current_id);

        let follows_exchange = is_human && seen_assistant && last_human.is_some();
        let quick_rewrite = follows_exchange
            && last_human.is_some_and(|previous| timestamp - previous < EDIT_WINDOW);

        if quick_rewrite {
            let id = branch_id(sides.len() + 1);
            node.branch_id = id.clone();
            node.is_edited_message = true;
            current = Some(sides.len());
            sides.push(TreeBranch {
                id,
                nodes: vec![node],
            });
        } else if let Some(i) = current {
            if follows_exchange {
                unplaced += 1;
            } else {
                sides[i].nodes.push(node);
            }
        } else {
            main.push(node);
        }

        if is_human {
            last_human = Some(timestamp);
        } else {
            seen_assistant = true;
        }
    }

    let branch_count = sides.len();
    let mut branches = sides;
    branches.push(TreeBranch {
        id: MAIN_BRANCH_ID.to_string(),
        nodes: main,
    });

    let root_nodes = branches
        .iter()
        .filter_map(|b| b.nodes.first().cloned())
        .collect();

    debug!(
        messages = total,
        branches = branch_count,
        unplaced,
        "Conversation tree built"
    );

    ConversationTree {
        root_nodes,
        branch_count,
        branches,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::branch::test_support::*;
    use pretty_assertions::assert_eq;

    fn node_uuids(nodes: &[MessageNode]) -> Vec<&str> {
        nodes.iter().map(|n| n.message.uuid.as_str()).collect()
    }

    #[test]
    fn test_empty_input() {
        let tree = build_conversation_tree(&[]);
        assert!(tree.root_nodes.is_empty());
        assert_eq!(tree.branch_count, 0);
        assert!(tree.branches.is_empty());
    }

    #[test]
    fn test_slow_conversation_stays_on_main() {
        let msgs = vec![
            human("h1", "q", 0),
            assistant("a1", "a", 30),
            human("h2", "q", 600),
            assistant("a2", "a", 630),
        ];
        let tree = build_conversation_tree(&msgs);
        assert_eq!(tree.branch_count, 0);
        assert_eq!(tree.branches.len(), 1);
        assert_eq!(node_uuids(&tree.branch("main").unwrap().nodes), vec!["h1", "a1", "h2", "a2"]);
        assert_eq!(node_uuids(&tree.root_nodes), vec!["h1"]);
    }

    #[test]
    fn test_quick_reprompt_opens_branch() {
        let msgs = vec![
            human("h1", "q", 0),
            assistant("a1", "a", 10),
            human("h2", "q edited", 60),
            assistant("a2", "a", 70),
        ];
        let tree = build_conversation_tree(&msgs);
        assert_eq!(tree.branch_count, 1);
        let ids: Vec<&str> = tree.branches.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, vec!["branch-1", "main"]);

        let side = tree.branch("branch-1").unwrap();
        assert_eq!(node_uuids(&side.nodes), vec!["h2", "a2"]);
        assert!(side.nodes[0].is_edited_message);
        assert_eq!(side.nodes[1].branch_id, "branch-1");
        assert_eq!(node_uuids(&tree.branch("main").unwrap().nodes), vec!["h1", "a1"]);
        assert_eq!(node_uuids(&tree.root_nodes), vec!["h2", "h1"]);
    }

    #[test]
    fn test_first_human_pair_does_not_branch() {
        // No assistant reply yet, so a quick second prompt is not a rewrite.
        let msgs = vec![human("h1", "q", 0), human("h2", "q", 5)];
        let tree = build_conversation_tree(&msgs);
        assert_eq!(tree.branch_count, 0);
    }

    /// A slow prompt after a branch has opened is placed nowhere.
    #[test]
    fn test_slow_prompt_inside_branch_is_unplaced() {
        let msgs = vec![
            human("h1", "q", 0),
            assistant("a1", "a", 10),
            human("h2", "q edited", 60),
            assistant("a2", "a", 70),
            human("h3", "next question", 2000),
            assistant("a3", "a", 2010),
        ];
        let tree = build_conversation_tree(&msgs);
        let placed: Vec<&str> = tree
            .branches
            .iter()
            .flat_map(|b| node_uuids(&b.nodes))
            .collect();
        assert!(!placed.contains(&"h3"));
        assert_eq!(node_uuids(&tree.branch("branch-1").unwrap().nodes), vec!["h2", "a2", "a3"]);
    }

    #[test]
    fn test_into_branches_main_first() {
        let msgs = vec![
            human("h1", "q", 0),
            assistant("a1", "a", 10),
            human("h2", "q edited", 60),
        ];
        let branches = build_conversation_tree(&msgs).into_branches();
        assert_eq!(branches.len(), 2);
        assert!(branches[0].is_main());
        assert_eq!(uuids(&branches[0].messages), vec!["h1", "a1"]);
        assert_eq!(branches[1].id, "branch-1");
        assert_eq!(branches[1].branch_point, None);
    }
}
