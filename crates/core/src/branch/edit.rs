//! Edit-branch detection: find prompts that were edited and re-asked.
//!
//! A prompt is an edit when its words overlap an earlier prompt's by more than
//! [`SIMILARITY_THRESHOLD`](super::SIMILARITY_THRESHOLD). The first prompt of
//! each family stays on the main branch; re-asks are split off into side
//! branches anchored at the main-branch prompt they rewrite.
//!
//! Finding the main branch compares every turn against every earlier turn, so
//! detection is quadratic in the number of turns.

use std::collections::HashSet;

use claude_reader_types::ChatMessage;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::similarity::messages_are_similar;
use super::turns::{pair_turns, Turn};
use super::{sorted_by_time, Branch};

/// Which later turns a freshly opened edit branch pulls in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrowthPolicy {
    /// Every later turn not already on a branch joins the new branch, whether
    /// or not it resembles the seed prompt. With this policy at most one side
    /// branch is ever produced and no edited turn is dropped.
    #[default]
    AbsorbUnclaimed,
    /// Only later unclaimed turns whose prompt resembles the seed prompt join.
    /// Produces one branch per edit family; a re-ask that matches neither its
    /// seed nor any main-branch prompt is dropped.
    SimilarToSeed,
}

impl GrowthPolicy {
    fn absorbs(self, seed: &Turn<'_>, candidate: &Turn<'_>) -> bool {
        match self {
            GrowthPolicy::AbsorbUnclaimed => true,
            GrowthPolicy::SimilarToSeed => messages_are_similar(seed.human, candidate.human),
        }
    }
}

/// Split `messages` into a main branch plus edit branches, using the default
/// [`GrowthPolicy`].
pub fn detect_edit_branches(messages: &[ChatMessage]) -> Vec<Branch> {
    detect_edit_branches_with(messages, GrowthPolicy::default())
}

/// Split `messages` into a main branch plus edit branches.
///
/// The first element is always the main branch. Side branches are numbered
/// `branch-1`, `branch-2`, … in the order their seed turn appears. Assistant
/// messages outside any turn (see [`pair_turns`]) appear in no branch.
pub fn detect_edit_branches_with(messages: &[ChatMessage], policy: GrowthPolicy) -> Vec<Branch> {
    let sorted = sorted_by_time(messages);
    if sorted.len() <= 1 {
        return vec![Branch::main(sorted)];
    }

    let turns = pair_turns(&sorted);
    let mut claimed: HashSet<&str> = HashSet::new();

    // A prompt that resembles any earlier prompt, kept or not, is an edit.
    let mut main_turns: Vec<&Turn<'_>> = Vec::new();
    for (i, turn) in turns.iter().enumerate() {
        let is_edit = turns[..i]
            .iter()
            .any(|earlier| messages_are_similar(turn.human, earlier.human));
        if !is_edit {
            main_turns.push(turn);
            claimed.insert(turn.human.uuid.as_str());
        }
    }

    let mut branches = vec![Branch::main(turn_messages(main_turns.iter().copied()))];
    let mut dropped = 0usize;

    for (i, seed) in turns.iter().enumerate() {
        if claimed.contains(seed.human.uuid.as_str()) {
            continue;
        }

        // First match in main-branch order wins.
        let Some(branch_point) = main_turns
            .iter()
            .position(|main| messages_are_similar(seed.human, main.human))
        else {
            debug!(
                uuid = %seed.human.uuid,
                "Edited prompt matches no main-branch prompt, leaving turn unassigned"
            );
            dropped += 1;
            continue;
        };

        claimed.insert(seed.human.uuid.as_str());
        let mut branch_turns = vec![seed];
        for later in &turns[i + 1..] {
            if !claimed.contains(later.human.uuid.as_str()) && policy.absorbs(seed, later) {
                claimed.insert(later.human.uuid.as_str());
                branch_turns.push(later);
            }
        }

        let n = branches.len();
        branches.push(Branch::side(n, turn_messages(branch_turns), Some(branch_point)));
    }

    debug!(
        messages = sorted.len(),
        turns = turns.len(),
        branches = branches.len(),
        dropped_turns = dropped,
        ?policy,
        "Edit branch detection complete"
    );

    branches
}

fn turn_messages<'t, 'a: 't>(turns: impl IntoIterator<Item = &'t Turn<'a>>) -> Vec<ChatMessage> {
    turns
        .into_iter()
        .flat_map(|turn| turn.messages())
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::branch::test_support::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_input_yields_empty_main() {
        let branches = detect_edit_branches(&[]);
        assert_eq!(branches.len(), 1);
        assert!(branches[0].is_main());
        assert!(branches[0].is_empty());
    }

    #[test]
    fn test_single_message_is_main() {
        // Even a lone assistant message is kept by the base case.
        let branches = detect_edit_branches(&[assistant("a1", "hello", 0)]);
        assert_eq!(branches.len(), 1);
        assert_eq!(uuids(&branches[0].messages), vec!["a1"]);
    }

    #[test]
    fn test_edited_prompt_forms_branch() {
        let msgs = vec![
            human("h1", "fix the bug", 0),
            assistant("a1", "done", 10),
            human("h2", "fix the bug now", 20),
        ];
        let branches = detect_edit_branches(&msgs);

        assert_eq!(branches.len(), 2);
        assert_eq!(uuids(&branches[0].messages), vec!["h1", "a1"]);
        assert_eq!(branches[1].id, "branch-1");
        assert_eq!(branches[1].parent_branch_id.as_deref(), Some("main"));
        assert_eq!(branches[1].branch_point, Some(0));
        assert_eq!(uuids(&branches[1].messages), vec!["h2"]);
    }

    #[test]
    fn test_linear_conversation_has_no_branches() {
        let msgs = vec![
            human("h1", "how do lifetimes work", 0),
            assistant("a1", "they track borrows", 5),
            human("h2", "show me an example with structs", 10),
            assistant("a2", "struct Foo<'a>", 15),
        ];
        let branches = detect_edit_branches(&msgs);
        assert_eq!(branches.len(), 1);
        assert_eq!(uuids(&branches[0].messages), vec!["h1", "a1", "h2", "a2"]);
    }

    #[test]
    fn test_input_order_does_not_matter() {
        let msgs = vec![
            human("h2", "fix the bug now", 20),
            assistant("a1", "done", 10),
            human("h1", "fix the bug", 0),
        ];
        let branches = detect_edit_branches(&msgs);
        assert_eq!(uuids(&branches[0].messages), vec!["h1", "a1"]);
        assert_eq!(uuids(&branches[1].messages), vec!["h2"]);
    }

    fn two_families() -> Vec<ChatMessage> {
        vec![
            human("h1", "fix the bug", 0),
            assistant("a1", "ok", 1),
            human("h2", "write docs for the parser", 2),
            assistant("a2", "ok", 3),
            human("h3", "fix the bug now", 4),
            assistant("a3", "ok", 5),
            human("h4", "write docs for the parser please", 6),
            assistant("a4", "ok", 7),
        ]
    }

    #[test]
    fn test_default_policy_absorbs_all_later_edits() {
        let branches = detect_edit_branches(&two_families());
        assert_eq!(branches.len(), 2);
        assert_eq!(uuids(&branches[0].messages), vec!["h1", "a1", "h2", "a2"]);
        // h4 rewrites h2, but the first branch swallows it anyway.
        assert_eq!(uuids(&branches[1].messages), vec!["h3", "a3", "h4", "a4"]);
        assert_eq!(branches[1].branch_point, Some(0));
    }

    #[test]
    fn test_similar_to_seed_policy_splits_families() {
        let branches = detect_edit_branches_with(&two_families(), GrowthPolicy::SimilarToSeed);
        assert_eq!(branches.len(), 3);
        assert_eq!(uuids(&branches[1].messages), vec!["h3", "a3"]);
        assert_eq!(branches[1].branch_point, Some(0));
        assert_eq!(branches[2].id, "branch-2");
        assert_eq!(uuids(&branches[2].messages), vec!["h4", "a4"]);
        assert_eq!(branches[2].branch_point, Some(1));
    }

    #[test]
    fn test_branch_point_uses_first_main_match() {
        // h3 resembles both main prompts; the earlier one wins.
        let msgs = vec![
            human("h1", "explain rust traits and generics", 0),
            assistant("a1", "ok", 1),
            human("h2", "explain rust traits and lifetimes", 2),
            assistant("a2", "ok", 3),
            human("h3", "explain rust traits and generics lifetimes", 4),
        ];
        let branches = detect_edit_branches(&msgs);
        assert_eq!(uuids(&branches[0].messages), vec!["h1", "a1", "h2", "a2"]);
        assert_eq!(branches[1].branch_point, Some(0));
    }

    /// Prompt chain where each re-ask resembles only its predecessor:
    /// h2 ~ h1, h3 ~ h2, h4 ~ h3, and nothing else.
    fn drifting_chain() -> Vec<ChatMessage> {
        vec![
            human("h1", "w0 w1 w2 w3 w4 w5 w6 w7 w8 w9", 0),
            assistant("a1", "ok", 1),
            human("h2", "w0 w1 w2 w3 w4 w5 w6 w7 w8 w9 a0 a1 a2", 2),
            assistant("a2", "ok", 3),
            human("h3", "w3 w4 w5 w6 w7 w8 w9 a0 a1 a2 b0", 4),
            assistant("a3", "ok", 5),
            human("h4", "w4 w5 w6 w7 w8 w9 a0 a1 a2 b0 b1", 6),
            assistant("a4", "ok", 7),
        ]
    }

    #[test]
    fn test_default_policy_never_drops_edited_turns() {
        let branches = detect_edit_branches(&drifting_chain());
        assert_eq!(branches.len(), 2);
        assert_eq!(uuids(&branches[0].messages), vec!["h1", "a1"]);
        assert_eq!(
            uuids(&branches[1].messages),
            vec!["h2", "a2", "h3", "a3", "h4", "a4"]
        );
    }

    /// A re-ask that resembles neither its branch seed nor any main prompt
    /// lands in no branch at all.
    #[test]
    fn test_unmatched_turn_is_dropped() {
        let msgs = drifting_chain();
        let branches = detect_edit_branches_with(&msgs, GrowthPolicy::SimilarToSeed);
        assert_eq!(branches.len(), 2);
        assert_eq!(uuids(&branches[1].messages), vec!["h2", "a2", "h3", "a3"]);

        let kept: usize = branches.iter().map(Branch::len).sum();
        assert_eq!(kept, msgs.len() - 2, "h4 and a4 are dropped");
        assert!(branches
            .iter()
            .flat_map(|b| &b.messages)
            .all(|m| m.uuid != "h4" && m.uuid != "a4"));
    }

    #[test]
    fn test_orphan_assistant_excluded() {
        let msgs = vec![
            assistant("a0", "welcome back", 0),
            human("h1", "hello", 1),
            assistant("a1", "hi", 2),
        ];
        let branches = detect_edit_branches(&msgs);
        assert_eq!(uuids(&branches[0].messages), vec!["h1", "a1"]);
    }

    #[test]
    fn test_detection_is_deterministic() {
        let msgs = two_families();
        let first = detect_edit_branches_with(&msgs, GrowthPolicy::SimilarToSeed);
        let second = detect_edit_branches_with(&msgs.clone(), GrowthPolicy::SimilarToSeed);
        assert_eq!(first, second);
    }
}
