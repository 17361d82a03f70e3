// Property tests for the branch detectors over generated conversations.

use std::collections::HashMap;

use chrono::{TimeZone, Utc};
use claude_reader_core::{
    detect_edit_branches, detect_edit_branches_with, extract_branches, pair_turns,
    segment_logical_branches, similarity, GrowthPolicy,
};
use claude_reader_types::{ChatMessage, Sender};
use proptest::prelude::*;

const WORDS: &[&str] = &["fix", "the", "bug", "add", "tests", "now", "please", "rust", "parser"];

/// Conversations of up to 24 messages with small word vocabularies (so
/// re-asks happen often) and offsets that straddle both the edit window and
/// the session gap.
fn conversation() -> impl Strategy<Value = Vec<ChatMessage>> {
    let message = (
        any::<bool>(),
        prop::collection::vec(prop::sample::select(WORDS), 0..6),
        prop_oneof![0i64..400, 3000i64..5000],
    );
    prop::collection::vec(message, 0..24).prop_map(|specs| {
        let mut clock = 1_700_000_000i64;
        specs
            .into_iter()
            .enumerate()
            .map(|(i, (human, words, step))| {
                clock += step;
                let sender = if human { Sender::Human } else { Sender::Assistant };
                let at = Utc.timestamp_opt(clock, 0).unwrap();
                ChatMessage::new(format!("m{i}"), sender, words.join(" "), at)
            })
            .collect()
    })
}

fn uuid_counts<'a>(messages: impl IntoIterator<Item = &'a ChatMessage>) -> HashMap<&'a str, usize> {
    let mut counts = HashMap::new();
    for message in messages {
        *counts.entry(message.uuid.as_str()).or_insert(0) += 1;
    }
    counts
}

proptest! {
    #[test]
    fn similarity_is_symmetric_and_bounded(a in "[a-c ]{0,12}", b in "[a-c ]{0,12}") {
        let ab = similarity(&a, &b);
        prop_assert!((0.0..=1.0).contains(&ab));
        prop_assert_eq!(ab, similarity(&b, &a));
    }

    #[test]
    fn segments_partition_the_input(messages in conversation()) {
        let segments = segment_logical_branches(&messages);
        let flattened: Vec<&ChatMessage> = segments.iter().flatten().map(|n| &n.message).collect();
        prop_assert_eq!(flattened.len(), messages.len());
        prop_assert!(uuid_counts(flattened).values().all(|&c| c == 1));
        if messages.len() > 1 {
            prop_assert!(segments.iter().all(|s| !s.is_empty()));
        }
    }

    #[test]
    fn segments_preserve_time_order(messages in conversation()) {
        let segments = segment_logical_branches(&messages);
        let times: Vec<_> = segments.iter().flatten().map(|n| n.message.created_at).collect();
        prop_assert!(times.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn extraction_keeps_every_message(messages in conversation()) {
        let extracted = extract_branches(&messages);
        let total = extracted.main_conversation.len()
            + extracted.branches.iter().map(|b| b.messages.len()).sum::<usize>();
        prop_assert_eq!(total, messages.len());
        for (i, branch) in extracted.branches.iter().enumerate() {
            prop_assert_eq!(&branch.id, &format!("branch-{}", i + 1));
        }
    }

    #[test]
    fn detectors_are_deterministic(messages in conversation()) {
        prop_assert_eq!(detect_edit_branches(&messages), detect_edit_branches(&messages));
        prop_assert_eq!(segment_logical_branches(&messages), segment_logical_branches(&messages));
    }

    /// With the default policy every paired message lands in exactly one
    /// branch; only orphan assistant replies are left out.
    #[test]
    fn edit_branches_cover_every_turn(messages in conversation()) {
        let branches = detect_edit_branches(&messages);
        prop_assert!(branches[0].is_main());
        prop_assert!(branches.len() <= 2);

        let counts = uuid_counts(branches.iter().flat_map(|b| &b.messages));
        prop_assert!(counts.values().all(|&c| c == 1));
        for branch in &branches {
            prop_assert!(branch.messages.windows(2).all(|w| w[0].created_at <= w[1].created_at));
        }

        let mut sorted = messages.clone();
        sorted.sort_by_key(|m| m.created_at);
        let earliest_kept = sorted.iter().find(|m| counts.contains_key(m.uuid.as_str()));
        prop_assert_eq!(
            branches[0].messages.first().map(|m| m.uuid.as_str()),
            earliest_kept.map(|m| m.uuid.as_str())
        );

        if messages.len() > 1 {
            let paired: usize = pair_turns(&sorted).iter().map(|t| t.messages().count()).sum();
            prop_assert_eq!(counts.len(), paired);
        }
    }

    #[test]
    fn tightened_policy_never_duplicates(messages in conversation()) {
        let branches = detect_edit_branches_with(&messages, GrowthPolicy::SimilarToSeed);
        let counts = uuid_counts(branches.iter().flat_map(|b| &b.messages));
        prop_assert!(counts.values().all(|&c| c == 1));
        for side in &branches[1..] {
            prop_assert!(side.messages[0].sender == Sender::Human);
            prop_assert!(side.branch_point.is_some());
        }
    }
}
