// Feed arbitrary message sequences through every branch detector.
//
// Invariants checked on every input:
// - no detector panics
// - every detector returns the main branch first
// - logical segmentation neither drops nor duplicates messages
// - no message appears in two edit branches
#![no_main]

use std::collections::HashSet;

use arbitrary::Arbitrary;
use chrono::{TimeZone, Utc};
use claude_reader_core::{extract_branches, DetectionStrategy};
use claude_reader_types::{ChatMessage, Sender};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct FuzzMessage {
    human: bool,
    /// Seconds since the previous message; u16 covers both windows.
    delay: u16,
    text: String,
}

fuzz_target!(|input: Vec<FuzzMessage>| {
    let mut clock = 1_700_000_000i64;
    let messages: Vec<ChatMessage> = input
        .into_iter()
        .take(64)
        .enumerate()
        .map(|(i, m)| {
            clock += i64::from(m.delay);
            let sender = if m.human { Sender::Human } else { Sender::Assistant };
            ChatMessage::new(format!("m{i}"), sender, m.text, Utc.timestamp_opt(clock, 0).unwrap())
        })
        .collect();

    for strategy in DetectionStrategy::ALL {
        let branches = strategy.detector().detect(&messages);
        assert!(branches[0].is_main());
    }

    let extracted = extract_branches(&messages);
    let total = extracted.main_conversation.len()
        + extracted.branches.iter().map(|b| b.messages.len()).sum::<usize>();
    assert_eq!(total, messages.len());

    let edit = DetectionStrategy::Edit.detector().detect(&messages);
    let mut seen = HashSet::new();
    for message in edit.iter().flat_map(|b| &b.messages) {
        assert!(seen.insert(message.uuid.as_str()));
    }
});
