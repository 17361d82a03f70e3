// Arbitrary bytes into the export parsers: they must return Ok or Err,
// never panic.
#![no_main]

use std::path::Path;

use claude_reader_core::{parse_conversation_file, parse_projects, parse_users, DetectionStrategy};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let path = Path::new("fuzz.json");

    if let Ok(conversations) = parse_conversation_file(path, text) {
        for conversation in conversations.iter().take(4) {
            let _ = DetectionStrategy::Edit.detector().detect(&conversation.chat_messages);
        }
    }
    let _ = parse_users(path, text);
    let _ = parse_projects(path, text);
});
