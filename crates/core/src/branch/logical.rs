//! Logical-branch segmentation by time gaps and turn-taking.
//!
//! One pass over the time-sorted messages. A new segment starts when
//! - more than [`SESSION_GAP`] passed since the previous message, or
//! - the same sender speaks twice in a row more than [`EDIT_WINDOW`] apart.
//!
//! The same sender speaking twice within [`EDIT_WINDOW`] stays in the current
//! segment and is flagged as an edit.

use chrono::{DateTime, TimeDelta, Utc};
use claude_reader_types::ChatMessage;
use tracing::debug;

use super::{branch_id, sorted_by_time, MessageNode, MAIN_BRANCH_ID};

/// Silence after which the conversation is treated as resumed later.
pub const SESSION_GAP: TimeDelta = TimeDelta::hours(1);

/// Longest pause between two same-sender messages still treated as an edit.
pub const EDIT_WINDOW: TimeDelta = TimeDelta::minutes(5);

/// Running state of the segmentation pass.
#[derive(Debug, Default)]
pub struct SegmentState {
    segments: Vec<Vec<MessageNode>>,
    current: Vec<MessageNode>,
    previous_timestamp: Option<DateTime<Utc>>,
    counter: usize,
}

impl SegmentState {
    /// Feed the next message (in time order) into the state.
    pub fn step(mut self, message: ChatMessage) -> Self {
        let timestamp = message.created_at;
        let mut node = MessageNode::new(message, branch_id(self.counter));

        if let Some(previous) = self.previous_timestamp {
            if !self.current.is_empty() && timestamp - previous > SESSION_GAP {
                self.start_segment(&mut node);
            }
        }

        if let Some(last) = self.current.last() {
            if last.message.sender == node.message.sender {
                if timestamp - last.message.created_at > EDIT_WINDOW {
                    self.start_segment(&mut node);
                } else {
                    node.is_edited_message = true;
                }
            }
        }

        self.current.push(node);
        self.previous_timestamp = Some(timestamp);
        self
    }

    /// Close the open segment and return every segment in discovery order.
    pub fn finish(mut self) -> Vec<Vec<MessageNode>> {
        if !self.current.is_empty() {
            self.segments.push(self.current);
        }
        self.segments
    }

    fn start_segment(&mut self, node: &mut MessageNode) {
        self.segments.push(std::mem::take(&mut self.current));
        self.counter += 1;
        node.branch_id = branch_id(self.counter);
    }
}

/// Split `messages` into logical segments.
///
/// The first segment is conventionally the main conversation. Every message
/// lands in exactly one segment, and no segment is empty except the single
/// segment returned for empty input. Inputs of zero or one message come back
/// as one segment tagged `main`. Otherwise nodes carry scan-local ids
/// `branch-0`, `branch-1`, …; [`extract_branches`](super::extract_branches)
/// renumbers them for display.
pub fn segment_logical_branches(messages: &[ChatMessage]) -> Vec<Vec<MessageNode>> {
    let sorted = sorted_by_time(messages);
    if sorted.len() <= 1 {
        return vec![sorted
            .into_iter()
            .map(|m| MessageNode::new(m, MAIN_BRANCH_ID))
            .collect()];
    }

    let total = sorted.len();
    let segments = sorted
        .into_iter()
        .fold(SegmentState::default(), SegmentState::step)
        .finish();

    debug!(
        messages = total,
        segments = segments.len(),
        "Logical segmentation complete"
    );
    segments
}
