//! Human → assistant turn pairing.

use claude_reader_types::{ChatMessage, Sender};

/// One human prompt and the assistant reply that immediately followed it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Turn<'a> {
    pub human: &'a ChatMessage,
    /// `None` when the prompt went unanswered (the next message was another
    /// human prompt, or the conversation ended).
    pub assistant: Option<&'a ChatMessage>,
}

impl<'a> Turn<'a> {
    /// The turn's messages in conversation order.
    pub fn messages(&self) -> impl Iterator<Item = &'a ChatMessage> {
        std::iter::once(self.human).chain(self.assistant)
    }
}

/// Group `messages` into turns, scanning them in the order given.
///
/// Callers pass a time-sorted slice. An assistant message with no pending
/// human prompt (e.g. a conversation opening with an assistant greeting, or a
/// second reply to the same prompt) belongs to no turn and is dropped.
pub fn pair_turns(messages: &[ChatMessage]) -> Vec<Turn<'_>> {
    let mut turns = Vec::new();
    let mut pending: Option<&ChatMessage> = None;

    for message in messages {
        match message.sender {
            Sender::Human => {
                if let Some(human) = pending.replace(message) {
                    turns.push(Turn { human, assistant: None });
                }
            }
            Sender::Assistant => {
                if let Some(human) = pending.take() {
                    turns.push(Turn {
                        human,
                        assistant: Some(message),
                    });
                }
            }
        }
    }

    if let Some(human) = pending {
        turns.push(Turn { human, assistant: None });
    }

    turns
}
