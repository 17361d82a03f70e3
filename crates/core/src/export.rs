// crates/core/src/export.rs
//! Splitting an export into per-conversation files, and saving branches as
//! standalone conversations.

use std::path::{Path, PathBuf};

use claude_reader_types::Conversation;
use serde::Serialize;
use tracing::info;

use crate::branch::{extract_branches, ExtractedBranches, MAIN_BRANCH_ID};
use crate::error::ExportError;

const FILENAME_STEM_LEN: usize = 30;
const FILENAME_UUID_LEN: usize = 8;

/// One conversation paired with the file name it is saved under.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SplitConversation {
    pub filename: String,
    pub data: Conversation,
}

/// File name for `conversation`: a sanitized, lowercased name prefix plus
/// the first eight characters of its uuid.
///
/// ```
/// # use claude_reader_core::conversation_filename;
/// # use claude_reader_types::Conversation;
/// # let mut conversation: Conversation = serde_json::from_str(
/// #     r#"{"uuid":"1234abcd-ffff","name":"","created_at":"2024-01-01T00:00:00Z","updated_at":"2024-01-01T00:00:00Z"}"#,
/// # ).unwrap();
/// conversation.name = "Fix: CI (again)".into();
/// assert_eq!(conversation_filename(&conversation), "fix__ci__again__1234abcd.json");
/// ```
pub fn conversation_filename(conversation: &Conversation) -> String {
    let stem: String = if conversation.name.is_empty() {
        "untitled".to_string()
    } else {
        conversation
            .name
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() {
                    c.to_ascii_lowercase()
                } else {
                    '_'
                }
            })
            .take(FILENAME_STEM_LEN)
            .collect()
    };
    let uuid_prefix: String = conversation.uuid.chars().take(FILENAME_UUID_LEN).collect();
    format!("{stem}_{uuid_prefix}.json")
}

pub fn split_conversations(conversations: &[Conversation]) -> Vec<SplitConversation> {
    conversations
        .iter()
        .map(|conversation| SplitConversation {
            filename: conversation_filename(conversation),
            data: conversation.clone(),
        })
        .collect()
}

async fn ensure_dir(dir: &Path) -> Result<(), ExportError> {
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|source| ExportError::CreateDir {
            path: dir.to_path_buf(),
            source,
        })
}

async fn write_json(path: &Path, conversation: &Conversation) -> Result<(), ExportError> {
    let json = serde_json::to_string_pretty(conversation).map_err(|source| ExportError::Serialize {
        uuid: conversation.uuid.clone(),
        source,
    })?;
    tokio::fs::write(path, json)
        .await
        .map_err(|source| ExportError::Write {
            path: path.to_path_buf(),
            source,
        })
}

/// Write `conversation` as pretty-printed JSON into `dir`, creating the
/// directory if needed. Returns the written path.
pub async fn write_conversation(dir: &Path, conversation: &Conversation) -> Result<PathBuf, ExportError> {
    ensure_dir(dir).await?;
    let path = dir.join(conversation_filename(conversation));
    write_json(&path, conversation).await?;
    info!(path = %path.display(), messages = conversation.chat_messages.len(), "Wrote conversation");
    Ok(path)
}

/// Write every conversation to its own file in `dir`.
///
/// Conversations whose file names collide overwrite each other, last one wins.
pub async fn write_all_conversations(
    dir: &Path,
    conversations: &[Conversation],
) -> Result<Vec<PathBuf>, ExportError> {
    ensure_dir(dir).await?;
    let mut written = Vec::with_capacity(conversations.len());
    for split in split_conversations(conversations) {
        let path = dir.join(&split.filename);
        write_json(&path, &split.data).await?;
        written.push(path);
    }
    info!(dir = %dir.display(), files = written.len(), "Split conversations");
    Ok(written)
}

/// A copy of `conversation` holding only the messages of `branch_id`.
///
/// `"main"` keeps the conversation's name; side branches are renamed
/// `"<name> - Branch <id>"`. Returns `None` for an unknown branch id.
pub fn branch_conversation(
    conversation: &Conversation,
    extracted: &ExtractedBranches,
    branch_id: &str,
) -> Option<Conversation> {
    let messages = extracted.messages_for(branch_id)?.to_vec();
    let mut copy = conversation.with_messages(messages);
    if branch_id != MAIN_BRANCH_ID {
        copy.name = format!("{} - Branch {branch_id}", conversation.display_name());
    }
    Some(copy)
}

/// Segment `conversation`, then write the selected branch into `dir`.
pub async fn export_branch(
    dir: &Path,
    conversation: &Conversation,
    branch_id: &str,
) -> Result<PathBuf, ExportError> {
    let extracted = extract_branches(&conversation.chat_messages);
    let branch = branch_conversation(conversation, &extracted, branch_id).ok_or_else(|| {
        ExportError::UnknownBranch {
            uuid: conversation.uuid.clone(),
            id: branch_id.to_string(),
        }
    })?;
    write_conversation(dir, &branch).await
}
