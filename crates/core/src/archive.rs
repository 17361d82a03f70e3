// crates/core/src/archive.rs
//! Loaders for the three export files: conversations, users, and projects.
//!
//! Timestamps are parsed into `DateTime<Utc>` here, so a file with a
//! malformed timestamp is rejected as a whole before any branch detection
//! runs on it.

use std::path::Path;

use claude_reader_types::{Conversation, Project, User};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::ArchiveError;

async fn read_text(path: &Path) -> Result<String, ArchiveError> {
    let text = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| ArchiveError::io(path, e))?;
    debug!(path = %path.display(), bytes = text.len(), "Read archive file");
    Ok(text)
}

fn parse_json<T: DeserializeOwned>(path: &Path, text: &str) -> Result<T, ArchiveError> {
    serde_json::from_str(text).map_err(|e| ArchiveError::malformed(path, &e))
}

/// Parse the text of a `conversations.json` export.
///
/// `path` is only used for error messages.
pub fn parse_conversations(path: &Path, text: &str) -> Result<Vec<Conversation>, ArchiveError> {
    parse_json(path, text)
}

/// Parse either a full conversations export (a JSON array) or a single
/// conversation file written by the splitter (a JSON object).
pub fn parse_conversation_file(path: &Path, text: &str) -> Result<Vec<Conversation>, ArchiveError> {
    if text.trim_start().starts_with('[') {
        parse_conversations(path, text)
    } else {
        parse_json::<Conversation>(path, text).map(|c| vec![c])
    }
}

pub fn parse_users(path: &Path, text: &str) -> Result<Vec<User>, ArchiveError> {
    parse_json(path, text)
}

pub fn parse_projects(path: &Path, text: &str) -> Result<Vec<Project>, ArchiveError> {
    parse_json(path, text)
}

/// Load a `conversations.json` export.
///
/// # Errors
/// - `ArchiveError::NotFound` if the file doesn't exist
/// - `ArchiveError::PermissionDenied` if the file can't be read
/// - `ArchiveError::Io` for other I/O errors
/// - `ArchiveError::MalformedJson` if the JSON or any timestamp is invalid
pub async fn load_conversations(path: &Path) -> Result<Vec<Conversation>, ArchiveError> {
    let text = read_text(path).await?;
    let conversations = parse_conversations(path, &text)?;
    debug!(
        path = %path.display(),
        conversations = conversations.len(),
        "Loaded conversations"
    );
    Ok(conversations)
}

/// Load a single conversation file produced by the splitter or branch export.
pub async fn load_conversation(path: &Path) -> Result<Conversation, ArchiveError> {
    let text = read_text(path).await?;
    parse_json(path, &text)
}

/// Load a file that may hold one conversation or a whole export.
pub async fn load_conversation_file(path: &Path) -> Result<Vec<Conversation>, ArchiveError> {
    let text = read_text(path).await?;
    parse_conversation_file(path, &text)
}

pub async fn load_users(path: &Path) -> Result<Vec<User>, ArchiveError> {
    let text = read_text(path).await?;
    parse_users(path, &text)
}

pub async fn load_projects(path: &Path) -> Result<Vec<Project>, ArchiveError> {
    let text = read_text(path).await?;
    parse_projects(path, &text)
}
