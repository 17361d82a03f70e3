// crates/types/src/conversation.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::null_as_default;

/// Who authored a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "codegen", ts(export, export_to = "../../../src/types/generated/"))]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    Human,
    Assistant,
}

/// Kind of a structured content block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "codegen", ts(export, export_to = "../../../src/types/generated/"))]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    Text,
    ToolUse,
    ToolResult,
    /// Block types added by newer exports. Kept so one unfamiliar block does
    /// not reject the whole archive.
    #[serde(other)]
    Unknown,
}

/// Typed view of a `tool_use` block's `input` object.
///
/// Only the fields the viewer renders are modelled; everything else stays in
/// the raw JSON on [`ChatMessageContent::input`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "codegen", ts(export, export_to = "../../../src/types/generated/"))]
pub struct ToolInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version_uuid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_str: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_str: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

/// A block nested inside a `tool_result` block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "codegen", ts(export, export_to = "../../../src/types/generated/"))]
pub struct NestedContent {
    #[serde(rename = "type")]
    pub kind: ContentType,
    #[serde(default, deserialize_with = "null_as_default")]
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
}

/// One structured content block of a chat message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "codegen", ts(export, export_to = "../../../src/types/generated/"))]
pub struct ChatMessageContent {
    #[serde(rename = "type")]
    pub kind: ContentType,
    #[serde(default)]
    pub start_timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    pub stop_timestamp: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub citations: Option<Vec<serde_json::Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub integration_name: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub integration_icon_url: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_content: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<Vec<NestedContent>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_error: Option<bool>,
}

impl ChatMessageContent {
    fn empty(kind: ContentType) -> Self {
        Self {
            kind,
            start_timestamp: None,
            stop_timestamp: None,
            text: None,
            citations: None,
            name: None,
            input: None,
            message: None,
            integration_name: None,
            integration_icon_url: None,
            context: None,
            display_content: None,
            content: None,
            is_error: None,
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::empty(ContentType::Text)
        }
    }

    pub fn tool_use(name: impl Into<String>, input: serde_json::Value) -> Self {
        Self {
            name: Some(name.into()),
            input: Some(input),
            ..Self::empty(ContentType::ToolUse)
        }
    }

    pub fn tool_result(name: impl Into<String>, content: Vec<NestedContent>) -> Self {
        Self {
            name: Some(name.into()),
            content: Some(content),
            ..Self::empty(ContentType::ToolResult)
        }
    }

    /// Interpret the raw `input` object as a [`ToolInput`].
    ///
    /// Returns `None` for non-tool blocks and for inputs whose rendered fields
    /// are not strings.
    pub fn tool_input(&self) -> Option<ToolInput> {
        let input = self.input.as_ref()?;
        serde_json::from_value(input.clone()).ok()
    }
}

/// A file attached to a message, with its extracted text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "codegen", ts(export, export_to = "../../../src/types/generated/"))]
pub struct Attachment {
    #[serde(default, deserialize_with = "null_as_default")]
    pub file_name: String,
    #[serde(default)]
    pub file_size: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub file_type: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub extracted_content: String,
}

/// A file reference without extracted content.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "codegen", ts(export, export_to = "../../../src/types/generated/"))]
pub struct FileRef {
    #[serde(default, deserialize_with = "null_as_default")]
    pub file_name: String,
}

/// A single message in a conversation export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "codegen", ts(export, export_to = "../../../src/types/generated/"))]
pub struct ChatMessage {
    pub uuid: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub text: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub content: Vec<ChatMessageContent>,
    pub sender: Sender,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub attachments: Vec<Attachment>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub files: Vec<FileRef>,
}

impl ChatMessage {
    pub fn new(
        uuid: impl Into<String>,
        sender: Sender,
        text: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            uuid: uuid.into(),
            text: text.into(),
            content: Vec::new(),
            sender,
            created_at,
            updated_at: created_at,
            attachments: Vec::new(),
            files: Vec::new(),
        }
    }

    pub fn human(uuid: impl Into<String>, text: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self::new(uuid, Sender::Human, text, created_at)
    }

    pub fn assistant(
        uuid: impl Into<String>,
        text: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self::new(uuid, Sender::Assistant, text, created_at)
    }

    pub fn with_content(mut self, content: Vec<ChatMessageContent>) -> Self {
        self.content = content;
        self
    }

    pub fn with_attachments(mut self, attachments: Vec<Attachment>) -> Self {
        self.attachments = attachments;
        self
    }

    pub fn is_human(&self) -> bool {
        self.sender == Sender::Human
    }
}

/// The account that owns a conversation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "codegen", ts(export, export_to = "../../../src/types/generated/"))]
pub struct Account {
    #[serde(default, deserialize_with = "null_as_default")]
    pub uuid: String,
}

/// One conversation from `conversations.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "codegen", ts(export, export_to = "../../../src/types/generated/"))]
pub struct Conversation {
    pub uuid: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub account: Account,
    #[serde(default, deserialize_with = "null_as_default")]
    pub chat_messages: Vec<ChatMessage>,
}

impl Conversation {
    /// Display name, falling back to "Untitled" when the name is empty.
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            "Untitled"
        } else {
            &self.name
        }
    }

    /// Copy of this conversation carrying a different message list.
    pub fn with_messages(&self, chat_messages: Vec<ChatMessage>) -> Self {
        Self {
            chat_messages,
            ..self.clone()
        }
    }
}
