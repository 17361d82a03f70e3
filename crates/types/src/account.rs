// crates/types/src/account.rs
//! Users and projects from `users.json` / `projects.json`.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::null_as_default;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "codegen", ts(export, export_to = "../../../src/types/generated/"))]
pub struct User {
    pub uuid: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub full_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub email_address: String,
    #[serde(default)]
    pub verified_phone_number: Option<String>,
}

/// Author of a project.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "codegen", ts(export, export_to = "../../../src/types/generated/"))]
pub struct Creator {
    #[serde(default, deserialize_with = "null_as_default")]
    pub uuid: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub full_name: String,
}

/// A knowledge document uploaded to a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "codegen", ts(export, export_to = "../../../src/types/generated/"))]
pub struct Doc {
    pub uuid: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub filename: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub content: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "codegen", ts(export, export_to = "../../../src/types/generated/"))]
pub struct Project {
    pub uuid: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default)]
    pub is_private: bool,
    #[serde(default)]
    pub is_starter_project: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub prompt_template: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub creator: Creator,
    #[serde(default, deserialize_with = "null_as_default")]
    pub docs: Vec<Doc>,
}

impl Project {
    /// Total characters of knowledge text attached to the project.
    pub fn docs_size(&self) -> usize {
        self.docs.iter().map(|d| d.content.chars().count()).sum()
    }
}
