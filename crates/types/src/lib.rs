// crates/types/src/lib.rs
//! Serde models of the conversation export archive.
//!
//! The archive ships three JSON files: conversations, users, and projects.
//! These types mirror that layout and are shared with the frontend through
//! ts-rs bindings.
pub mod account;
pub mod conversation;

pub use account::*;
pub use conversation::*;

use serde::{Deserialize, Deserializer};

/// Deserialize a field that may be absent *or* explicitly `null` into its default.
///
/// Export files are inconsistent about empty values: the same field can be
/// missing, `null`, or an empty string/array depending on the export version.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
