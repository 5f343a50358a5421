//! Folders and labels.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Marker stored in [`Folder::system_folder`] when upstream reports `true`.
pub const SYSTEM_FOLDER_MARKER: &str = "true";

/// A folder (IMAP, Microsoft) or label (Google).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Folder {
    /// Folder id.
    #[serde(default)]
    pub id: String,
    /// Owning grant.
    #[serde(default)]
    pub grant_id: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Parent folder id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    /// System role. Some providers send a role name such as `"inbox"`, others
    /// a boolean. `true` becomes [`SYSTEM_FOLDER_MARKER`]; `false` and null
    /// become the empty string.
    #[serde(default, deserialize_with = "string_or_bool")]
    pub system_folder: String,
    /// Messages in the folder.
    #[serde(default)]
    pub total_count: u64,
    /// Unread messages in the folder.
    #[serde(default)]
    pub unread_count: u64,
    /// Label background color.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    /// Label text color.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_color: Option<String>,
}

super::common::identified!(Folder);

impl Folder {
    /// Returns true for provider-managed folders.
    #[must_use]
    pub fn is_system(&self) -> bool {
        !self.system_folder.is_empty()
    }
}

/// Fields for creating or renaming a folder.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FolderRequest {
    /// Display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Parent folder id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    /// Label background color.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    /// Label text color.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_color: Option<String>,
}

impl FolderRequest {
    /// Request carrying only a name.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }
}

fn string_or_bool<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Bool(true) => SYSTEM_FOLDER_MARKER.to_string(),
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Bool(false) | Value::Null | Value::Array(_) | Value::Object(_) => String::new(),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_system_folder_shapes() {
        let raw = r#"[
            {"id":"a","system_folder":true},
            {"id":"b","system_folder":false},
            {"id":"c","system_folder":"inbox"},
            {"id":"d","system_folder":null},
            {"id":"e"}
        ]"#;
        let folders: Vec<Folder> = serde_json::from_str(raw).unwrap();
        let roles: Vec<&str> = folders.iter().map(|f| f.system_folder.as_str()).collect();
        assert_eq!(roles, vec![SYSTEM_FOLDER_MARKER, "", "inbox", "", ""]);
        assert!(folders[0].is_system());
        assert!(!folders[1].is_system());
    }

    #[test]
    fn test_request_omits_absent_fields() {
        let json = serde_json::to_string(&FolderRequest::named("Receipts")).unwrap();
        assert_eq!(json, r#"{"name":"Receipts"}"#);
    }
}
