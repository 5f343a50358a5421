//! Threads.

use super::common::EmailParticipant;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A conversation thread.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thread {
    /// Thread id.
    #[serde(default)]
    pub id: String,
    /// Owning grant.
    #[serde(default)]
    pub grant_id: String,
    /// Subject of the first message.
    #[serde(default)]
    pub subject: String,
    /// Everyone on the thread.
    #[serde(default)]
    pub participants: Vec<EmailParticipant>,
    /// Messages in the thread.
    #[serde(default)]
    pub message_ids: Vec<String>,
    /// Drafts in the thread.
    #[serde(default)]
    pub draft_ids: Vec<String>,
    /// Preview of the latest message.
    #[serde(default)]
    pub snippet: String,
    /// Any message unread.
    #[serde(default)]
    pub unread: bool,
    /// Any message starred.
    #[serde(default)]
    pub starred: bool,
    /// Any message has attachments.
    #[serde(default)]
    pub has_attachments: bool,
    /// Receive time of the latest message.
    #[serde(
        default,
        with = "chrono::serde::ts_seconds_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub latest_message_received_date: Option<DateTime<Utc>>,
    /// Folder ids.
    #[serde(default)]
    pub folders: Vec<String>,
}

super::common::identified!(Thread);

/// Filters for listing threads.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ThreadQuery {
    /// Page size.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    /// Cursor from a previous page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_token: Option<String>,
    /// Subject filter.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    /// Participant filter.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub any_email: Option<String>,
    /// Unread filter.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unread: Option<bool>,
    /// Folder id filter.
    #[serde(rename = "in", skip_serializing_if = "Option::is_none")]
    pub in_folder: Option<String>,
}

/// Mutable thread flags, applied to every message in the thread.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UpdateThreadRequest {
    /// Unread flag.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unread: Option<bool>,
    /// Starred flag.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub starred: Option<bool>,
    /// Replacement folder ids.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub folders: Option<Vec<String>>,
}
