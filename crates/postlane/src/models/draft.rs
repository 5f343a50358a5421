//! Drafts.

use super::attachment::{AttachmentInfo, OutgoingAttachment};
use super::common::EmailParticipant;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An unsent message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Draft {
    /// Draft id.
    #[serde(default)]
    pub id: String,
    /// Owning grant.
    #[serde(default)]
    pub grant_id: String,
    /// Thread the draft replies into.
    #[serde(default)]
    pub thread_id: String,
    /// Subject line.
    #[serde(default)]
    pub subject: String,
    /// Primary recipients.
    #[serde(default)]
    pub to: Vec<EmailParticipant>,
    /// Carbon-copy recipients.
    #[serde(default)]
    pub cc: Vec<EmailParticipant>,
    /// Blind carbon-copy recipients.
    #[serde(default)]
    pub bcc: Vec<EmailParticipant>,
    /// Body.
    #[serde(default)]
    pub body: String,
    /// Last edit time.
    #[serde(
        default,
        with = "chrono::serde::ts_seconds_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub date: Option<DateTime<Utc>>,
    /// Attachment metadata.
    #[serde(default)]
    pub attachments: Vec<AttachmentInfo>,
}

super::common::identified!(Draft);

/// Content for creating or replacing a draft.
///
/// Attachments switch the request to `multipart/form-data`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DraftRequest {
    /// Subject line.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    /// Primary recipients.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub to: Vec<EmailParticipant>,
    /// Carbon-copy recipients.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub cc: Vec<EmailParticipant>,
    /// Blind carbon-copy recipients.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub bcc: Vec<EmailParticipant>,
    /// Body.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    /// Message being replied to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_to_message_id: Option<String>,
    /// In-memory attachments.
    #[serde(skip)]
    pub attachments: Vec<OutgoingAttachment>,
}
