//! Messages.

use super::attachment::{AttachmentInfo, OutgoingAttachment};
use super::common::EmailParticipant;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An email message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Message id.
    #[serde(default)]
    pub id: String,
    /// Owning grant.
    #[serde(default)]
    pub grant_id: String,
    /// Thread the message belongs to.
    #[serde(default)]
    pub thread_id: String,
    /// Subject line.
    #[serde(default)]
    pub subject: String,
    /// Senders.
    #[serde(default)]
    pub from: Vec<EmailParticipant>,
    /// Primary recipients.
    #[serde(default)]
    pub to: Vec<EmailParticipant>,
    /// Carbon-copy recipients.
    #[serde(default)]
    pub cc: Vec<EmailParticipant>,
    /// Blind carbon-copy recipients.
    #[serde(default)]
    pub bcc: Vec<EmailParticipant>,
    /// Reply-to addresses.
    #[serde(default)]
    pub reply_to: Vec<EmailParticipant>,
    /// Received or sent time.
    #[serde(
        default,
        with = "chrono::serde::ts_seconds_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub date: Option<DateTime<Utc>>,
    /// Unread flag.
    #[serde(default)]
    pub unread: bool,
    /// Starred flag.
    #[serde(default)]
    pub starred: bool,
    /// Short plain-text preview.
    #[serde(default)]
    pub snippet: String,
    /// HTML or plain body.
    #[serde(default)]
    pub body: String,
    /// Folder ids holding the message.
    #[serde(default)]
    pub folders: Vec<String>,
    /// Attachment metadata.
    #[serde(default)]
    pub attachments: Vec<AttachmentInfo>,
}

super::common::identified!(Message);

/// Filters for listing messages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MessageQuery {
    /// Page size.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    /// Cursor from a previous page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_token: Option<String>,
    /// Subject filter.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    /// Sender filter.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    /// Recipient filter.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    /// Unread filter.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unread: Option<bool>,
    /// Folder id filter.
    #[serde(rename = "in", skip_serializing_if = "Option::is_none")]
    pub in_folder: Option<String>,
    /// Thread filter.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thread_id: Option<String>,
    /// Provider-native search expression.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_query_native: Option<String>,
}

/// Mutable message flags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UpdateMessageRequest {
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

/// A message to send.
///
/// When `attachments` is non-empty the request is sent as
/// `multipart/form-data` with the JSON in a `message` field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SendMessageRequest {
    /// Sender, for domain sends and aliases.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub from: Vec<EmailParticipant>,
    /// Primary recipients.
    pub to: Vec<EmailParticipant>,
    /// Carbon-copy recipients.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub cc: Vec<EmailParticipant>,
    /// Blind carbon-copy recipients.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub bcc: Vec<EmailParticipant>,
    /// Reply-to addresses.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub reply_to: Vec<EmailParticipant>,
    /// Subject line.
    pub subject: String,
    /// Body.
    pub body: String,
    /// Message being replied to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_to_message_id: Option<String>,
    /// Deferred send time.
    #[serde(
        with = "chrono::serde::ts_seconds_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub send_at: Option<DateTime<Utc>>,
    /// In-memory attachments.
    #[serde(skip)]
    pub attachments: Vec<OutgoingAttachment>,
}

impl SendMessageRequest {
    /// Creates a message to one recipient.
    #[must_use]
    pub fn new(to: impl Into<String>, subject: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            to: vec![EmailParticipant::new(to)],
            subject: subject.into(),
            body: body.into(),
            ..Self::default()
        }
    }

    /// Adds an attachment.
    #[must_use]
    pub fn attach(mut self, attachment: OutgoingAttachment) -> Self {
        self.attachments.push(attachment);
        self
    }
}

/// A message queued for deferred sending.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledMessage {
    /// Schedule id.
    #[serde(default)]
    pub schedule_id: String,
    /// Upstream status, e.g. `pending`.
    #[serde(default)]
    pub status: String,
    /// Planned send time.
    #[serde(
        default,
        with = "chrono::serde::ts_seconds_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub close_time: Option<DateTime<Utc>>,
}
