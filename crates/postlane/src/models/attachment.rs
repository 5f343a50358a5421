//! Attachment metadata and upload sources.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::fmt;
use tokio::io::AsyncRead;

/// Attachment metadata as reported on a message or draft.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachmentInfo {
    /// Attachment id.
    #[serde(default)]
    pub id: String,
    /// Owning grant.
    #[serde(default)]
    pub grant_id: String,
    /// Original filename.
    #[serde(default)]
    pub filename: String,
    /// MIME type.
    #[serde(default)]
    pub content_type: String,
    /// Size in bytes.
    #[serde(default)]
    pub size: u64,
    /// Content-ID for inline parts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_id: Option<String>,
    /// Whether the attachment is shown inline.
    #[serde(default)]
    pub is_inline: bool,
}

super::common::identified!(AttachmentInfo);

/// Attachment whose content is already in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingAttachment {
    /// Filename sent in the part's disposition.
    pub filename: String,
    /// MIME type; `application/octet-stream` when absent.
    pub content_type: Option<String>,
    /// Raw content. Empty attachments are not uploaded.
    pub content: Bytes,
}

impl OutgoingAttachment {
    /// Creates an attachment with no declared type.
    #[must_use]
    pub fn new(filename: impl Into<String>, content: impl Into<Bytes>) -> Self {
        Self {
            filename: filename.into(),
            content_type: None,
            content: content.into(),
        }
    }

    /// Declares the MIME type.
    #[must_use]
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }
}

/// Attachment read from an open byte stream during upload.
pub struct StreamedAttachment {
    /// Filename sent in the part's disposition.
    pub filename: String,
    /// MIME type; `application/octet-stream` when absent.
    pub content_type: Option<String>,
    /// Content source.
    pub reader: Box<dyn AsyncRead + Send + Unpin>,
}

impl StreamedAttachment {
    /// Creates a streamed attachment.
    pub fn new(filename: impl Into<String>, reader: impl AsyncRead + Send + Unpin + 'static) -> Self {
        Self {
            filename: filename.into(),
            content_type: None,
            reader: Box::new(reader),
        }
    }

    /// Declares the MIME type.
    #[must_use]
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }
}

impl fmt::Debug for StreamedAttachment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StreamedAttachment")
            .field("filename", &self.filename)
            .field("content_type", &self.content_type)
            .finish_non_exhaustive()
    }
}
