//! Types shared by several resources.

use serde::{Deserialize, Serialize};

/// A named email address.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailParticipant {
    /// Display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Address.
    #[serde(default)]
    pub email: String,
}

impl EmailParticipant {
    /// Creates a participant without a display name.
    #[must_use]
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            name: None,
            email: email.into(),
        }
    }

    /// Sets the display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// Cursor parameters accepted by every listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ListQuery {
    /// Page size.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    /// Cursor from a previous page's `next_cursor`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_token: Option<String>,
}

impl ListQuery {
    /// First page with the given size.
    #[must_use]
    pub const fn limit(limit: u32) -> Self {
        Self {
            limit: Some(limit),
            page_token: None,
        }
    }

    /// Continues from `cursor`.
    #[must_use]
    pub fn after(mut self, cursor: impl Into<String>) -> Self {
        self.page_token = Some(cursor.into());
        self
    }
}

/// Implements [`Identified`](crate::Identified) for records with an `id: String`.
macro_rules! identified {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::envelope::Identified for $ty {
                fn id(&self) -> &str {
                    &self.id
                }
            }
        )+
    };
}

pub(crate) use identified;
