//! Response envelopes.
//!
//! Successful responses wrap their payload as
//! `{"data": ..., "next_cursor": ..., "request_id": ...}`. Failures use
//! `{"error": {"message": ..., "type": ...}, "request_id": ...}`.

use crate::error::{ApiError, Error, Result};
use serde::de::DeserializeOwned;
use serde::Deserialize;

/// Success envelope around a single payload.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T> {
    /// Payload.
    pub data: T,
    /// Upstream request id.
    #[serde(default)]
    pub request_id: Option<String>,
}

/// One page of a cursored listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    /// Records on this page.
    pub data: Vec<T>,
    /// Cursor for the next page; empty or absent on the last page.
    pub next_cursor: Option<String>,
    /// Upstream request id.
    pub request_id: Option<String>,
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self {
            data: Vec::new(),
            next_cursor: None,
            request_id: None,
        }
    }
}

impl<T> Page<T> {
    /// A single page holding `data` with no continuation.
    #[must_use]
    pub const fn single(data: Vec<T>) -> Self {
        Self {
            data,
            next_cursor: None,
            request_id: None,
        }
    }

    /// Returns true exactly when upstream returned a non-empty cursor.
    #[must_use]
    pub fn has_more(&self) -> bool {
        self.next_cursor.as_deref().is_some_and(|c| !c.is_empty())
    }

    /// Cursor to pass as `page_token` for the next call.
    #[must_use]
    pub fn cursor(&self) -> Option<&str> {
        self.next_cursor.as_deref().filter(|c| !c.is_empty())
    }

    /// Number of records on this page.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if the page holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl<T> IntoIterator for Page<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.into_iter()
    }
}

#[derive(Deserialize)]
struct ListEnvelope<T> {
    data: Option<Vec<T>>,
    #[serde(default)]
    next_cursor: Option<String>,
    #[serde(default)]
    request_id: Option<String>,
}

impl<T> From<ListEnvelope<T>> for Page<T> {
    fn from(env: ListEnvelope<T>) -> Self {
        Self {
            data: env.data.unwrap_or_default(),
            next_cursor: env.next_cursor,
            request_id: env.request_id,
        }
    }
}

#[derive(Deserialize)]
struct SingleEnvelope<T> {
    data: T,
    #[serde(default)]
    next_cursor: Option<String>,
    #[serde(default)]
    request_id: Option<String>,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    #[serde(default)]
    error: Option<ErrorBody>,
    #[serde(default)]
    request_id: Option<String>,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(rename = "type", default)]
    kind: Option<String>,
}

/// Records that carry an identifier.
pub trait Identified {
    /// The record's id; empty when the upstream omitted it.
    fn id(&self) -> &str;
}

/// Classifies a rejected response body.
///
/// Uses the error envelope's message when present, otherwise `status N`.
#[must_use]
pub fn classify(status: u16, body: &[u8]) -> ApiError {
    let Ok(envelope) = serde_json::from_slice::<ErrorEnvelope>(body) else {
        return ApiError::from_status(status);
    };
    let (message, kind) = match envelope.error {
        Some(ErrorBody { message, kind }) => (message.filter(|m| !m.is_empty()), kind),
        None => (None, None),
    };
    ApiError {
        status,
        message: message.unwrap_or_else(|| format!("status {status}")),
        kind,
        request_id: envelope.request_id,
    }
}

/// Decodes a raw JSON body.
///
/// # Errors
///
/// Returns [`Error::Decode`] with a bounded copy of the body on failure.
pub fn decode_json<T: DeserializeOwned>(body: &[u8]) -> Result<T> {
    serde_json::from_slice(body).map_err(|e| Error::decode(e.to_string(), Some(body)))
}

/// Decodes `{"data": T}`.
///
/// # Errors
///
/// Returns [`Error::Decode`] if the body is not a matching envelope.
pub fn decode_data<T: DeserializeOwned>(body: &[u8]) -> Result<T> {
    decode_json::<Envelope<T>>(body).map(|env| env.data)
}

/// Decodes a list envelope into a [`Page`]. A `null` or missing `data` is an
/// empty page.
///
/// # Errors
///
/// Returns [`Error::Decode`] if the body is not a matching envelope.
pub fn decode_page<T: DeserializeOwned>(body: &[u8]) -> Result<Page<T>> {
    decode_json::<ListEnvelope<T>>(body).map(Page::from)
}

/// Decodes a listing whose `data` may be an array or a single object.
///
/// The array form is tried first. When it yields no records the body is
/// retried as one object, kept only if its id is non-empty. An empty array,
/// a `null` or a missing `data` is an empty page.
///
/// # Errors
///
/// Returns [`Error::Decode`] carrying the raw body when neither shape fits.
pub fn decode_one_or_many<T>(body: &[u8]) -> Result<Page<T>>
where
    T: DeserializeOwned + Identified,
{
    let as_list = serde_json::from_slice::<ListEnvelope<T>>(body).ok();
    if let Some(list) = &as_list {
        if list.data.as_ref().is_some_and(|d| !d.is_empty()) {
            return Ok(as_list.map(Page::from).unwrap_or_default());
        }
    }

    if let Ok(single) = serde_json::from_slice::<SingleEnvelope<T>>(body) {
        if !single.data.id().is_empty() {
            return Ok(Page {
                data: vec![single.data],
                next_cursor: single.next_cursor,
                request_id: single.request_id,
            });
        }
    }

    match as_list {
        Some(list) => Ok(Page::from(list)),
        None => Err(Error::decode(
            "response data is neither a list nor a single record",
            Some(body),
        )),
    }
}
