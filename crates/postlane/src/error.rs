//! Error types for API operations.
//!
//! Callers match on [`Error`] to tell apart failures that happened before any
//! I/O (`InvalidInput`), while waiting for a rate-limiter slot
//! (`RateLimitAborted`), on the wire (`Network`), at the application level
//! (`Api`, `NotFound`), while parsing a body (`Decode`) or while encoding a
//! streamed upload (`Upload`).

use std::time::Duration;

/// Result type alias for API operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Largest slice of a raw response body kept for diagnostics.
pub const MAX_DIAGNOSTIC_BODY: usize = 512;

/// Errors returned by every backend.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A required identifier or field was empty; no request was sent.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The context ended while waiting for a rate-limiter slot.
    #[error("Rate limiter wait aborted: {0}")]
    RateLimitAborted(#[source] Interrupted),

    /// Transport-level failure.
    #[error("Network error: {0}")]
    Network(#[from] NetworkError),

    /// Upstream answered with a status outside the accepted set.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Upstream answered 404 for a single resource.
    #[error("{resource} not found: {id}")]
    NotFound {
        /// Resource kind, e.g. "message".
        resource: &'static str,
        /// Identifier that was looked up.
        id: String,
    },

    /// Response body did not match the expected shape.
    #[error("Decode error: {message}")]
    Decode {
        /// What went wrong.
        message: String,
        /// Leading bytes of the raw body, if available.
        body: Option<String>,
    },

    /// The streamed upload writer failed.
    #[error("Upload encoding failed: {0}")]
    Upload(#[source] postlane_multipart::Error),

    /// Client configuration is unusable.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Why a context stopped a call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Interrupted {
    /// Caller cancelled the context.
    #[error("context cancelled")]
    Cancelled,
    /// The context deadline passed.
    #[error("context deadline exceeded")]
    DeadlineExceeded,
}

/// Transport-level failures.
#[derive(Debug, thiserror::Error)]
pub enum NetworkError {
    /// DNS, connect, TLS or protocol failure from the HTTP stack.
    #[error("{0}")]
    Transport(#[source] reqwest::Error),

    /// The effective deadline passed during I/O.
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// The caller cancelled the context during I/O.
    #[error("request cancelled")]
    Cancelled,
}

/// Application-level error decoded from the error envelope.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("API error (status {status}): {message}")]
pub struct ApiError {
    /// HTTP status code.
    pub status: u16,
    /// Upstream message, or `status N` when the body had none.
    pub message: String,
    /// Upstream error type, e.g. `invalid_request_error`.
    pub kind: Option<String>,
    /// Upstream request id, when reported.
    pub request_id: Option<String>,
}

impl ApiError {
    /// Creates an API error without an upstream envelope.
    #[must_use]
    pub fn from_status(status: u16) -> Self {
        Self {
            status,
            message: format!("status {status}"),
            kind: None,
            request_id: None,
        }
    }
}

impl Error {
    /// Error for an empty required field.
    #[must_use]
    pub fn missing(field: &str) -> Self {
        Self::InvalidInput(format!("{field} is required"))
    }

    /// Resource-specific 404.
    #[must_use]
    pub fn not_found(resource: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            resource,
            id: id.into(),
        }
    }

    /// Decode failure carrying a bounded copy of the raw body.
    #[must_use]
    pub fn decode(message: impl Into<String>, body: Option<&[u8]>) -> Self {
        Self::Decode {
            message: message.into(),
            body: body.map(truncate_body),
        }
    }

    /// Returns true for the 404 refinement.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// HTTP status associated with this error, if any.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Api(e) => Some(e.status),
            Self::NotFound { .. } => Some(404),
            _ => None,
        }
    }

    /// Returns true if a retry policy may re-issue the request.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network(NetworkError::Transport(_)) => true,
            Self::Api(e) => matches!(e.status, 429 | 502 | 503 | 504),
            _ => false,
        }
    }
}

fn truncate_body(body: &[u8]) -> String {
    let text = String::from_utf8_lossy(body);
    if text.len() <= MAX_DIAGNOSTIC_BODY {
        return text.into_owned();
    }
    let mut end = MAX_DIAGNOSTIC_BODY;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &text[..end])
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display() {
        let err = Error::Api(ApiError {
            status: 400,
            message: "grant_id is invalid".to_string(),
            kind: Some("invalid_request_error".to_string()),
            request_id: None,
        });
        assert_eq!(err.to_string(), "API error (status 400): grant_id is invalid");
        assert_eq!(err.status(), Some(400));
    }

    #[test]
    fn test_api_error_from_status() {
        let err = ApiError::from_status(502);
        assert_eq!(err.message, "status 502");
        assert!(Error::Api(err).is_retryable());
    }

    #[test]
    fn test_not_found() {
        let err = Error::not_found("message", "msg-1");
        assert!(err.is_not_found());
        assert_eq!(err.status(), Some(404));
        assert_eq!(err.to_string(), "message not found: msg-1");
    }

    #[test]
    fn test_retryable_classes() {
        assert!(!Error::missing("grant_id").is_retryable());
        assert!(!Error::Network(NetworkError::Cancelled).is_retryable());
        assert!(!Error::Network(NetworkError::Timeout(Duration::from_secs(1))).is_retryable());
        assert!(!Error::Api(ApiError::from_status(400)).is_retryable());
        assert!(Error::Api(ApiError::from_status(429)).is_retryable());
    }

    #[test]
    fn test_decode_body_is_bounded() {
        let body = "é".repeat(MAX_DIAGNOSTIC_BODY);
        let Error::Decode { body: Some(kept), .. } = Error::decode("bad", Some(body.as_bytes())) else {
            panic!("expected decode error");
        };
        assert!(kept.len() <= MAX_DIAGNOSTIC_BODY + 3);
        assert!(kept.ends_with("..."));
    }

    #[test]
    fn test_missing_field_message() {
        assert_eq!(
            Error::missing("grant_id").to_string(),
            "Invalid input: grant_id is required"
        );
    }
}
