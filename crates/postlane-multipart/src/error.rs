//! Error types for multipart encoding.

use std::io;

/// Result type alias for multipart operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Multipart error types.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// I/O error while writing the body or reading part content.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Boundary violates RFC 2046 syntax.
    #[error("Invalid boundary: {0}")]
    InvalidBoundary(String),

    /// Invalid content type.
    #[error("Invalid content type: {0}")]
    InvalidContentType(String),

    /// Writer used after `finish`.
    #[error("Multipart writer already finished")]
    Finished,
}

impl Error {
    /// Returns the underlying I/O error kind, if this is an I/O failure.
    #[must_use]
    pub fn io_kind(&self) -> Option<io::ErrorKind> {
        match self {
            Self::Io(e) => Some(e.kind()),
            _ => None,
        }
    }
}
