//! # postlane-multipart
//!
//! `multipart/form-data` encoding for HTTP uploads (RFC 7578).
//!
//! ## Features
//!
//! - **Buffered forms**: Build the whole body in memory with [`Form`]
//! - **Streaming writer**: Encode parts straight into any `AsyncWrite` with
//!   [`MultipartWriter`], copying file content from an `AsyncRead`
//! - **Boundaries**: Random RFC 2046 boundaries, validated when supplied
//! - **Content types**: The outer `multipart/form-data` type is always derived
//!   from the encoder's own boundary
//!
//! ## Quick Start
//!
//! ### Buffered
//!
//! ```ignore
//! use postlane_multipart::{ContentType, Form};
//!
//! let mut form = Form::new();
//! form.text("message", r#"{"subject":"Hi"}"#);
//! form.file("file0", "notes.txt", &ContentType::new("text", "plain"), b"hello".to_vec());
//!
//! let content_type = form.content_type().to_string();
//! let body = form.into_bytes();
//! ```
//!
//! ### Streaming
//!
//! ```ignore
//! use postlane_multipart::{ContentType, MultipartWriter};
//!
//! let (reader, writer) = tokio::io::duplex(64 * 1024);
//! let mut multipart = MultipartWriter::new(writer);
//! let content_type = multipart.content_type();
//!
//! tokio::spawn(async move {
//!     multipart.write_field("message", br#"{"subject":"Hi"}"#, None).await?;
//!     let mut file = tokio::fs::File::open("large.bin").await?;
//!     multipart
//!         .write_file("file", "large.bin", &ContentType::octet_stream(), &mut file)
//!         .await?;
//!     multipart.finish().await
//! });
//! // `reader` now yields the encoded body.
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod boundary;
mod content_type;
mod error;
mod form;
mod header;
mod writer;

pub use boundary::{generate_boundary, validate_boundary};
pub use content_type::ContentType;
pub use error::{Error, Result};
pub use form::{Form, Part};
pub use header::PartHeaders;
pub use writer::MultipartWriter;
