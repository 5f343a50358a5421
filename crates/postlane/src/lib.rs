//! # postlane
//!
//! Typed client for the Postlane email, calendar and contacts API.
//!
//! ## Features
//!
//! - **One interface, several backends**: [`ProviderApi`] is implemented by
//!   [`HttpClient`] here and by the mock and demo clients in `postlane-mock`
//! - **Rate limiting**: a token bucket (rate `R`, burst `2R`) shared by every
//!   call of a client
//! - **Bounded calls**: every request runs under a deadline, either the
//!   [`Context`]'s own or the configured default timeout, and honors
//!   cancellation while throttled, in flight and while reading the body
//! - **Attachments**: buffered multipart for in-memory content, streamed
//!   multipart for readers
//! - **Classified errors**: see [`Error`]
//!
//! ## Quick Start
//!
//! ```ignore
//! use postlane::{ClientConfig, Context, HttpClient, MessagesApi, MessageQuery};
//! use std::time::Duration;
//!
//! let client = HttpClient::new(ClientConfig::from_env()?)?;
//! let ctx = Context::background().with_timeout(Duration::from_secs(10));
//!
//! let page = client
//!     .list_messages(&ctx, "grant-id", &MessageQuery { limit: Some(20), ..Default::default() })
//!     .await?;
//! for message in &page.data {
//!     println!("{}: {}", message.id, message.subject);
//! }
//! if let Some(cursor) = page.cursor() {
//!     // pass `cursor` as `page_token` to fetch the next page
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod api;
pub mod client;
pub mod config;
pub mod context;
pub mod envelope;
pub mod error;
pub mod models;
pub mod rate_limit;
pub mod retry;
pub mod transport;
pub mod upload;

mod resources;

pub use api::{
    AdminApi, AttachmentsApi, AuthApi, CalendarsApi, ContactsApi, DraftsApi, FoldersApi,
    MessagesApi, ProviderApi, SchedulingApi, ThreadsApi,
};
pub use client::HttpClient;
pub use config::{ClientConfig, ClientConfigBuilder, Region};
pub use context::Context;
pub use envelope::{Identified, Page};
pub use error::{ApiError, Error, Interrupted, NetworkError, Result};
pub use models::*;
pub use rate_limit::TokenBucket;
pub use retry::RetryPolicy;
pub use transport::{OpenResponse, Transport};

pub use tokio_util::sync::CancellationToken;
