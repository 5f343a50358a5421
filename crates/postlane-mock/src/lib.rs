//! # postlane-mock
//!
//! Stand-in backends for the [`postlane`] capability traits.
//!
//! - [`MockClient`]: in-memory records you control, a call log, scripted
//!   per-operation failures and an injectable [`SendMessageHook`]
//! - [`DemoClient`]: fixed canned data for demos; writes are echoed back
//!   and never stored
//!
//! Both implement [`ProviderApi`](postlane::ProviderApi), so code written
//! against the traits runs unchanged on either one or on
//! [`HttpClient`](postlane::HttpClient).
//!
//! ```ignore
//! use postlane::{Context, FoldersApi, FolderRequest};
//! use postlane_mock::{Fixtures, MockClient};
//!
//! let mock = MockClient::new(Fixtures::new());
//! let ctx = Context::background();
//! mock.create_folder(&ctx, "grant", &FolderRequest::named("Receipts")).await?;
//! assert_eq!(mock.call_count("create_folder"), 1);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod demo;
mod echo;
mod guard;
mod mock;
mod store;

pub use demo::DemoClient;
pub use mock::{Call, MockClient, SendMessageHook};
pub use store::Fixtures;
