//! [`HttpClient`] implementations of the capability traits.
//!
//! Each submodule maps one trait onto paths under `/v3`. Shared request
//! shapes live here.

mod admin;
mod attachments;
mod auth;
mod calendars;
mod contacts;
mod drafts;
mod folders;
mod messages;
mod scheduling;
mod threads;

use crate::client::{decode_data, decode_page, require, HttpClient, CREATE, DELETE, READ};
use crate::context::Context;
use crate::envelope::Page;
use crate::error::Result;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use url::Url;

impl HttpClient {
    /// `/v3/grants/{grant_id}/<rest...>`, validating `grant_id`.
    pub(crate) fn grant_url(&self, grant_id: &str, rest: &[&str]) -> Result<Url> {
        let grant_id = require("grant_id", grant_id)?;
        let mut segments = vec!["v3", "grants", grant_id];
        segments.extend_from_slice(rest);
        self.endpoint(&segments)
    }

    pub(crate) fn grant_url_with_query<Q: Serialize>(
        &self,
        grant_id: &str,
        rest: &[&str],
        query: &Q,
    ) -> Result<Url> {
        let grant_id = require("grant_id", grant_id)?;
        let mut segments = vec!["v3", "grants", grant_id];
        segments.extend_from_slice(rest);
        self.endpoint_with_query(&segments, query)
    }

    pub(crate) async fn fetch_page<T: DeserializeOwned>(&self, ctx: &Context, url: Url) -> Result<Page<T>> {
        let response = self.do_json::<()>(ctx, Method::GET, url, None, READ).await?;
        decode_page(response).await
    }

    pub(crate) async fn fetch_all<T: DeserializeOwned>(&self, ctx: &Context, url: Url) -> Result<Vec<T>> {
        self.fetch_page(ctx, url).await.map(|page| page.data)
    }

    pub(crate) async fn create<T, B>(&self, ctx: &Context, url: Url, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized + Sync,
    {
        let response = self.do_json(ctx, Method::POST, url, Some(body), CREATE).await?;
        decode_data(response).await
    }

    pub(crate) async fn update<T, B>(&self, ctx: &Context, url: Url, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized + Sync,
    {
        let response = self.do_json(ctx, Method::PUT, url, Some(body), READ).await?;
        decode_data(response).await
    }

    pub(crate) async fn remove(&self, ctx: &Context, url: Url) -> Result<()> {
        self.do_json::<()>(ctx, Method::DELETE, url, None, DELETE)
            .await?
            .drain()
            .await
    }
}
