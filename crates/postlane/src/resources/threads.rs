use crate::api::ThreadsApi;
use crate::client::{require, HttpClient};
use crate::context::Context;
use crate::envelope::Page;
use crate::error::{Error, Result};
use crate::models::{Thread, ThreadQuery, UpdateThreadRequest};
use async_trait::async_trait;

#[async_trait]
impl ThreadsApi for HttpClient {
    async fn list_threads(&self, ctx: &Context, grant_id: &str, query: &ThreadQuery) -> Result<Page<Thread>> {
        let url = self.grant_url_with_query(grant_id, &["threads"], query)?;
        self.fetch_page(ctx, url).await
    }

    async fn get_thread(&self, ctx: &Context, grant_id: &str, thread_id: &str) -> Result<Thread> {
        let thread_id = require("thread_id", thread_id)?;
        let url = self.grant_url(grant_id, &["threads", thread_id])?;
        self.get_with_not_found(ctx, url, Error::not_found("thread", thread_id))
            .await
    }

    async fn update_thread(
        &self,
        ctx: &Context,
        grant_id: &str,
        thread_id: &str,
        request: &UpdateThreadRequest,
    ) -> Result<Thread> {
        let thread_id = require("thread_id", thread_id)?;
        let url = self.grant_url(grant_id, &["threads", thread_id])?;
        self.update(ctx, url, request).await
    }

    async fn delete_thread(&self, ctx: &Context, grant_id: &str, thread_id: &str) -> Result<()> {
        let thread_id = require("thread_id", thread_id)?;
        let url = self.grant_url(grant_id, &["threads", thread_id])?;
        self.remove(ctx, url).await
    }
}
