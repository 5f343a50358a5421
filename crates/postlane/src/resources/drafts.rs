use crate::api::DraftsApi;
use crate::client::{require, HttpClient, CREATE, READ, SEND};
use crate::context::Context;
use crate::envelope::{decode_data, Page};
use crate::error::{Error, Result};
use crate::models::{Draft, DraftRequest, ListQuery, Message};
use async_trait::async_trait;
use reqwest::Method;

#[async_trait]
impl DraftsApi for HttpClient {
    async fn list_drafts(&self, ctx: &Context, grant_id: &str, query: &ListQuery) -> Result<Page<Draft>> {
        let url = self.grant_url_with_query(grant_id, &["drafts"], query)?;
        self.fetch_page(ctx, url).await
    }

    async fn get_draft(&self, ctx: &Context, grant_id: &str, draft_id: &str) -> Result<Draft> {
        let draft_id = require("draft_id", draft_id)?;
        let url = self.grant_url(grant_id, &["drafts", draft_id])?;
        self.get_with_not_found(ctx, url, Error::not_found("draft", draft_id))
            .await
    }

    async fn create_draft(&self, ctx: &Context, grant_id: &str, request: &DraftRequest) -> Result<Draft> {
        let url = self.grant_url(grant_id, &["drafts"])?;
        let body = self
            .send_with_attachments(ctx, Method::POST, url, request, &request.attachments, CREATE)
            .await?;
        decode_data(&body)
    }

    async fn update_draft(
        &self,
        ctx: &Context,
        grant_id: &str,
        draft_id: &str,
        request: &DraftRequest,
    ) -> Result<Draft> {
        let draft_id = require("draft_id", draft_id)?;
        let url = self.grant_url(grant_id, &["drafts", draft_id])?;
        let body = self
            .send_with_attachments(ctx, Method::PUT, url, request, &request.attachments, READ)
            .await?;
        decode_data(&body)
    }

    async fn delete_draft(&self, ctx: &Context, grant_id: &str, draft_id: &str) -> Result<()> {
        let draft_id = require("draft_id", draft_id)?;
        let url = self.grant_url(grant_id, &["drafts", draft_id])?;
        self.remove(ctx, url).await
    }

    async fn send_draft(&self, ctx: &Context, grant_id: &str, draft_id: &str) -> Result<Message> {
        let draft_id = require("draft_id", draft_id)?;
        let url = self.grant_url(grant_id, &["drafts", draft_id])?;
        let response = self.do_json::<()>(ctx, Method::POST, url, None, SEND).await?;
        decode_data(&response.bytes().await?)
    }
}
