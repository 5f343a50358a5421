use crate::api::MessagesApi;
use crate::client::{require, HttpClient, SEND};
use crate::context::Context;
use crate::envelope::{decode_data, Page};
use crate::error::{Error, Result};
use crate::models::{
    Message, MessageQuery, ScheduledMessage, SendMessageRequest, StreamedAttachment,
    UpdateMessageRequest,
};
use async_trait::async_trait;
use reqwest::Method;

#[async_trait]
impl MessagesApi for HttpClient {
    async fn list_messages(&self, ctx: &Context, grant_id: &str, query: &MessageQuery) -> Result<Page<Message>> {
        let url = self.grant_url_with_query(grant_id, &["messages"], query)?;
        self.fetch_page(ctx, url).await
    }

    async fn get_message(&self, ctx: &Context, grant_id: &str, message_id: &str) -> Result<Message> {
        let message_id = require("message_id", message_id)?;
        let url = self.grant_url(grant_id, &["messages", message_id])?;
        self.get_with_not_found(ctx, url, Error::not_found("message", message_id))
            .await
    }

    async fn update_message(
        &self,
        ctx: &Context,
        grant_id: &str,
        message_id: &str,
        request: &UpdateMessageRequest,
    ) -> Result<Message> {
        let message_id = require("message_id", message_id)?;
        let url = self.grant_url(grant_id, &["messages", message_id])?;
        self.update(ctx, url, request).await
    }

    async fn delete_message(&self, ctx: &Context, grant_id: &str, message_id: &str) -> Result<()> {
        let message_id = require("message_id", message_id)?;
        let url = self.grant_url(grant_id, &["messages", message_id])?;
        self.remove(ctx, url).await
    }

    async fn send_message(&self, ctx: &Context, grant_id: &str, request: &SendMessageRequest) -> Result<Message> {
        let url = self.grant_url(grant_id, &["messages", "send"])?;
        let body = self
            .send_with_attachments(ctx, Method::POST, url, request, &request.attachments, SEND)
            .await?;
        decode_data(&body)
    }

    async fn send_message_streamed(
        &self,
        ctx: &Context,
        grant_id: &str,
        request: &SendMessageRequest,
        attachment: StreamedAttachment,
    ) -> Result<Message> {
        let url = self.grant_url(grant_id, &["messages", "send"])?;
        let body = self
            .send_streamed(ctx, Method::POST, url, request, attachment, SEND)
            .await?;
        decode_data(&body)
    }

    async fn send_domain_message(&self, ctx: &Context, domain: &str, request: &SendMessageRequest) -> Result<Message> {
        let domain = require("domain", domain)?;
        let url = self.endpoint(&["v3", "domains", domain, "messages", "send"])?;
        let body = self
            .send_with_attachments(ctx, Method::POST, url, request, &request.attachments, SEND)
            .await?;
        decode_data(&body)
    }

    async fn list_scheduled_messages(&self, ctx: &Context, grant_id: &str) -> Result<Vec<ScheduledMessage>> {
        let url = self.grant_url(grant_id, &["messages", "schedules"])?;
        self.fetch_all(ctx, url).await
    }

    async fn cancel_scheduled_message(&self, ctx: &Context, grant_id: &str, schedule_id: &str) -> Result<()> {
        let schedule_id = require("schedule_id", schedule_id)?;
        let url = self.grant_url(grant_id, &["messages", "schedules", schedule_id])?;
        self.remove(ctx, url).await
    }
}
