use crate::api::AdminApi;
use crate::client::{require, HttpClient};
use crate::context::Context;
use crate::envelope::Page;
use crate::error::{Error, Result};
use crate::models::{Application, Connector, ConnectorRequest, Grant, GrantQuery, Webhook, WebhookRequest};
use async_trait::async_trait;

#[async_trait]
impl AdminApi for HttpClient {
    async fn list_grants(&self, ctx: &Context, query: &GrantQuery) -> Result<Page<Grant>> {
        let url = self.endpoint_with_query(&["v3", "grants"], query)?;
        self.fetch_page(ctx, url).await
    }

    async fn get_grant(&self, ctx: &Context, grant_id: &str) -> Result<Grant> {
        let url = self.grant_url(grant_id, &[])?;
        self.get_with_not_found(ctx, url, Error::not_found("grant", grant_id))
            .await
    }

    async fn revoke_grant(&self, ctx: &Context, grant_id: &str) -> Result<()> {
        let url = self.grant_url(grant_id, &[])?;
        self.remove(ctx, url).await
    }

    async fn get_application(&self, ctx: &Context) -> Result<Application> {
        let url = self.endpoint(&["v3", "applications"])?;
        self.get_with_not_found(ctx, url, Error::not_found("application", "current"))
            .await
    }

    async fn list_connectors(&self, ctx: &Context) -> Result<Vec<Connector>> {
        let url = self.endpoint(&["v3", "connectors"])?;
        self.fetch_all(ctx, url).await
    }

    async fn get_connector(&self, ctx: &Context, provider: &str) -> Result<Connector> {
        let provider = require("provider", provider)?;
        let url = self.endpoint(&["v3", "connectors", provider])?;
        self.get_with_not_found(ctx, url, Error::not_found("connector", provider))
            .await
    }

    async fn create_connector(&self, ctx: &Context, request: &ConnectorRequest) -> Result<Connector> {
        require("provider", &request.provider)?;
        let url = self.endpoint(&["v3", "connectors"])?;
        self.create(ctx, url, request).await
    }

    async fn delete_connector(&self, ctx: &Context, provider: &str) -> Result<()> {
        let provider = require("provider", provider)?;
        let url = self.endpoint(&["v3", "connectors", provider])?;
        self.remove(ctx, url).await
    }

    async fn list_webhooks(&self, ctx: &Context) -> Result<Vec<Webhook>> {
        let url = self.endpoint(&["v3", "webhooks"])?;
        self.fetch_all(ctx, url).await
    }

    async fn get_webhook(&self, ctx: &Context, webhook_id: &str) -> Result<Webhook> {
        let webhook_id = require("webhook_id", webhook_id)?;
        let url = self.endpoint(&["v3", "webhooks", webhook_id])?;
        self.get_with_not_found(ctx, url, Error::not_found("webhook", webhook_id))
            .await
    }

    async fn create_webhook(&self, ctx: &Context, request: &WebhookRequest) -> Result<Webhook> {
        let url = self.endpoint(&["v3", "webhooks"])?;
        self.create(ctx, url, request).await
    }

    async fn update_webhook(&self, ctx: &Context, webhook_id: &str, request: &WebhookRequest) -> Result<Webhook> {
        let webhook_id = require("webhook_id", webhook_id)?;
        let url = self.endpoint(&["v3", "webhooks", webhook_id])?;
        self.update(ctx, url, request).await
    }

    async fn delete_webhook(&self, ctx: &Context, webhook_id: &str) -> Result<()> {
        let webhook_id = require("webhook_id", webhook_id)?;
        let url = self.endpoint(&["v3", "webhooks", webhook_id])?;
        self.remove(ctx, url).await
    }
}
