use crate::api::ContactsApi;
use crate::client::{require, HttpClient};
use crate::context::Context;
use crate::envelope::Page;
use crate::error::{Error, Result};
use crate::models::{Contact, ContactGroup, ContactQuery, ContactRequest};
use async_trait::async_trait;

#[async_trait]
impl ContactsApi for HttpClient {
    async fn list_contacts(&self, ctx: &Context, grant_id: &str, query: &ContactQuery) -> Result<Page<Contact>> {
        let url = self.grant_url_with_query(grant_id, &["contacts"], query)?;
        self.fetch_page(ctx, url).await
    }

    async fn get_contact(&self, ctx: &Context, grant_id: &str, contact_id: &str) -> Result<Contact> {
        let contact_id = require("contact_id", contact_id)?;
        let url = self.grant_url(grant_id, &["contacts", contact_id])?;
        self.get_with_not_found(ctx, url, Error::not_found("contact", contact_id))
            .await
    }

    async fn create_contact(&self, ctx: &Context, grant_id: &str, request: &ContactRequest) -> Result<Contact> {
        let url = self.grant_url(grant_id, &["contacts"])?;
        self.create(ctx, url, request).await
    }

    async fn update_contact(
        &self,
        ctx: &Context,
        grant_id: &str,
        contact_id: &str,
        request: &ContactRequest,
    ) -> Result<Contact> {
        let contact_id = require("contact_id", contact_id)?;
        let url = self.grant_url(grant_id, &["contacts", contact_id])?;
        self.update(ctx, url, request).await
    }

    async fn delete_contact(&self, ctx: &Context, grant_id: &str, contact_id: &str) -> Result<()> {
        let contact_id = require("contact_id", contact_id)?;
        let url = self.grant_url(grant_id, &["contacts", contact_id])?;
        self.remove(ctx, url).await
    }

    async fn list_contact_groups(&self, ctx: &Context, grant_id: &str) -> Result<Vec<ContactGroup>> {
        let url = self.grant_url(grant_id, &["contacts", "groups"])?;
        self.fetch_all(ctx, url).await
    }
}
