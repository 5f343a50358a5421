use crate::api::AttachmentsApi;
use crate::client::{require, HttpClient, READ};
use crate::context::Context;
use crate::error::{Error, Result};
use crate::models::AttachmentInfo;
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Method;
use serde::Serialize;

#[derive(Serialize)]
struct AttachmentQuery<'a> {
    message_id: &'a str,
}

#[async_trait]
impl AttachmentsApi for HttpClient {
    async fn get_attachment(
        &self,
        ctx: &Context,
        grant_id: &str,
        message_id: &str,
        attachment_id: &str,
    ) -> Result<AttachmentInfo> {
        let message_id = require("message_id", message_id)?;
        let attachment_id = require("attachment_id", attachment_id)?;
        let url = self.grant_url_with_query(
            grant_id,
            &["attachments", attachment_id],
            &AttachmentQuery { message_id },
        )?;
        self.get_with_not_found(ctx, url, Error::not_found("attachment", attachment_id))
            .await
    }

    async fn download_attachment(
        &self,
        ctx: &Context,
        grant_id: &str,
        message_id: &str,
        attachment_id: &str,
    ) -> Result<Bytes> {
        let message_id = require("message_id", message_id)?;
        let attachment_id = require("attachment_id", attachment_id)?;
        let url = self.grant_url_with_query(
            grant_id,
            &["attachments", attachment_id, "download"],
            &AttachmentQuery { message_id },
        )?;
        match self.do_json::<()>(ctx, Method::GET, url, None, READ).await {
            Ok(response) => response.bytes().await,
            Err(e) if e.status() == Some(404) => Err(Error::not_found("attachment", attachment_id)),
            Err(e) => Err(e),
        }
    }
}
