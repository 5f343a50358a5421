use crate::api::AuthApi;
use crate::client::{decode, require, HttpClient, Payload, CREATE};
use crate::context::Context;
use crate::error::{Error, Result};
use crate::models::{CodeExchangeRequest, TokenResponse};
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Method;

#[async_trait]
impl AuthApi for HttpClient {
    async fn exchange_code(&self, ctx: &Context, request: &CodeExchangeRequest) -> Result<TokenResponse> {
        require("code", &request.code)?;
        require("redirect_uri", &request.redirect_uri)?;

        let mut request = request.clone();
        if request.client_id.is_empty() {
            request.client_id = self.config().client_id.clone().unwrap_or_default();
        }
        if request.client_secret.is_none() {
            request.client_secret.clone_from(&self.config().client_secret);
        }
        require("client_id", &request.client_id)?;

        let json = serde_json::to_vec(&request)
            .map_err(|e| Error::InvalidInput(format!("cannot encode token request: {e}")))?;
        let url = self.endpoint(&["v3", "connect", "token"])?;
        let response = self
            .send(ctx, Method::POST, url, &Payload::Json(Bytes::from(json)), CREATE, false)
            .await?;
        decode(response).await
    }
}
