//! The HTTP backend.
//!
//! [`HttpClient`] owns the configuration and the rate-limited transport and
//! exposes the request helpers the resource modules build on:
//!
//! - [`HttpClient::do_json`]: send, check status, return the open response.
//! - [`HttpClient::get_with_not_found`]: GET one record, mapping 404 to a
//!   caller-supplied error.
//! - [`decode`]: read a response body to the end and decode it.

use crate::config::{ClientConfig, Region};
use crate::context::Context;
use crate::envelope::{self, classify};
use crate::error::{Error, NetworkError, Result};
use crate::rate_limit::TokenBucket;
use crate::retry::RetryPolicy;
use crate::transport::{OpenResponse, Transport};
use bytes::Bytes;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;
use url::Url;

/// Statuses accepted when a caller passes an empty set.
pub const DEFAULT_ACCEPTED: &[u16] = &[200, 201];
/// Statuses accepted for reads and updates.
pub const READ: &[u16] = &[200];
/// Statuses accepted for creates.
pub const CREATE: &[u16] = &[200, 201];
/// Statuses accepted for deletes.
pub const DELETE: &[u16] = &[200, 204];
/// Statuses accepted for sends.
pub const SEND: &[u16] = &[200, 201, 202];

/// Request body that can be sent again on retry.
#[derive(Debug, Clone)]
pub(crate) enum Payload {
    Empty,
    Json(Bytes),
    Form { content_type: String, body: Bytes },
}

/// Client for the real API.
///
/// Cloning is cheap; clones share the connection pool and the rate limiter.
#[derive(Debug, Clone)]
pub struct HttpClient {
    config: ClientConfig,
    transport: Transport,
}

impl HttpClient {
    /// Creates a client from a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the configuration is invalid or the HTTP
    /// stack cannot be initialized.
    pub fn new(config: ClientConfig) -> Result<Self> {
        config.validate()?;
        let http = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| Error::Config(format!("cannot build HTTP client: {e}")))?;
        let transport = Transport::new(
            http,
            Arc::new(TokenBucket::new(config.rate_limit)),
            config.timeout,
        );
        Ok(Self { config, transport })
    }

    /// Creates a client with default settings for `api_key`.
    ///
    /// # Errors
    ///
    /// See [`HttpClient::new`].
    pub fn with_api_key(api_key: impl Into<String>) -> Result<Self> {
        Self::new(ClientConfig::new(api_key))
    }

    /// Current configuration.
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// The rate-limited transport.
    #[must_use]
    pub const fn transport(&self) -> &Transport {
        &self.transport
    }

    /// Selects the region. Clears any explicit base URL.
    pub fn set_region(&mut self, region: Region) {
        self.config.region = region;
        self.config.base_url = None;
    }

    /// Overrides the base URL.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the URL does not parse.
    pub fn set_base_url(&mut self, base_url: impl Into<String>) -> Result<()> {
        let previous = self.config.base_url.replace(base_url.into());
        if let Err(e) = self.config.validate() {
            self.config.base_url = previous;
            return Err(e);
        }
        Ok(())
    }

    /// Replaces the API key.
    pub fn set_api_key(&mut self, api_key: impl Into<String>) {
        self.config.api_key = api_key.into();
    }

    /// Replaces the application credentials.
    pub fn set_client_credentials(&mut self, id: impl Into<String>, secret: impl Into<String>) {
        self.config.client_id = Some(id.into());
        self.config.client_secret = Some(secret.into());
    }

    /// Sets the default request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] for a zero timeout.
    pub fn set_timeout(&mut self, timeout: Duration) -> Result<()> {
        if timeout.is_zero() {
            return Err(Error::Config("timeout must be greater than zero".into()));
        }
        self.config.timeout = timeout;
        self.transport.set_default_timeout(timeout);
        Ok(())
    }

    /// Replaces the rate limiter with a fresh bucket at `per_second`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] for a zero rate.
    pub fn set_rate_limit(&mut self, per_second: u32) -> Result<()> {
        if per_second == 0 {
            return Err(Error::Config("rate_limit must be at least 1".into()));
        }
        self.config.rate_limit = per_second;
        self.transport
            .set_limiter(Arc::new(TokenBucket::new(per_second)));
        Ok(())
    }

    /// Sets the retry policy.
    pub const fn set_retry_policy(&mut self, policy: RetryPolicy) {
        self.config.retry = policy;
    }

    /// Builds `<base>/<segments...>`, percent-encoding each segment.
    pub(crate) fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let base = self.config.base_url();
        let mut url =
            Url::parse(base).map_err(|e| Error::Config(format!("invalid base URL {base:?}: {e}")))?;
        url.path_segments_mut()
            .map_err(|()| Error::Config(format!("base URL {base:?} cannot carry a path")))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Like [`endpoint`](Self::endpoint) with query parameters taken from
    /// the fields of `query`. `null` fields are skipped.
    pub(crate) fn endpoint_with_query<Q: Serialize>(&self, segments: &[&str], query: &Q) -> Result<Url> {
        let mut url = self.endpoint(segments)?;
        let value = serde_json::to_value(query)
            .map_err(|e| Error::InvalidInput(format!("cannot encode query: {e}")))?;
        if let Value::Object(fields) = value {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in fields {
                match value {
                    Value::Null => {}
                    Value::String(s) => {
                        pairs.append_pair(&key, &s);
                    }
                    other => {
                        pairs.append_pair(&key, &other.to_string());
                    }
                }
            }
        }
        if url.query() == Some("") {
            url.set_query(None);
        }
        Ok(url)
    }

    fn request(&self, method: Method, url: Url, authorized: bool) -> RequestBuilder {
        let builder = self
            .transport
            .http()
            .request(method, url)
            .header(ACCEPT, "application/json");
        if authorized {
            builder.bearer_auth(&self.config.api_key)
        } else {
            builder
        }
    }

    /// Serializes `body` as JSON and sends it.
    ///
    /// Bodies passed with GET or HEAD are not sent. An empty `accepted` set
    /// means [`DEFAULT_ACCEPTED`]. On a status outside `accepted` the body is
    /// read, classified and only the error is returned.
    ///
    /// # Errors
    ///
    /// Any [`Error`] variant except `NotFound`, `Upload` and `Config`.
    pub async fn do_json<B>(
        &self,
        ctx: &Context,
        method: Method,
        url: Url,
        body: Option<&B>,
        accepted: &[u16],
    ) -> Result<OpenResponse>
    where
        B: Serialize + ?Sized + Sync,
    {
        let payload = match body {
            Some(body) if method != Method::GET && method != Method::HEAD => {
                let json = serde_json::to_vec(body)
                    .map_err(|e| Error::InvalidInput(format!("cannot encode request body: {e}")))?;
                Payload::Json(Bytes::from(json))
            }
            _ => Payload::Empty,
        };
        self.send(ctx, method, url, &payload, accepted, true).await
    }

    /// Sends a replayable payload, retrying per the configured policy.
    pub(crate) async fn send(
        &self,
        ctx: &Context,
        method: Method,
        url: Url,
        payload: &Payload,
        accepted: &[u16],
        authorized: bool,
    ) -> Result<OpenResponse> {
        let policy = self.config.retry;
        let mut retry = 0;
        loop {
            let mut builder = self.request(method.clone(), url.clone(), authorized);
            builder = match payload {
                Payload::Empty => builder,
                Payload::Json(json) => builder
                    .header(CONTENT_TYPE, "application/json")
                    .body(json.clone()),
                Payload::Form { content_type, body } => builder
                    .header(CONTENT_TYPE, content_type.as_str())
                    .body(body.clone()),
            };
            let request = builder.build().map_err(NetworkError::Transport)?;

            let outcome = match self.transport.execute(ctx, request).await {
                Ok(response) => check_status(response, accepted).await,
                Err(e) => Err(e),
            };

            match outcome {
                Err(e) if e.is_retryable() && retry < policy.max_retries => {
                    let delay = policy.delay_for(retry);
                    retry += 1;
                    warn!(
                        %method,
                        path = url.path(),
                        attempt = retry,
                        ?delay,
                        error = %e,
                        "retrying request"
                    );
                    let interrupted = tokio::select! {
                        biased;
                        _ = ctx.done() => true,
                        () = tokio::time::sleep(delay) => false,
                    };
                    if interrupted {
                        return Err(e);
                    }
                }
                other => return other,
            }
        }
    }

    /// GETs one record, returning `not_found` on HTTP 404.
    ///
    /// # Errors
    ///
    /// `not_found` for 404; otherwise as [`HttpClient::do_json`] plus
    /// [`Error::Decode`].
    pub async fn get_with_not_found<T: DeserializeOwned>(
        &self,
        ctx: &Context,
        url: Url,
        not_found: Error,
    ) -> Result<T> {
        match self.do_json::<()>(ctx, Method::GET, url, None, READ).await {
            Ok(response) => decode_data(response).await,
            Err(Error::Api(e)) if e.status == 404 => Err(not_found),
            Err(e) => Err(e),
        }
    }
}

/// Returns the response if its status is accepted, otherwise drains it and
/// returns the classified error.
pub(crate) async fn check_status(response: OpenResponse, accepted: &[u16]) -> Result<OpenResponse> {
    let accepted = if accepted.is_empty() {
        DEFAULT_ACCEPTED
    } else {
        accepted
    };
    let status = response.status().as_u16();
    if accepted.contains(&status) {
        return Ok(response);
    }
    let body = response.bytes().await?;
    Err(Error::Api(classify(status, &body)))
}

/// Reads the body to the end and decodes it as raw JSON.
///
/// # Errors
///
/// [`Error::Network`] if reading fails, [`Error::Decode`] if parsing fails.
pub async fn decode<T: DeserializeOwned>(response: OpenResponse) -> Result<T> {
    let body = response.bytes().await?;
    envelope::decode_json(&body)
}

/// Reads the body to the end and decodes `{"data": T}`.
///
/// # Errors
///
/// Same as [`decode`].
pub async fn decode_data<T: DeserializeOwned>(response: OpenResponse) -> Result<T> {
    let body = response.bytes().await?;
    envelope::decode_data(&body)
}

/// Reads the body to the end and decodes a list page.
///
/// # Errors
///
/// Same as [`decode`].
pub async fn decode_page<T: DeserializeOwned>(response: OpenResponse) -> Result<envelope::Page<T>> {
    let body = response.bytes().await?;
    envelope::decode_page(&body)
}

/// Returns `value` or an [`Error::InvalidInput`] naming `field` when empty.
pub(crate) fn require<'a>(field: &str, value: &'a str) -> Result<&'a str> {
    if value.trim().is_empty() {
        Err(Error::missing(field))
    } else {
        Ok(value)
    }
}
