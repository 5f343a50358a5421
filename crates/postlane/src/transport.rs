//! Rate-limited HTTP transport.
//!
//! Every request takes a token from the shared [`TokenBucket`] and then runs
//! under a bounded deadline: the context's own deadline when it has one,
//! otherwise `now + default_timeout`. The returned [`OpenResponse`] keeps that
//! deadline so reading the body is bounded too.

use crate::context::Context;
use crate::error::{Error, NetworkError, Result};
use crate::rate_limit::TokenBucket;
use bytes::Bytes;
use reqwest::header::HeaderMap;
use reqwest::{Request, StatusCode};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

/// Shared HTTP connection pool plus the request rate limiter.
#[derive(Debug, Clone)]
pub struct Transport {
    http: reqwest::Client,
    limiter: Arc<TokenBucket>,
    default_timeout: Duration,
}

impl Transport {
    /// Creates a transport.
    #[must_use]
    pub fn new(http: reqwest::Client, limiter: Arc<TokenBucket>, default_timeout: Duration) -> Self {
        Self {
            http,
            limiter,
            default_timeout,
        }
    }

    /// The underlying HTTP client, used to build requests.
    #[must_use]
    pub const fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// The shared limiter.
    #[must_use]
    pub fn limiter(&self) -> &Arc<TokenBucket> {
        &self.limiter
    }

    /// Timeout applied when a context has no deadline.
    #[must_use]
    pub const fn default_timeout(&self) -> Duration {
        self.default_timeout
    }

    pub(crate) fn set_limiter(&mut self, limiter: Arc<TokenBucket>) {
        self.limiter = limiter;
    }

    pub(crate) const fn set_default_timeout(&mut self, timeout: Duration) {
        self.default_timeout = timeout;
    }

    /// Deadline a call under `ctx` would run with if started now.
    #[must_use]
    pub fn deadline_for(&self, ctx: &Context) -> Instant {
        ctx.deadline()
            .unwrap_or_else(|| Instant::now() + self.default_timeout)
    }

    /// Throttles, then sends `request` under the effective deadline.
    ///
    /// # Errors
    ///
    /// - [`Error::RateLimitAborted`] if `ctx` ends while waiting for a token.
    /// - [`Error::Network`] for transport failures, timeouts and cancellation.
    pub async fn execute(&self, ctx: &Context, request: Request) -> Result<OpenResponse> {
        self.limiter
            .acquire_with(ctx)
            .await
            .map_err(Error::RateLimitAborted)?;

        let started = Instant::now();
        let deadline = self.deadline_for(ctx);
        let budget = deadline.saturating_duration_since(started);
        let method = request.method().clone();
        let path = request.url().path().to_owned();

        let response = bounded(ctx, deadline, budget, self.http.execute(request))
            .await?
            .map_err(NetworkError::Transport)?;

        debug!(
            %method,
            path = %path,
            status = response.status().as_u16(),
            elapsed = ?started.elapsed(),
            "request completed"
        );

        Ok(OpenResponse {
            response,
            ctx: ctx.clone(),
            deadline,
            budget,
        })
    }
}

/// Runs `fut` until it completes, `ctx` is cancelled or `deadline` passes.
pub(crate) async fn bounded<F: Future>(
    ctx: &Context,
    deadline: Instant,
    budget: Duration,
    fut: F,
) -> std::result::Result<F::Output, NetworkError> {
    tokio::select! {
        biased;
        () = ctx.cancellation_token().cancelled() => Err(NetworkError::Cancelled),
        out = tokio::time::timeout_at(deadline, fut) => out.map_err(|_| NetworkError::Timeout(budget)),
    }
}

/// A response whose body has not been read yet.
///
/// Consume it with [`OpenResponse::bytes`] or [`OpenResponse::drain`]; both
/// read the body to the end so the connection can be reused.
#[derive(Debug)]
pub struct OpenResponse {
    response: reqwest::Response,
    ctx: Context,
    deadline: Instant,
    budget: Duration,
}

impl OpenResponse {
    /// HTTP status.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.response.status()
    }

    /// Response headers.
    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        self.response.headers()
    }

    /// Deadline the request ran under.
    #[must_use]
    pub const fn deadline(&self) -> Instant {
        self.deadline
    }

    /// Reads the whole body within the call's deadline.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Network`] if reading fails, times out or is cancelled.
    pub async fn bytes(self) -> Result<Bytes> {
        let Self {
            response,
            ctx,
            deadline,
            budget,
        } = self;
        let body = bounded(&ctx, deadline, budget, response.bytes())
            .await?
            .map_err(NetworkError::Transport)?;
        Ok(body)
    }

    /// Reads and discards the body.
    ///
    /// # Errors
    ///
    /// Same as [`OpenResponse::bytes`].
    pub async fn drain(self) -> Result<()> {
        self.bytes().await.map(|_| ())
    }
}
