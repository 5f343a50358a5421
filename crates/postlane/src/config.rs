//! Client configuration.

use crate::error::{Error, Result};
use crate::retry::RetryPolicy;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

/// US API base URL.
pub const US_BASE_URL: &str = "https://api.us.postlane.dev";

/// EU API base URL.
pub const EU_BASE_URL: &str = "https://api.eu.postlane.dev";

/// Default request timeout when the caller's context has no deadline.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(90);

/// Default sustained request rate (requests per second).
pub const DEFAULT_RATE_LIMIT: u32 = 10;

/// Data region hosting the account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Region {
    /// United States.
    #[default]
    Us,
    /// European Union.
    Eu,
}

impl Region {
    /// Parses a region name. `"eu"` selects the EU; anything else is US.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        if s.trim().eq_ignore_ascii_case("eu") {
            Self::Eu
        } else {
            Self::Us
        }
    }

    /// Returns the fixed base URL for this region.
    #[must_use]
    pub const fn base_url(self) -> &'static str {
        match self {
            Self::Us => US_BASE_URL,
            Self::Eu => EU_BASE_URL,
        }
    }
}

/// Configuration owned by one client instance.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Region selecting the base URL.
    pub region: Region,
    /// Explicit base URL, overriding the region.
    pub base_url: Option<String>,
    /// API key sent as the bearer token.
    pub api_key: String,
    /// Application client id.
    pub client_id: Option<String>,
    /// Application client secret.
    pub client_secret: Option<String>,
    /// Timeout applied when the caller's context has no deadline.
    pub timeout: Duration,
    /// Sustained requests per second; bursts up to twice this.
    pub rate_limit: u32,
    /// Retry behavior for replayable requests.
    pub retry: RetryPolicy,
    /// `User-Agent` header value.
    pub user_agent: String,
}

impl ClientConfig {
    /// Creates a configuration for the given API key with defaults.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::builder(api_key).build()
    }

    /// Creates a configuration builder.
    #[must_use]
    pub fn builder(api_key: impl Into<String>) -> ClientConfigBuilder {
        ClientConfigBuilder::new(api_key)
    }

    /// Effective base URL without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .unwrap_or_else(|| self.region.base_url())
            .trim_end_matches('/')
    }

    /// Checks the values a client cannot run without.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] describing the first problem found.
    pub fn validate(&self) -> Result<()> {
        if self.timeout.is_zero() {
            return Err(Error::Config("timeout must be greater than zero".into()));
        }
        if self.rate_limit == 0 {
            return Err(Error::Config("rate_limit must be at least 1".into()));
        }
        let base = self.base_url();
        let url = Url::parse(base)
            .map_err(|e| Error::Config(format!("invalid base URL {base:?}: {e}")))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::Config(format!("unsupported URL scheme {:?}", url.scheme())));
        }
        Ok(())
    }

    /// Reads configuration from `POSTLANE_*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if `POSTLANE_API_KEY` is unset or a numeric variable
    /// does not parse.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns an error if `POSTLANE_API_KEY` is missing or a numeric value
    /// does not parse.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup("POSTLANE_API_KEY")
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| Error::Config("POSTLANE_API_KEY is not set".into()))?;

        let file = ConfigFile {
            api_key,
            region: lookup("POSTLANE_REGION"),
            base_url: lookup("POSTLANE_BASE_URL"),
            client_id: lookup("POSTLANE_CLIENT_ID"),
            client_secret: lookup("POSTLANE_CLIENT_SECRET"),
            timeout_secs: lookup("POSTLANE_TIMEOUT_SECS")
                .map(|v| parse_number("POSTLANE_TIMEOUT_SECS", &v))
                .transpose()?,
            rate_limit: lookup("POSTLANE_RATE_LIMIT")
                .map(|v| parse_number("POSTLANE_RATE_LIMIT", &v))
                .transpose()?
                .map(|n| u32::try_from(n).unwrap_or(u32::MAX)),
            max_retries: lookup("POSTLANE_MAX_RETRIES")
                .map(|v| parse_number("POSTLANE_MAX_RETRIES", &v))
                .transpose()?
                .map(|n| u32::try_from(n).unwrap_or(u32::MAX)),
        };
        Ok(file.into_config())
    }

    /// Loads configuration from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("cannot read {}: {e}", path.display())))?;
        let file: ConfigFile = serde_json::from_str(&raw)
            .map_err(|e| Error::Config(format!("cannot parse {}: {e}", path.display())))?;
        Ok(file.into_config())
    }

    /// Default config file location (`<config dir>/postlane/config.json`).
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("postlane").join("config.json"))
    }
}

fn parse_number(key: &str, value: &str) -> Result<u64> {
    value
        .trim()
        .parse()
        .map_err(|_| Error::Config(format!("{key} must be a whole number, got {value:?}")))
}

/// On-disk configuration shape.
#[derive(Debug, Deserialize)]
struct ConfigFile {
    api_key: String,
    #[serde(default)]
    region: Option<String>,
    #[serde(default)]
    base_url: Option<String>,
    #[serde(default)]
    client_id: Option<String>,
    #[serde(default)]
    client_secret: Option<String>,
    #[serde(default)]
    timeout_secs: Option<u64>,
    #[serde(default)]
    rate_limit: Option<u32>,
    #[serde(default)]
    max_retries: Option<u32>,
}

impl ConfigFile {
    fn into_config(self) -> ClientConfig {
        let mut builder = ClientConfig::builder(self.api_key);
        if let Some(region) = self.region {
            builder = builder.region(Region::parse(&region));
        }
        if let Some(url) = self.base_url.filter(|u| !u.trim().is_empty()) {
            builder = builder.base_url(url);
        }
        if let (Some(id), Some(secret)) = (self.client_id.clone(), self.client_secret.clone()) {
            builder = builder.client_credentials(id, secret);
        } else if let Some(id) = self.client_id {
            builder = builder.client_id(id);
        }
        if let Some(secs) = self.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        if let Some(rate) = self.rate_limit {
            builder = builder.rate_limit(rate);
        }
        if let Some(retries) = self.max_retries {
            builder = builder.retry(RetryPolicy::new(retries));
        }
        builder.build()
    }
}

/// Builder for [`ClientConfig`].
#[derive(Debug, Clone)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    /// Creates a new builder with the given API key.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            config: ClientConfig {
                region: Region::Us,
                base_url: None,
                api_key: api_key.into(),
                client_id: None,
                client_secret: None,
                timeout: DEFAULT_TIMEOUT,
                rate_limit: DEFAULT_RATE_LIMIT,
                retry: RetryPolicy::disabled(),
                user_agent: format!("postlane-rust/{}", env!("CARGO_PKG_VERSION")),
            },
        }
    }

    /// Sets the region.
    #[must_use]
    pub const fn region(mut self, region: Region) -> Self {
        self.config.region = region;
        self
    }

    /// Overrides the base URL (tests, proxies).
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = Some(url.into());
        self
    }

    /// Sets the application client id.
    #[must_use]
    pub fn client_id(mut self, id: impl Into<String>) -> Self {
        self.config.client_id = Some(id.into());
        self
    }

    /// Sets the application client id and secret.
    #[must_use]
    pub fn client_credentials(mut self, id: impl Into<String>, secret: impl Into<String>) -> Self {
        self.config.client_id = Some(id.into());
        self.config.client_secret = Some(secret.into());
        self
    }

    /// Sets the default request timeout.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Sets the sustained request rate.
    #[must_use]
    pub const fn rate_limit(mut self, per_second: u32) -> Self {
        self.config.rate_limit = per_second;
        self
    }

    /// Sets the retry policy.
    #[must_use]
    pub const fn retry(mut self, policy: RetryPolicy) -> Self {
        self.config.retry = policy;
        self
    }

    /// Sets the `User-Agent` header.
    #[must_use]
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    /// Builds the configuration.
    #[must_use]
    pub fn build(self) -> ClientConfig {
        self.config
    }
}
