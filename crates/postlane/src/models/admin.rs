//! Application-level records: grants, connectors, webhooks.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// An authorization linking the application to one user's account.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grant {
    /// Grant id.
    #[serde(default)]
    pub id: String,
    /// Provider, e.g. `google`.
    #[serde(default)]
    pub provider: String,
    /// `valid` or `invalid`.
    #[serde(default)]
    pub grant_status: String,
    /// Account address.
    #[serde(default)]
    pub email: String,
    /// Granted scopes.
    #[serde(default)]
    pub scope: Vec<String>,
    /// Creation time.
    #[serde(
        default,
        with = "chrono::serde::ts_seconds_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<DateTime<Utc>>,
    /// Last update time.
    #[serde(
        default,
        with = "chrono::serde::ts_seconds_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Grant {
    /// Returns true while the grant can be used.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.grant_status == "valid"
    }
}

/// Filters for listing grants.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GrantQuery {
    /// Page size.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    /// Cursor from a previous page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_token: Option<String>,
    /// Provider filter.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    /// Address filter.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Application details.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Application {
    /// Application id.
    #[serde(default)]
    pub application_id: String,
    /// Owning organization.
    #[serde(default)]
    pub organization_id: String,
    /// `us` or `eu`.
    #[serde(default)]
    pub region: String,
    /// `production` or `sandbox`.
    #[serde(default)]
    pub environment: String,
    /// Hosted-auth branding.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branding: Option<Branding>,
}

/// Hosted-auth branding.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Branding {
    /// Product name.
    #[serde(default)]
    pub name: String,
    /// Logo.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<String>,
    /// Product site.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website_url: Option<String>,
}

/// Provider connector configuration. Identified by provider name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Connector {
    /// Provider, e.g. `microsoft`.
    #[serde(default)]
    pub provider: String,
    /// Provider-specific settings.
    #[serde(default)]
    pub settings: Value,
    /// Default scopes.
    #[serde(default)]
    pub scope: Vec<String>,
}

/// Fields for creating a connector.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ConnectorRequest {
    /// Provider.
    pub provider: String,
    /// Provider-specific settings, e.g. OAuth client credentials.
    #[serde(skip_serializing_if = "Value::is_null")]
    pub settings: Value,
    /// Default scopes.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub scope: Vec<String>,
}

/// A notification subscription.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Webhook {
    /// Webhook id.
    #[serde(default)]
    pub id: String,
    /// Free-form description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Subscribed triggers, e.g. `message.created`.
    #[serde(default)]
    pub trigger_types: Vec<String>,
    /// Delivery URL.
    #[serde(default)]
    pub webhook_url: String,
    /// `active`, `failing`, `failed` or `pause`.
    #[serde(default)]
    pub status: String,
    /// Addresses notified about delivery failures.
    #[serde(default)]
    pub notification_email_addresses: Vec<String>,
    /// Signing secret; only returned on creation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub webhook_secret: Option<String>,
}

super::common::identified!(Grant, Webhook);

/// Fields for creating or updating a webhook.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WebhookRequest {
    /// Free-form description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Subscribed triggers.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub trigger_types: Vec<String>,
    /// Delivery URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub webhook_url: Option<String>,
    /// Addresses notified about delivery failures.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub notification_email_addresses: Vec<String>,
}
