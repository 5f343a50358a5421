//! Hosted-auth token exchange.

use serde::{Deserialize, Serialize};

/// Exchange of an authorization code for a grant.
///
/// `client_id` and `client_secret` are filled from the client
/// configuration when left empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CodeExchangeRequest {
    /// Code from the redirect.
    pub code: String,
    /// Redirect URI used when the code was issued.
    pub redirect_uri: String,
    /// Application client id.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub client_id: String,
    /// Application client secret.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_secret: Option<String>,
    /// PKCE verifier, when the code was issued with a challenge.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code_verifier: Option<String>,
    /// Always `authorization_code`.
    pub grant_type: String,
}

impl CodeExchangeRequest {
    /// Creates an exchange request.
    #[must_use]
    pub fn new(code: impl Into<String>, redirect_uri: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            redirect_uri: redirect_uri.into(),
            grant_type: "authorization_code".to_string(),
            ..Self::default()
        }
    }

    /// Sets the PKCE verifier.
    #[must_use]
    pub fn with_code_verifier(mut self, verifier: impl Into<String>) -> Self {
        self.code_verifier = Some(verifier.into());
        self
    }
}

/// Token endpoint response. Not wrapped in the data envelope.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenResponse {
    /// Access token.
    #[serde(default)]
    pub access_token: String,
    /// Refresh token, when offline access was granted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    /// OpenID Connect ID token.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_token: Option<String>,
    /// Usually `Bearer`.
    #[serde(default)]
    pub token_type: String,
    /// Lifetime in seconds.
    #[serde(default)]
    pub expires_in: u64,
    /// Space-separated scopes.
    #[serde(default)]
    pub scope: String,
    /// Grant created or refreshed by the exchange.
    #[serde(default)]
    pub grant_id: String,
    /// Account address.
    #[serde(default)]
    pub email: String,
    /// Provider.
    #[serde(default)]
    pub provider: String,
}
