//! Relay transport.
//!
//! Provider calls are wrapped in an envelope and posted to a relay that
//! performs the real request server-side. The relay is authenticated with
//! its own token, never with the provider's API key.

use crate::error::{GenStudioError, Result};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// Relay endpoint used when none is configured.
pub const DEFAULT_RELAY_URL: &str = "https://proxy.chatandbuild.com/proxy";

/// Environment variable holding the relay token.
pub const RELAY_TOKEN_ENV: &str = "PROXY_SERVER_ACCESS_TOKEN";

/// Environment variable overriding the relay endpoint.
pub const RELAY_URL_ENV: &str = "PROXY_SERVER_URL";

/// The outbound request the relay should perform.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RelayRequest {
    /// Target URL of the provider.
    pub url: String,
    /// HTTP method, e.g. "POST".
    pub method: String,
    /// Headers forwarded to the provider.
    pub headers: BTreeMap<String, String>,
    /// JSON body forwarded to the provider.
    pub body: Value,
}

impl RelayRequest {
    /// Creates a POST envelope with a JSON body.
    pub fn post(url: impl Into<String>, body: Value) -> Self {
        Self {
            url: url.into(),
            method: "POST".to_string(),
            headers: BTreeMap::new(),
            body,
        }
    }

    /// Adds a header forwarded to the provider.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }
}

/// Builder for [`RelayClient`].
#[derive(Debug, Clone, Default)]
pub struct RelayClientBuilder {
    endpoint: Option<String>,
    token: Option<String>,
}

impl RelayClientBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the relay endpoint. Falls back to `PROXY_SERVER_URL`, then
    /// [`DEFAULT_RELAY_URL`].
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Sets the relay token. Falls back to `PROXY_SERVER_ACCESS_TOKEN`.
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Builds the client. A missing token is reported on first use.
    pub fn build(self) -> RelayClient {
        let endpoint = self
            .endpoint
            .or_else(|| std::env::var(RELAY_URL_ENV).ok())
            .unwrap_or_else(|| DEFAULT_RELAY_URL.to_string());
        let token = self
            .token
            .or_else(|| std::env::var(RELAY_TOKEN_ENV).ok())
            .filter(|t| !t.is_empty());

        RelayClient {
            client: reqwest::Client::new(),
            endpoint,
            token,
        }
    }
}

/// Client for the relay endpoint.
#[derive(Clone)]
pub struct RelayClient {
    client: reqwest::Client,
    endpoint: String,
    token: Option<String>,
}

impl std::fmt::Debug for RelayClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RelayClient")
            .field("endpoint", &self.endpoint)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl RelayClient {
    /// Creates a new `RelayClientBuilder`.
    pub fn builder() -> RelayClientBuilder {
        RelayClientBuilder::new()
    }

    /// Builds a client from the environment alone.
    pub fn from_env() -> Self {
        RelayClientBuilder::new().build()
    }

    /// Returns the relay endpoint.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Fails with a configuration error when no token is available.
    pub fn check_configured(&self) -> Result<()> {
        self.token().map(|_| ())
    }

    fn token(&self) -> Result<&str> {
        self.token.as_deref().ok_or_else(|| {
            GenStudioError::Config(format!(
                "relay token is not configured (set {})",
                RELAY_TOKEN_ENV
            ))
        })
    }

    /// Sends the envelope and returns the raw response body.
    ///
    /// Non-2xx statuses are definitive failures; there is no retry.
    pub async fn relay(&self, request: &RelayRequest) -> Result<String> {
        let token = self.token()?;

        tracing::debug!(
            target_url = %request.url,
            method = %request.method,
            relay = %self.endpoint,
            "relaying request"
        );

        let response = self
            .client
            .post(&self.endpoint)
            .header("Authorization", format!("Bearer {}", token))
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        tracing::debug!(status = status.as_u16(), "relay response");

        if !status.is_success() {
            return Err(GenStudioError::from_response(
                status.as_u16(),
                status.canonical_reason(),
                &text,
            ));
        }

        Ok(text)
    }
}
