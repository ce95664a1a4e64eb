//! Pixelixe text-to-image provider, called through the relay.
//!
//! The primary endpoint's response shape is not documented, so its body is
//! probed with the default [`UrlExtractor`]. When no URL can be found the
//! alternate text-to-image endpoint is tried once.

use crate::error::{sanitize_error_message, GenStudioError, Result};
use crate::image::extract::UrlExtractor;
use crate::image::provider::ImageProvider;
use crate::image::types::{GenerationRequest, ImageProviderKind};
use crate::relay::{RelayClient, RelayRequest};
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

const PRIMARY_URL: &str =
    "https://studio.pixelixe.com/api/compress/v1?imageUrl=https://yoururl.com/image.png";
const ALTERNATE_URL: &str = "https://api.pixelixe.com/v1/ai/text-to-image";

/// Short edge, in pixels, of requested images.
const SHORT_SIDE: u32 = 512;

/// Environment variable holding the Pixelixe API key.
pub const PIXELIXE_API_KEY_ENV: &str = "PIXELIXE_API_KEY";

/// Builder for PixelixeProvider.
#[derive(Debug, Clone, Default)]
pub struct PixelixeProviderBuilder {
    api_key: Option<String>,
    primary_url: Option<String>,
    alternate_url: Option<String>,
    relay: Option<RelayClient>,
}

impl PixelixeProviderBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the API key. Falls back to `PIXELIXE_API_KEY` env var.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Overrides the primary endpoint.
    pub fn primary_url(mut self, url: impl Into<String>) -> Self {
        self.primary_url = Some(url.into());
        self
    }

    /// Overrides the alternate endpoint.
    pub fn alternate_url(mut self, url: impl Into<String>) -> Self {
        self.alternate_url = Some(url.into());
        self
    }

    /// Sets the relay client. Defaults to [`RelayClient::from_env`].
    pub fn relay(mut self, relay: RelayClient) -> Self {
        self.relay = Some(relay);
        self
    }

    /// Builds the provider. A missing API key is reported when generating.
    pub fn build(self) -> PixelixeProvider {
        let api_key = self
            .api_key
            .or_else(|| std::env::var(PIXELIXE_API_KEY_ENV).ok())
            .filter(|k| !k.is_empty());

        PixelixeProvider {
            relay: self.relay.unwrap_or_else(RelayClient::from_env),
            api_key,
            primary_url: self.primary_url.unwrap_or_else(|| PRIMARY_URL.to_string()),
            alternate_url: self
                .alternate_url
                .unwrap_or_else(|| ALTERNATE_URL.to_string()),
            extractor: UrlExtractor::default(),
        }
    }
}

/// Pixelixe image generation provider.
pub struct PixelixeProvider {
    relay: RelayClient,
    api_key: Option<String>,
    primary_url: String,
    alternate_url: String,
    extractor: UrlExtractor,
}

impl PixelixeProvider {
    /// Creates a new `PixelixeProviderBuilder`.
    pub fn builder() -> PixelixeProviderBuilder {
        PixelixeProviderBuilder::new()
    }

    fn api_key(&self) -> Result<&str> {
        self.api_key.as_deref().ok_or_else(|| {
            GenStudioError::Config(format!(
                "Pixelixe API key is not configured (set {})",
                PIXELIXE_API_KEY_ENV
            ))
        })
    }

    async fn request_primary(&self, api_key: &str, request: &GenerationRequest) -> Result<String> {
        let body = PixelixeRequest::from_generation_request(request);
        let envelope = RelayRequest::post(&self.primary_url, serde_json::to_value(&body)?)
            .header("Authorization", format!("Bearer {}", api_key))
            .header("Api-Key", api_key)
            .header("X-API-Key", api_key)
            .header("Content-Type", "application/json")
            .header("Accept", "application/json");

        tracing::debug!(url = %self.primary_url, "requesting Pixelixe image");
        let text = self.relay.relay(&envelope).await?;
        self.extractor.extract(&parse_body(&text)?)
    }

    async fn request_alternate(
        &self,
        api_key: &str,
        request: &GenerationRequest,
    ) -> Result<String> {
        let body = PixelixeAlternateRequest::from_generation_request(request);
        let envelope = RelayRequest::post(&self.alternate_url, serde_json::to_value(&body)?)
            .header("Api-Key", api_key)
            .header("Content-Type", "application/json");

        tracing::debug!(url = %self.alternate_url, "trying alternate Pixelixe endpoint");
        let text = self.relay.relay(&envelope).await?;
        self.extractor.extract(&parse_body(&text)?)
    }
}

fn parse_body(text: &str) -> Result<Value> {
    serde_json::from_str(text).map_err(|_| {
        GenStudioError::UnexpectedResponse(format!(
            "invalid response from API: {}",
            sanitize_error_message(text)
        ))
    })
}

#[async_trait]
impl ImageProvider for PixelixeProvider {
    async fn generate_url(&self, request: &GenerationRequest) -> Result<String> {
        let api_key = self.api_key()?;

        match self.request_primary(api_key, request).await {
            Err(GenStudioError::NoImageUrl) => self.request_alternate(api_key, request).await,
            other => other,
        }
    }

    fn kind(&self) -> ImageProviderKind {
        ImageProviderKind::Pixelixe
    }

    async fn health_check(&self) -> Result<()> {
        self.api_key()?;
        self.relay.check_configured()
    }
}

#[derive(Debug, Serialize)]
struct PixelixeRequest<'a> {
    prompt: &'a str,
    style: &'static str,
    width: u32,
    height: u32,
    samples: u32,
}

impl<'a> PixelixeRequest<'a> {
    fn from_generation_request(req: &'a GenerationRequest) -> Self {
        let (width, height) = req.aspect_ratio.dimensions(SHORT_SIDE);
        Self {
            prompt: &req.prompt,
            style: req.style.as_str(),
            width,
            height,
            samples: 1,
        }
    }
}

#[derive(Debug, Serialize)]
struct PixelixeAlternateRequest<'a> {
    text: &'a str,
    model: &'static str,
    style: &'static str,
    width: u32,
    height: u32,
}

impl<'a> PixelixeAlternateRequest<'a> {
    fn from_generation_request(req: &'a GenerationRequest) -> Self {
        let (width, height) = req.aspect_ratio.dimensions(SHORT_SIDE);
        Self {
            text: &req.prompt,
            model: req.style.pixelixe_model(),
            style: req.style.as_str(),
            width,
            height,
        }
    }
}
