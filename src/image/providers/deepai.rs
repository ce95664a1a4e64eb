//! DeepAI text2img provider.
//!
//! DeepAI takes multipart form data, which the JSON relay envelope cannot
//! carry, so this provider calls the API directly.

use crate::error::{GenStudioError, Result};
use crate::image::extract::UrlExtractor;
use crate::image::provider::ImageProvider;
use crate::image::types::{GenerationRequest, ImageProviderKind};
use async_trait::async_trait;
use serde_json::Value;

const TEXT2IMG_URL: &str = "https://api.deepai.org/api/text2img";

/// Short edge, in pixels, of requested images.
const SHORT_SIDE: u32 = 512;

/// Environment variable holding the DeepAI API key.
pub const DEEPAI_API_KEY_ENV: &str = "DEEPAI_API_KEY";

fn output_url(v: &Value) -> Option<&str> {
    v.get("output_url")?.as_str()
}

/// Builder for DeepAiProvider.
#[derive(Debug, Clone, Default)]
pub struct DeepAiProviderBuilder {
    api_key: Option<String>,
    base_url: Option<String>,
}

impl DeepAiProviderBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the API key. Falls back to `DEEPAI_API_KEY` env var.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Overrides the text2img endpoint.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Builds the provider. A missing API key is reported when generating.
    pub fn build(self) -> DeepAiProvider {
        let api_key = self
            .api_key
            .or_else(|| std::env::var(DEEPAI_API_KEY_ENV).ok())
            .filter(|k| !k.is_empty());

        DeepAiProvider {
            client: reqwest::Client::new(),
            api_key,
            url: self.base_url.unwrap_or_else(|| TEXT2IMG_URL.to_string()),
            extractor: UrlExtractor::default().with_extractor("output_url", output_url),
        }
    }
}

/// DeepAI image generation provider.
pub struct DeepAiProvider {
    client: reqwest::Client,
    api_key: Option<String>,
    url: String,
    extractor: UrlExtractor,
}

impl DeepAiProvider {
    /// Creates a new `DeepAiProviderBuilder`.
    pub fn builder() -> DeepAiProviderBuilder {
        DeepAiProviderBuilder::new()
    }

    fn api_key(&self) -> Result<&str> {
        self.api_key.as_deref().ok_or_else(|| {
            GenStudioError::Config(format!(
                "DeepAI API key is not configured (set {})",
                DEEPAI_API_KEY_ENV
            ))
        })
    }

    fn form(request: &GenerationRequest) -> reqwest::multipart::Form {
        let (width, height) = request.aspect_ratio.dimensions(SHORT_SIDE);
        reqwest::multipart::Form::new()
            .text("text", request.prompt.clone())
            .text("width", width.to_string())
            .text("height", height.to_string())
    }
}

#[async_trait]
impl ImageProvider for DeepAiProvider {
    async fn generate_url(&self, request: &GenerationRequest) -> Result<String> {
        let api_key = self.api_key()?;

        tracing::debug!(url = %self.url, "requesting DeepAI image");
        let response = self
            .client
            .post(&self.url)
            .header("api-key", api_key)
            .multipart(Self::form(request))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await?;
            return Err(GenStudioError::from_response(
                status.as_u16(),
                status.canonical_reason(),
                &text,
            ));
        }

        let body: Value = response.json().await?;
        self.extractor.extract(&body)
    }

    fn kind(&self) -> ImageProviderKind {
        ImageProviderKind::DeepAI
    }

    async fn health_check(&self) -> Result<()> {
        self.api_key().map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_builder_with_explicit_key() {
        let provider = DeepAiProviderBuilder::new().api_key("deep-key").build();
        assert!(provider.health_check().await.is_ok());
        assert_eq!(provider.url, TEXT2IMG_URL);
    }

    #[test]
    fn test_output_url_is_probed_last() {
        let provider = DeepAiProviderBuilder::new().api_key("deep-key").build();
        let body = json!({"id": "abc", "output_url": "https://api.deepai.org/job/out.jpg"});
        assert_eq!(
            provider.extractor.extract(&body).unwrap(),
            "https://api.deepai.org/job/out.jpg"
        );
    }
}
