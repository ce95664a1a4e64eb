//! OpenAI image generation provider (dall-e-3, dall-e-2), called through the relay.

use crate::error::{GenStudioError, Result};
use crate::image::extract::UrlExtractor;
use crate::image::prompt::enhance_prompt;
use crate::image::provider::ImageProvider;
use crate::image::types::{AspectRatio, GenerationRequest, ImageProviderKind};
use crate::relay::{RelayClient, RelayRequest};
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

const GENERATIONS_URL: &str = "https://api.openai.com/v1/images/generations";

/// Environment variable holding the OpenAI API key.
pub const OPENAI_API_KEY_ENV: &str = "OPENAI_API_KEY";

/// OpenAI image model variants.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OpenAiImageModel {
    /// DALL-E 3 - high quality image generation.
    #[default]
    DallE3,
    /// DALL-E 2 - square images only.
    DallE2,
}

impl OpenAiImageModel {
    /// Returns the API model identifier string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DallE3 => "dall-e-3",
            Self::DallE2 => "dall-e-2",
        }
    }
}

/// Builder for OpenAiImageProvider.
#[derive(Debug, Clone, Default)]
pub struct OpenAiImageProviderBuilder {
    api_key: Option<String>,
    model: OpenAiImageModel,
    quality: Option<String>,
    generations_url: Option<String>,
    relay: Option<RelayClient>,
}

impl OpenAiImageProviderBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the API key. Falls back to `OPENAI_API_KEY` env var.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Sets the OpenAI image model variant.
    pub fn model(mut self, model: OpenAiImageModel) -> Self {
        self.model = model;
        self
    }

    /// Sets the quality: "standard" (default) or "hd".
    pub fn quality(mut self, quality: impl Into<String>) -> Self {
        self.quality = Some(quality.into());
        self
    }

    /// Overrides the generations endpoint the relay is asked to call.
    pub fn generations_url(mut self, url: impl Into<String>) -> Self {
        self.generations_url = Some(url.into());
        self
    }

    /// Sets the relay client. Defaults to [`RelayClient::from_env`].
    pub fn relay(mut self, relay: RelayClient) -> Self {
        self.relay = Some(relay);
        self
    }

    /// Builds the provider. A missing API key is reported when generating.
    pub fn build(self) -> OpenAiImageProvider {
        let api_key = self
            .api_key
            .or_else(|| std::env::var(OPENAI_API_KEY_ENV).ok())
            .filter(|k| !k.is_empty());

        OpenAiImageProvider {
            relay: self.relay.unwrap_or_else(RelayClient::from_env),
            api_key,
            model: self.model,
            quality: self.quality.unwrap_or_else(|| "standard".to_string()),
            generations_url: self
                .generations_url
                .unwrap_or_else(|| GENERATIONS_URL.to_string()),
            extractor: UrlExtractor::default(),
        }
    }
}

/// OpenAI image generation provider.
pub struct OpenAiImageProvider {
    relay: RelayClient,
    api_key: Option<String>,
    model: OpenAiImageModel,
    quality: String,
    generations_url: String,
    extractor: UrlExtractor,
}

impl OpenAiImageProvider {
    /// Creates a new `OpenAiImageProviderBuilder`.
    pub fn builder() -> OpenAiImageProviderBuilder {
        OpenAiImageProviderBuilder::new()
    }

    fn api_key(&self) -> Result<&str> {
        self.api_key.as_deref().ok_or_else(|| {
            GenStudioError::Config(format!(
                "OpenAI API key is not configured (set {})",
                OPENAI_API_KEY_ENV
            ))
        })
    }

    /// Maps the aspect ratio to a size the model accepts.
    fn resolve_size(aspect_ratio: AspectRatio, model: OpenAiImageModel) -> &'static str {
        match model {
            OpenAiImageModel::DallE3 => match aspect_ratio {
                AspectRatio::Square => "1024x1024",
                AspectRatio::Landscape | AspectRatio::Classic => "1792x1024",
                AspectRatio::Portrait => "1024x1792",
            },
            OpenAiImageModel::DallE2 => "1024x1024",
        }
    }
}

#[async_trait]
impl ImageProvider for OpenAiImageProvider {
    async fn generate_url(&self, request: &GenerationRequest) -> Result<String> {
        let api_key = self.api_key()?;
        let body = OpenAiImageRequest::from_generation_request(request, self.model, &self.quality);

        tracing::debug!(
            model = self.model.as_str(),
            size = %body.size,
            prompt = %body.prompt,
            "requesting OpenAI image"
        );

        let envelope = RelayRequest::post(&self.generations_url, serde_json::to_value(&body)?)
            .header("Authorization", format!("Bearer {}", api_key))
            .header("Content-Type", "application/json");

        let text = self.relay.relay(&envelope).await?;
        let response: Value = serde_json::from_str(&text)?;

        if let Some(revised) = response
            .pointer("/data/0/revised_prompt")
            .and_then(Value::as_str)
        {
            tracing::debug!(revised_prompt = revised, "OpenAI revised the prompt");
        }

        self.extractor.extract(&response)
    }

    fn kind(&self) -> ImageProviderKind {
        ImageProviderKind::OpenAI
    }

    async fn health_check(&self) -> Result<()> {
        self.api_key()?;
        self.relay.check_configured()
    }
}

#[derive(Debug, Serialize)]
struct OpenAiImageRequest {
    model: &'static str,
    prompt: String,
    n: u32,
    size: &'static str,
    quality: String,
    response_format: &'static str,
}

impl OpenAiImageRequest {
    fn from_generation_request(
        req: &GenerationRequest,
        model: OpenAiImageModel,
        quality: &str,
    ) -> Self {
        Self {
            model: model.as_str(),
            prompt: enhance_prompt(&req.prompt, req.style),
            n: 1,
            size: OpenAiImageProvider::resolve_size(req.aspect_ratio, model),
            quality: quality.to_string(),
            response_format: "url",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::types::StyleTag;
    use serde_json::json;

    fn relay() -> RelayClient {
        RelayClient::builder().token("relay-token").build()
    }

    #[test]
    fn test_model_as_str() {
        assert_eq!(OpenAiImageModel::DallE3.as_str(), "dall-e-3");
        assert_eq!(OpenAiImageModel::DallE2.as_str(), "dall-e-2");
    }

    #[tokio::test]
    async fn test_builder_with_explicit_key() {
        let provider = OpenAiImageProviderBuilder::new()
            .api_key("sk-test")
            .relay(relay())
            .build();
        assert!(provider.health_check().await.is_ok());
    }

    #[tokio::test]
    async fn test_empty_key_fails_health_check() {
        let provider = OpenAiImageProviderBuilder::new()
            .api_key("")
            .relay(relay())
            .build();
        assert!(matches!(
            provider.health_check().await,
            Err(GenStudioError::Config(_))
        ));
    }

    #[test]
    fn test_builder_with_model() {
        let provider = OpenAiImageProviderBuilder::new()
            .api_key("sk-test")
            .model(OpenAiImageModel::DallE2)
            .relay(relay())
            .build();
        assert_eq!(provider.model, OpenAiImageModel::DallE2);
    }

    #[test]
    fn test_request_body_matches_dalle3_contract() {
        let req = GenerationRequest::new("a red bicycle").with_style(StyleTag::Anime);
        let body =
            OpenAiImageRequest::from_generation_request(&req, OpenAiImageModel::DallE3, "standard");

        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({
                "model": "dall-e-3",
                "prompt": "a red bicycle, anime style, manga art, Japanese animation, colorful, detailed anime artwork",
                "n": 1,
                "size": "1024x1024",
                "quality": "standard",
                "response_format": "url"
            })
        );
    }

    #[test]
    fn test_size_mapping_dalle3() {
        let size = |ar| OpenAiImageProvider::resolve_size(ar, OpenAiImageModel::DallE3);
        assert_eq!(size(AspectRatio::Square), "1024x1024");
        assert_eq!(size(AspectRatio::Landscape), "1792x1024");
        assert_eq!(size(AspectRatio::Portrait), "1024x1792");
        assert_eq!(size(AspectRatio::Classic), "1792x1024");
    }

    #[test]
    fn test_dalle2_is_always_square() {
        assert_eq!(
            OpenAiImageProvider::resolve_size(AspectRatio::Portrait, OpenAiImageModel::DallE2),
            "1024x1024"
        );
    }
}
