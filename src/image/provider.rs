//! Image provider trait and the generation flow shared by all providers.

use crate::error::Result;
use crate::image::placeholder::placeholder_for;
use crate::image::types::{GeneratedImage, GenerationRequest, ImageProviderKind, ImageSource};
use async_trait::async_trait;

/// Trait for image generation providers.
#[async_trait]
pub trait ImageProvider: Send + Sync {
    /// Asks the provider for an image and returns its URL.
    ///
    /// Implementations report every failure; substituting placeholders is
    /// left to [`ImageProviderExt::generate_image`].
    async fn generate_url(&self, request: &GenerationRequest) -> Result<String>;

    /// Returns the kind of this provider.
    fn kind(&self) -> ImageProviderKind;

    /// Returns the name of this provider for display.
    fn name(&self) -> &str {
        match self.kind() {
            ImageProviderKind::OpenAI => "OpenAI (DALL-E 3)",
            ImageProviderKind::DeepAI => "DeepAI (text2img)",
            ImageProviderKind::Pixelixe => "Pixelixe",
            ImageProviderKind::Chain => "Provider chain",
        }
    }

    /// Checks that the credentials this provider needs are present.
    ///
    /// Must not touch the network.
    async fn health_check(&self) -> Result<()>;
}

/// Generation flow on top of any [`ImageProvider`].
#[async_trait]
pub trait ImageProviderExt: ImageProvider {
    /// Generates an image, falling back to the style's placeholder.
    ///
    /// Fails only for an empty prompt, missing credentials, and rate-limit
    /// or quota errors. Every other failure still yields an image whose
    /// `source` is [`ImageSource::Placeholder`].
    async fn generate_image(&self, request: &GenerationRequest) -> Result<GeneratedImage> {
        request.validate()?;
        self.health_check().await?;

        match self.generate_url(request).await {
            Ok(url) => Ok(GeneratedImage::new(
                request,
                url,
                self.kind(),
                ImageSource::Provider,
            )),
            Err(e) if e.is_surfaced() => Err(e),
            Err(e) => {
                tracing::warn!(
                    provider = %self.kind(),
                    style = %request.style,
                    "generation failed, using placeholder: {e}"
                );
                Ok(GeneratedImage::new(
                    request,
                    placeholder_for(request.style),
                    self.kind(),
                    ImageSource::Placeholder,
                ))
            }
        }
    }
}

impl<T: ImageProvider + ?Sized> ImageProviderExt for T {}

#[async_trait]
impl<P: ImageProvider + ?Sized> ImageProvider for Box<P> {
    async fn generate_url(&self, request: &GenerationRequest) -> Result<String> {
        (**self).generate_url(request).await
    }

    fn kind(&self) -> ImageProviderKind {
        (**self).kind()
    }

    fn name(&self) -> &str {
        (**self).name()
    }

    async fn health_check(&self) -> Result<()> {
        (**self).health_check().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GenStudioError;
    use crate::image::types::StyleTag;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Provider answering with a canned result.
    struct StubProvider {
        configured: bool,
        outcome: fn() -> Result<String>,
        calls: AtomicUsize,
    }

    impl StubProvider {
        fn new(outcome: fn() -> Result<String>) -> Self {
            Self {
                configured: true,
                outcome,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl ImageProvider for StubProvider {
        async fn generate_url(&self, _request: &GenerationRequest) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            (self.outcome)()
        }

        fn kind(&self) -> ImageProviderKind {
            ImageProviderKind::OpenAI
        }

        async fn health_check(&self) -> Result<()> {
            if self.configured {
                Ok(())
            } else {
                Err(GenStudioError::Config("no key".into()))
            }
        }
    }

    #[tokio::test]
    async fn test_success_uses_provider_url() {
        let provider = StubProvider::new(|| Ok("https://img/bike.png".into()));
        let request = GenerationRequest::new("a red bicycle").with_style(StyleTag::Anime);

        let image = provider.generate_image(&request).await.unwrap();
        assert_eq!(image.url, "https://img/bike.png");
        assert_eq!(image.source, ImageSource::Provider);
        assert_eq!(image.prompt, "a red bicycle");
    }

    #[tokio::test]
    async fn test_failure_degrades_to_placeholder() {
        let provider = StubProvider::new(|| Err(GenStudioError::NoImageUrl));
        let request = GenerationRequest::new("a red bicycle").with_style(StyleTag::Anime);

        let image = provider.generate_image(&request).await.unwrap();
        assert_eq!(image.url, placeholder_for(StyleTag::Anime));
        assert!(image.is_placeholder());
    }

    #[tokio::test]
    async fn test_rate_limit_is_surfaced() {
        let provider = StubProvider::new(|| Err(GenStudioError::RateLimited));
        let err = provider
            .generate_image(&GenerationRequest::new("x"))
            .await
            .unwrap_err();
        assert!(matches!(err, GenStudioError::RateLimited));
    }

    #[tokio::test]
    async fn test_missing_credentials_skip_provider_call() {
        let mut provider = StubProvider::new(|| Ok("unused".into()));
        provider.configured = false;

        let err = provider
            .generate_image(&GenerationRequest::new("x"))
            .await
            .unwrap_err();
        assert!(matches!(err, GenStudioError::Config(_)));
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_blank_prompt_rejected_before_provider_call() {
        let provider = StubProvider::new(|| Ok("unused".into()));
        let err = provider
            .generate_image(&GenerationRequest::new("  "))
            .await
            .unwrap_err();
        assert!(matches!(err, GenStudioError::InvalidRequest(_)));
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }
}
