//! Tries several providers in order until one returns an image URL.

use crate::error::{GenStudioError, Result};
use crate::image::provider::ImageProvider;
use crate::image::types::{GenerationRequest, ImageProviderKind};
use async_trait::async_trait;

/// Ordered list of providers; the first URL wins.
///
/// Providers without credentials are skipped. Rate-limit, quota and other
/// surfaced errors stop the chain.
#[derive(Default)]
pub struct ProviderChain {
    providers: Vec<Box<dyn ImageProvider>>,
}

impl ProviderChain {
    /// Creates an empty chain.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a provider.
    pub fn with_provider(mut self, provider: impl ImageProvider + 'static) -> Self {
        self.providers.push(Box::new(provider));
        self
    }

    /// Appends an already boxed provider.
    pub fn push(&mut self, provider: Box<dyn ImageProvider>) {
        self.providers.push(provider);
    }

    /// Number of providers in the chain.
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    /// Returns true if the chain has no providers.
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

#[async_trait]
impl ImageProvider for ProviderChain {
    async fn generate_url(&self, request: &GenerationRequest) -> Result<String> {
        let mut last_error = None;

        for provider in &self.providers {
            if let Err(e) = provider.health_check().await {
                tracing::debug!(provider = %provider.kind(), "skipping provider: {e}");
                continue;
            }
            match provider.generate_url(request).await {
                Ok(url) => return Ok(url),
                Err(e) if e.is_surfaced() => return Err(e),
                Err(e) => {
                    tracing::warn!(provider = %provider.kind(), "provider failed: {e}");
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or(GenStudioError::NoImageUrl))
    }

    fn kind(&self) -> ImageProviderKind {
        ImageProviderKind::Chain
    }

    /// Passes when at least one provider is configured.
    async fn health_check(&self) -> Result<()> {
        let mut first_error = None;
        for provider in &self.providers {
            match provider.health_check().await {
                Ok(()) => return Ok(()),
                Err(e) => {
                    first_error.get_or_insert(e);
                }
            }
        }
        Err(first_error
            .unwrap_or_else(|| GenStudioError::Config("no image providers configured".into())))
    }
}
