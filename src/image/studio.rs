//! Session state behind the generator form: history, selection, downloads.

use crate::error::{GenStudioError, Result};
use crate::image::provider::{ImageProvider, ImageProviderExt};
use crate::image::types::{
    AspectRatio, DownloadedImage, GeneratedImage, GenerationRequest, ImageProviderKind,
    ImageSource, StyleTag,
};
use chrono::Utc;
use std::collections::VecDeque;

/// Gallery entries shown before anything has been generated.
const SHOWCASE: [(&str, &str, StyleTag); 4] = [
    (
        "A futuristic city with flying cars at sunset",
        "https://images.unsplash.com/photo-1519501025264-65ba15a82390?w=800&h=800&fit=crop",
        StyleTag::Realistic,
    ),
    (
        "A magical forest with glowing mushrooms",
        "https://images.unsplash.com/photo-1518709268805-4e9042af9f23?w=800&h=800&fit=crop",
        StyleTag::Artistic,
    ),
    (
        "An astronaut playing guitar on Mars",
        "https://images.unsplash.com/photo-1446776653964-20c1d3a81b06?w=800&h=800&fit=crop",
        StyleTag::Realistic,
    ),
    (
        "A steampunk mechanical dragon",
        "https://images.unsplash.com/photo-1578662996442-48f60103fc96?w=800&h=800&fit=crop",
        StyleTag::ThreeD,
    ),
];

/// Generated images, newest first.
#[derive(Debug, Clone, Default)]
pub struct GenerationHistory {
    images: VecDeque<GeneratedImage>,
    selected: Option<String>,
}

impl GenerationHistory {
    /// Creates an empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a history seeded with the sample gallery.
    ///
    /// Sample entries carry [`ImageSource::Showcase`]; their `provider` is
    /// nominal since nothing was generated.
    pub fn showcase() -> Self {
        let now = Utc::now();
        let images = SHOWCASE
            .iter()
            .enumerate()
            .map(|(i, (prompt, url, style))| GeneratedImage {
                id: (i + 1).to_string(),
                prompt: prompt.to_string(),
                url: url.to_string(),
                timestamp: now,
                style: *style,
                provider: ImageProviderKind::OpenAI,
                source: ImageSource::Showcase,
            })
            .collect();
        Self {
            images,
            selected: None,
        }
    }

    /// Adds an image at the front.
    pub fn push_front(&mut self, image: GeneratedImage) {
        self.images.push_front(image);
    }

    /// Looks up an image by id.
    pub fn get(&self, id: &str) -> Option<&GeneratedImage> {
        self.images.iter().find(|image| image.id == id)
    }

    /// Marks an image as selected. Returns false for unknown ids.
    pub fn select(&mut self, id: &str) -> bool {
        if self.get(id).is_none() {
            return false;
        }
        self.selected = Some(id.to_string());
        true
    }

    /// Clears the selection.
    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// The currently selected image, if any.
    pub fn selected(&self) -> Option<&GeneratedImage> {
        self.selected.as_deref().and_then(|id| self.get(id))
    }

    /// The most recent image.
    pub fn latest(&self) -> Option<&GeneratedImage> {
        self.images.front()
    }

    /// Iterates newest first.
    pub fn iter(&self) -> impl Iterator<Item = &GeneratedImage> {
        self.images.iter()
    }

    /// Number of images.
    pub fn len(&self) -> usize {
        self.images.len()
    }

    /// Returns true if there are no images.
    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

/// A provider plus the session's gallery.
pub struct Studio<P> {
    provider: P,
    history: GenerationHistory,
    client: reqwest::Client,
}

impl<P: ImageProvider> Studio<P> {
    /// Creates a studio with an empty history.
    pub fn new(provider: P) -> Self {
        Self::with_history(provider, GenerationHistory::new())
    }

    /// Creates a studio with the given history.
    pub fn with_history(provider: P, history: GenerationHistory) -> Self {
        Self {
            provider,
            history,
            client: reqwest::Client::new(),
        }
    }

    /// The underlying provider.
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// The gallery.
    pub fn history(&self) -> &GenerationHistory {
        &self.history
    }

    /// Mutable access to the gallery, e.g. to change the selection.
    pub fn history_mut(&mut self) -> &mut GenerationHistory {
        &mut self.history
    }

    /// Generates an image and records it as the newest, selected entry.
    ///
    /// On error the history is left untouched.
    pub async fn submit(
        &mut self,
        prompt: &str,
        style: StyleTag,
        aspect_ratio: AspectRatio,
    ) -> Result<&GeneratedImage> {
        let request = GenerationRequest::new(prompt)
            .with_style(style)
            .with_aspect_ratio(aspect_ratio);

        tracing::debug!(provider = %self.provider.kind(), style = %style, "generating image");
        let image = self.provider.generate_image(&request).await?;

        let id = image.id.clone();
        self.history.push_front(image);
        self.history.select(&id);
        self.history
            .latest()
            .ok_or_else(|| GenStudioError::UnexpectedResponse("history is empty".into()))
    }

    /// Fetches the bytes behind an image URL.
    pub async fn download(&self, image: &GeneratedImage) -> Result<DownloadedImage> {
        let response = self.client.get(&image.url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(GenStudioError::Api {
                status: status.as_u16(),
                message: "failed to download image".into(),
            });
        }
        let data = response.bytes().await?.to_vec();
        Ok(DownloadedImage::from_bytes(data))
    }
}
