//! Core types for image generation.

use crate::error::{GenStudioError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Style presets offered by the generator.
///
/// Each style controls both the prompt enhancement and the placeholder
/// image used when generation fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StyleTag {
    /// Photorealistic output.
    #[default]
    #[serde(rename = "realistic")]
    Realistic,
    /// Painterly output.
    #[serde(rename = "artistic")]
    Artistic,
    /// Anime / manga output.
    #[serde(rename = "anime")]
    Anime,
    /// 3D render output.
    #[serde(rename = "3d")]
    ThreeD,
}

impl StyleTag {
    /// All style tags, in picker order.
    pub const ALL: [StyleTag; 4] = [Self::Realistic, Self::Artistic, Self::Anime, Self::ThreeD];

    /// Returns the tag as used on the wire (e.g., "3d").
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Realistic => "realistic",
            Self::Artistic => "artistic",
            Self::Anime => "anime",
            Self::ThreeD => "3d",
        }
    }

    /// Returns the display name shown in the style picker.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Realistic => "Realistic",
            Self::Artistic => "Artistic",
            Self::Anime => "Anime",
            Self::ThreeD => "3D Render",
        }
    }

    /// Parses a tag, returning `None` for anything outside the closed set.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "realistic" => Some(Self::Realistic),
            "artistic" => Some(Self::Artistic),
            "anime" => Some(Self::Anime),
            "3d" => Some(Self::ThreeD),
            _ => None,
        }
    }

    /// Parses a tag, falling back to [`StyleTag::Realistic`].
    pub fn from_tag_or_default(tag: &str) -> Self {
        Self::from_tag(tag).unwrap_or_default()
    }

    /// Model name sent to Pixelixe's text-to-image endpoint for this style.
    pub fn pixelixe_model(&self) -> &'static str {
        match self {
            Self::Realistic => "stable-diffusion",
            Self::Artistic => "artistic",
            Self::Anime => "anime",
            Self::ThreeD => "3d-render",
        }
    }
}

impl std::fmt::Display for StyleTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Image provider kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageProviderKind {
    /// OpenAI DALL-E.
    OpenAI,
    /// DeepAI text2img.
    DeepAI,
    /// Pixelixe text-to-image.
    Pixelixe,
    /// Several providers tried in order.
    Chain,
}

impl std::fmt::Display for ImageProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OpenAI => write!(f, "openai"),
            Self::DeepAI => write!(f, "deepai"),
            Self::Pixelixe => write!(f, "pixelixe"),
            Self::Chain => write!(f, "chain"),
        }
    }
}

/// Aspect ratios offered by the generator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AspectRatio {
    /// 1:1 square aspect ratio.
    #[default]
    #[serde(rename = "1:1")]
    Square,
    /// 16:9 landscape aspect ratio.
    #[serde(rename = "16:9")]
    Landscape,
    /// 9:16 portrait aspect ratio.
    #[serde(rename = "9:16")]
    Portrait,
    /// 4:3 classic aspect ratio.
    #[serde(rename = "4:3")]
    Classic,
}

impl AspectRatio {
    /// Returns the aspect ratio as a string (e.g., "16:9").
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Square => "1:1",
            Self::Landscape => "16:9",
            Self::Portrait => "9:16",
            Self::Classic => "4:3",
        }
    }

    /// Pixel dimensions with `short_side` as the smaller edge.
    pub fn dimensions(&self, short_side: u32) -> (u32, u32) {
        match self {
            Self::Square => (short_side, short_side),
            Self::Landscape => (short_side * 16 / 9, short_side),
            Self::Portrait => (short_side, short_side * 16 / 9),
            Self::Classic => (short_side * 4 / 3, short_side),
        }
    }
}

impl std::fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A request to generate an image.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// The text prompt describing the desired image.
    pub prompt: String,
    /// Style preset used for prompt enhancement and placeholders.
    pub style: StyleTag,
    /// Desired aspect ratio.
    pub aspect_ratio: AspectRatio,
}

impl GenerationRequest {
    /// Creates a new request with the given prompt and default style.
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            style: StyleTag::default(),
            aspect_ratio: AspectRatio::default(),
        }
    }

    /// Sets the style preset.
    pub fn with_style(mut self, style: StyleTag) -> Self {
        self.style = style;
        self
    }

    /// Sets the aspect ratio.
    pub fn with_aspect_ratio(mut self, ratio: AspectRatio) -> Self {
        self.aspect_ratio = ratio;
        self
    }

    /// Fails when the prompt is empty after trimming.
    pub fn validate(&self) -> Result<()> {
        if self.prompt.trim().is_empty() {
            return Err(GenStudioError::InvalidRequest(
                "prompt must not be empty".into(),
            ));
        }
        Ok(())
    }
}

/// Where a [`GeneratedImage`] URL came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageSource {
    /// URL returned by the provider.
    Provider,
    /// Stock placeholder substituted after a failure.
    Placeholder,
    /// Sample gallery entry shown before anything is generated.
    Showcase,
}

/// A generated image entry in the gallery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedImage {
    /// Unique id, sortable by generation order.
    pub id: String,
    /// The prompt as entered by the user (not the enhanced one).
    pub prompt: String,
    /// Resolved image location.
    pub url: String,
    /// When the image was produced.
    pub timestamp: DateTime<Utc>,
    /// Style preset used.
    pub style: StyleTag,
    /// Provider that handled the request.
    pub provider: ImageProviderKind,
    /// Whether `url` is real output or a placeholder.
    pub source: ImageSource,
}

impl GeneratedImage {
    /// Creates a new entry with a fresh id and the current time.
    pub fn new(
        request: &GenerationRequest,
        url: impl Into<String>,
        provider: ImageProviderKind,
        source: ImageSource,
    ) -> Self {
        Self {
            id: uuid::Uuid::now_v7().to_string(),
            prompt: request.prompt.clone(),
            url: url.into(),
            timestamp: Utc::now(),
            style: request.style,
            provider,
            source,
        }
    }

    /// Returns true if the URL is a stock placeholder.
    pub fn is_placeholder(&self) -> bool {
        self.source == ImageSource::Placeholder
    }
}

/// Supported image formats for downloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    /// PNG format.
    #[default]
    Png,
    /// JPEG format.
    Jpeg,
    /// WebP format.
    WebP,
}

impl ImageFormat {
    /// Returns the file extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
            Self::WebP => "webp",
        }
    }

    /// Detects image format from magic bytes.
    pub fn from_magic_bytes(data: &[u8]) -> Option<Self> {
        if data.len() < 12 {
            return None;
        }

        // PNG: 89 50 4E 47 0D 0A 1A 0A
        if data.starts_with(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]) {
            return Some(Self::Png);
        }

        // JPEG: FF D8 FF
        if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return Some(Self::Jpeg);
        }

        // WebP: RIFF....WEBP
        if data.starts_with(b"RIFF") && &data[8..12] == b"WEBP" {
            return Some(Self::WebP);
        }

        None
    }
}

/// Raw bytes of a downloaded gallery image.
#[derive(Debug, Clone)]
#[must_use = "downloaded image should be saved or processed"]
pub struct DownloadedImage {
    /// Raw image bytes.
    pub data: Vec<u8>,
    /// Detected format, PNG when unknown.
    pub format: ImageFormat,
}

impl DownloadedImage {
    /// Wraps raw bytes, detecting the format from magic bytes.
    pub fn from_bytes(data: Vec<u8>) -> Self {
        let format = ImageFormat::from_magic_bytes(&data).unwrap_or_default();
        Self { data, format }
    }

    /// Suggested file name for the image with the given gallery id.
    pub fn file_name(&self, id: &str) -> String {
        format!("ai-generated-{}.{}", id, self.format.extension())
    }

    /// Returns the size of the image data in bytes.
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// Saves the image to the specified path.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path, &self.data)?;
        Ok(())
    }
}
