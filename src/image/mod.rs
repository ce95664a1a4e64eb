//! Image generation module.

pub mod extract;
pub mod placeholder;
pub mod prompt;
mod provider;
pub mod providers;
mod studio;
mod types;

pub use extract::{extract_url, UrlExtractor};
pub use placeholder::{placeholder_for, placeholder_for_tag};
pub use prompt::{enhance_prompt, enhance_prompt_for_tag};
pub use provider::{ImageProvider, ImageProviderExt};
pub use studio::{GenerationHistory, Studio};
pub use types::{
    AspectRatio, DownloadedImage, GeneratedImage, GenerationRequest, ImageFormat,
    ImageProviderKind, ImageSource, StyleTag,
};
