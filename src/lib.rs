#![warn(missing_docs)]
//! GenStudio - prompt-to-image generation with placeholder fallback.
//!
//! A prompt and a style tag are turned into a provider request (OpenAI
//! DALL-E 3, DeepAI or Pixelixe), sent through a relay where the provider
//! needs one, and the image URL in the response is recorded in a gallery.
//! When a provider fails for any reason other than missing credentials or
//! rate/quota limits, the result falls back to a stock image for the style.
//!
//! # Quick Start
//!
//! ```no_run
//! use genstudio::{GenerationRequest, ImageProviderExt, OpenAiImageProvider, StyleTag};
//!
//! #[tokio::main]
//! async fn main() -> genstudio::Result<()> {
//!     let provider = OpenAiImageProvider::builder().build();
//!     let request = GenerationRequest::new("a red bicycle").with_style(StyleTag::Anime);
//!     let image = provider.generate_image(&request).await?;
//!     println!("{} (placeholder: {})", image.url, image.is_placeholder());
//!     Ok(())
//! }
//! ```
//!
//! # Features
//!
//! - `openai`: OpenAI DALL-E through the relay
//! - `deepai`: DeepAI text2img (direct)
//! - `pixelixe`: Pixelixe text-to-image through the relay
//! - `cli`: Command-line interface

mod error;
pub mod image;
pub mod relay;

pub use error::{GenStudioError, Result};

pub use image::{
    AspectRatio, DownloadedImage, GeneratedImage, GenerationHistory, GenerationRequest,
    ImageFormat, ImageProvider, ImageProviderExt, ImageProviderKind, ImageSource, Studio,
    StyleTag,
};
pub use relay::{RelayClient, RelayClientBuilder, RelayRequest};

pub use image::providers::ProviderChain;

#[cfg(feature = "openai")]
pub use image::providers::{OpenAiImageModel, OpenAiImageProvider, OpenAiImageProviderBuilder};

#[cfg(feature = "deepai")]
pub use image::providers::{DeepAiProvider, DeepAiProviderBuilder};

#[cfg(feature = "pixelixe")]
pub use image::providers::{PixelixeProvider, PixelixeProviderBuilder};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::{GenStudioError, Result};
    pub use crate::image::{
        GeneratedImage, GenerationRequest, ImageProvider, ImageProviderExt, StyleTag, Studio,
    };

    #[cfg(feature = "openai")]
    pub use crate::image::providers::OpenAiImageProvider;

    #[cfg(feature = "deepai")]
    pub use crate::image::providers::DeepAiProvider;

    #[cfg(feature = "pixelixe")]
    pub use crate::image::providers::PixelixeProvider;
}
