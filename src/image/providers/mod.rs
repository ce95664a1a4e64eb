//! Image generation providers.

mod chain;
#[cfg(feature = "deepai")]
mod deepai;
#[cfg(feature = "openai")]
mod openai;
#[cfg(feature = "pixelixe")]
mod pixelixe;

pub use chain::ProviderChain;

#[cfg(feature = "deepai")]
pub use deepai::{DeepAiProvider, DeepAiProviderBuilder, DEEPAI_API_KEY_ENV};

#[cfg(feature = "openai")]
pub use openai::{
    OpenAiImageModel, OpenAiImageProvider, OpenAiImageProviderBuilder, OPENAI_API_KEY_ENV,
};

#[cfg(feature = "pixelixe")]
pub use pixelixe::{PixelixeProvider, PixelixeProviderBuilder, PIXELIXE_API_KEY_ENV};
