//! Demonstrates the studio with a chain of providers.
//!
//! Run with: `cargo run --example multi_provider`
//!
//! Uses whichever of `OPENAI_API_KEY`, `DEEPAI_API_KEY` and
//! `PIXELIXE_API_KEY` are set. Relayed providers also need
//! `PROXY_SERVER_ACCESS_TOKEN`.

use genstudio::{AspectRatio, GenerationHistory, ProviderChain, StyleTag, Studio};

#[tokio::main]
async fn main() -> genstudio::Result<()> {
    #[allow(unused_mut)]
    let mut chain = ProviderChain::new();
    #[cfg(feature = "openai")]
    chain.push(Box::new(genstudio::OpenAiImageProvider::builder().build()));
    #[cfg(feature = "deepai")]
    chain.push(Box::new(genstudio::DeepAiProvider::builder().build()));
    #[cfg(feature = "pixelixe")]
    chain.push(Box::new(genstudio::PixelixeProvider::builder().build()));

    let mut studio = Studio::with_history(chain, GenerationHistory::showcase());

    let image = studio
        .submit("A serene mountain lake at dawn", StyleTag::Realistic, AspectRatio::Landscape)
        .await?;
    println!("Generated: {} (placeholder: {})", image.url, image.is_placeholder());

    println!("\nGallery:");
    for entry in studio.history().iter() {
        println!("  [{}] {} -> {}", entry.style, entry.prompt, entry.url);
    }

    Ok(())
}
