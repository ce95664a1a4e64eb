//! Basic image generation example.
//!
//! Run with: `cargo run --example generate_image`
//!
//! Requires `OPENAI_API_KEY` and `PROXY_SERVER_ACCESS_TOKEN` environment variables.

use genstudio::{GenerationRequest, ImageProviderExt, OpenAiImageProvider, StyleTag};

#[tokio::main]
async fn main() -> genstudio::Result<()> {
    let provider = OpenAiImageProvider::builder().build();

    let request = GenerationRequest::new("A golden retriever puppy playing in snow")
        .with_style(StyleTag::Artistic);
    let image = provider.generate_image(&request).await?;

    println!("Image URL: {}", image.url);
    if image.is_placeholder() {
        println!("(generation failed, this is the {} placeholder)", image.style);
    }

    Ok(())
}
