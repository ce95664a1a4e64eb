//! CLI for GenStudio - prompt-to-image generation.

use clap::{Args, Parser, Subcommand, ValueEnum};
use genstudio::image::{AspectRatio, ImageProvider, StyleTag, Studio};
use genstudio::ProviderChain;
use std::path::PathBuf;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "genstudio")]
#[command(about = "Generate images from text prompts (OpenAI, DeepAI, Pixelixe)")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate an image from a text prompt
    Generate(GenerateArgs),

    /// List available providers
    Providers,
}

#[derive(Args)]
struct GenerateArgs {
    /// The text prompt describing the image
    prompt: String,

    /// Style preset
    #[arg(short, long, value_enum, default_value = "realistic")]
    style: StyleArg,

    /// Aspect ratio
    #[arg(long, value_enum, default_value = "1:1")]
    aspect_ratio: AspectRatioArg,

    /// Provider to use
    #[arg(short, long, value_enum, default_value = "openai")]
    provider: ProviderArg,

    /// Download the image to this path
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ProviderArg {
    Openai,
    Deepai,
    Pixelixe,
    /// Try each configured provider in order
    Auto,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum StyleArg {
    Realistic,
    Artistic,
    Anime,
    #[value(name = "3d")]
    ThreeD,
}

impl From<StyleArg> for StyleTag {
    fn from(arg: StyleArg) -> Self {
        match arg {
            StyleArg::Realistic => StyleTag::Realistic,
            StyleArg::Artistic => StyleTag::Artistic,
            StyleArg::Anime => StyleTag::Anime,
            StyleArg::ThreeD => StyleTag::ThreeD,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum AspectRatioArg {
    #[value(name = "1:1")]
    Square,
    #[value(name = "16:9")]
    Landscape,
    #[value(name = "9:16")]
    Portrait,
    #[value(name = "4:3")]
    Classic,
}

impl From<AspectRatioArg> for AspectRatio {
    fn from(arg: AspectRatioArg) -> Self {
        match arg {
            AspectRatioArg::Square => AspectRatio::Square,
            AspectRatioArg::Landscape => AspectRatio::Landscape,
            AspectRatioArg::Portrait => AspectRatio::Portrait,
            AspectRatioArg::Classic => AspectRatio::Classic,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    setup_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Generate(args) => {
            generate_image(args, cli.json).await?;
        }
        Commands::Providers => {
            list_providers(cli.json)?;
        }
    }

    Ok(())
}

fn setup_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .with(filter)
        .init();
}

fn build_provider(arg: ProviderArg) -> anyhow::Result<Box<dyn ImageProvider>> {
    let provider: Box<dyn ImageProvider> = match arg {
        ProviderArg::Openai => {
            #[cfg(feature = "openai")]
            {
                Box::new(genstudio::OpenAiImageProvider::builder().build())
            }
            #[cfg(not(feature = "openai"))]
            {
                anyhow::bail!("OpenAI provider not enabled");
            }
        }
        ProviderArg::Deepai => {
            #[cfg(feature = "deepai")]
            {
                Box::new(genstudio::DeepAiProvider::builder().build())
            }
            #[cfg(not(feature = "deepai"))]
            {
                anyhow::bail!("DeepAI provider not enabled");
            }
        }
        ProviderArg::Pixelixe => {
            #[cfg(feature = "pixelixe")]
            {
                Box::new(genstudio::PixelixeProvider::builder().build())
            }
            #[cfg(not(feature = "pixelixe"))]
            {
                anyhow::bail!("Pixelixe provider not enabled");
            }
        }
        ProviderArg::Auto => {
            #[allow(unused_mut)]
            let mut chain = ProviderChain::new();
            #[cfg(feature = "openai")]
            chain.push(Box::new(genstudio::OpenAiImageProvider::builder().build()));
            #[cfg(feature = "deepai")]
            chain.push(Box::new(genstudio::DeepAiProvider::builder().build()));
            #[cfg(feature = "pixelixe")]
            chain.push(Box::new(genstudio::PixelixeProvider::builder().build()));
            Box::new(chain)
        }
    };
    Ok(provider)
}

async fn generate_image(args: GenerateArgs, json_output: bool) -> anyhow::Result<()> {
    let provider = build_provider(args.provider)?;
    let mut studio = Studio::new(provider);

    let image = studio
        .submit(&args.prompt, args.style.into(), args.aspect_ratio.into())
        .await?
        .clone();

    let saved = match &args.output {
        Some(path) => {
            let downloaded = studio.download(&image).await?;
            downloaded.save(path)?;
            Some((path.display().to_string(), downloaded.size()))
        }
        None => None,
    };

    if json_output {
        let mut result = serde_json::to_value(&image)?;
        if let Some((path, size)) = &saved {
            result["output"] = serde_json::json!(path);
            result["size_bytes"] = serde_json::json!(size);
        }
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("Image URL: {}", image.url);
        if image.is_placeholder() {
            println!(
                "Note: generation failed, showing the {} placeholder",
                image.style.display_name()
            );
        }
        if let Some((path, size)) = saved {
            println!("Saved to {} ({} bytes)", path, size);
        }
    }

    Ok(())
}

fn list_providers(json_output: bool) -> anyhow::Result<()> {
    #[derive(serde::Serialize)]
    struct ProviderInfo {
        name: &'static str,
        kind: &'static str,
        env_var: &'static str,
        relayed: bool,
        enabled: bool,
        key_present: bool,
    }

    let key_present = |var: &str| std::env::var(var).is_ok_and(|v| !v.is_empty());

    let providers = vec![
        ProviderInfo {
            name: "OpenAI (DALL-E 3)",
            kind: "openai",
            env_var: "OPENAI_API_KEY",
            relayed: true,
            enabled: cfg!(feature = "openai"),
            key_present: key_present("OPENAI_API_KEY"),
        },
        ProviderInfo {
            name: "DeepAI (text2img)",
            kind: "deepai",
            env_var: "DEEPAI_API_KEY",
            relayed: false,
            enabled: cfg!(feature = "deepai"),
            key_present: key_present("DEEPAI_API_KEY"),
        },
        ProviderInfo {
            name: "Pixelixe",
            kind: "pixelixe",
            env_var: "PIXELIXE_API_KEY",
            relayed: true,
            enabled: cfg!(feature = "pixelixe"),
            key_present: key_present("PIXELIXE_API_KEY"),
        },
    ];
    let relay_token = key_present(genstudio::relay::RELAY_TOKEN_ENV);

    if json_output {
        let result = serde_json::json!({
            "providers": providers,
            "relay_token_present": relay_token,
        });
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("Available providers:\n");
        for p in &providers {
            let status = if p.enabled && p.key_present { "✓" } else { "✗" };
            println!("  {} {} ({})", status, p.name, p.kind);
            println!("    API key: {}", p.env_var);
            if p.relayed {
                println!("    Relayed: yes");
            }
        }
        println!(
            "\nRelay token ({}): {}",
            genstudio::relay::RELAY_TOKEN_ENV,
            if relay_token { "set" } else { "missing" }
        );
    }

    Ok(())
}
