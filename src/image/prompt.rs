//! Style-based prompt enhancement.

use crate::image::types::StyleTag;

impl StyleTag {
    /// Qualifier appended to prompts generated in this style.
    pub fn prompt_suffix(&self) -> &'static str {
        match self {
            Self::Realistic => {
                "photorealistic, high detail, professional photography, 8k resolution"
            }
            Self::Artistic => {
                "artistic painting, oil on canvas, masterpiece, vibrant colors, artistic style"
            }
            Self::Anime => {
                "anime style, manga art, Japanese animation, colorful, detailed anime artwork"
            }
            Self::ThreeD => {
                "3D render, CGI, octane render, volumetric lighting, high quality 3D graphics"
            }
        }
    }
}

/// Appends the style qualifier to the prompt.
pub fn enhance_prompt(prompt: &str, style: StyleTag) -> String {
    format!("{}, {}", prompt, style.prompt_suffix())
}

/// Like [`enhance_prompt`], but for a raw tag. Unknown tags leave the prompt
/// unchanged.
pub fn enhance_prompt_for_tag(prompt: &str, tag: &str) -> String {
    match StyleTag::from_tag(tag) {
        Some(style) => enhance_prompt(prompt, style),
        None => prompt.to_string(),
    }
}
