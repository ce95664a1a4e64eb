//! Stock images shown when generation fails.

use crate::image::types::StyleTag;

const REALISTIC: &str =
    "https://images.unsplash.com/photo-1506905925346-21bda4d32df4?w=800&h=800&fit=crop";
const ARTISTIC: &str =
    "https://images.unsplash.com/photo-1541961017774-22349e4a1262?w=800&h=800&fit=crop";
const ANIME: &str =
    "https://images.unsplash.com/photo-1578321272176-b7bbc0679853?w=800&h=800&fit=crop";
const THREE_D: &str =
    "https://images.unsplash.com/photo-1618005182384-a83a8bd57fbe?w=800&h=800&fit=crop";

/// Returns the placeholder image URL for a style.
pub fn placeholder_for(style: StyleTag) -> &'static str {
    match style {
        StyleTag::Realistic => REALISTIC,
        StyleTag::Artistic => ARTISTIC,
        StyleTag::Anime => ANIME,
        StyleTag::ThreeD => THREE_D,
    }
}

/// Returns the placeholder for a raw tag, using the realistic image for
/// unknown tags.
pub fn placeholder_for_tag(tag: &str) -> &'static str {
    placeholder_for(StyleTag::from_tag_or_default(tag))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_every_style_has_distinct_placeholder() {
        let urls: HashSet<_> = StyleTag::ALL.iter().map(|s| placeholder_for(*s)).collect();
        assert_eq!(urls.len(), StyleTag::ALL.len());
        assert!(urls.iter().all(|u| u.starts_with("https://")));
    }

    #[test]
    fn test_placeholder_is_stable() {
        assert_eq!(placeholder_for(StyleTag::Anime), placeholder_for(StyleTag::Anime));
        assert_eq!(placeholder_for_tag("anime"), ANIME);
    }

    #[test]
    fn test_unknown_tag_uses_realistic() {
        assert_eq!(placeholder_for_tag("vaporwave"), REALISTIC);
        assert_eq!(placeholder_for_tag(""), REALISTIC);
    }
}
