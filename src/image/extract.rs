//! Locating the image URL in provider responses.
//!
//! Providers disagree on where the URL lives, so a response is probed with
//! an ordered list of extractors and the first hit wins. New shapes are
//! supported by appending an extractor.

use crate::error::{sanitize_error_message, GenStudioError, Result};
use serde_json::Value;

/// Extracts a candidate URL from a response body.
pub type Extractor = fn(&Value) -> Option<&str>;

fn top_level_url(v: &Value) -> Option<&str> {
    v.get("url")?.as_str()
}

fn data_url(v: &Value) -> Option<&str> {
    v.pointer("/data/url")?.as_str()
}

fn first_data_url(v: &Value) -> Option<&str> {
    v.pointer("/data/0/url")?.as_str()
}

fn first_image_url(v: &Value) -> Option<&str> {
    v.pointer("/images/0/url")?.as_str()
}

fn result_url(v: &Value) -> Option<&str> {
    v.pointer("/result/url")?.as_str()
}

fn output_url(v: &Value) -> Option<&str> {
    v.pointer("/output/url")?.as_str()
}

fn image_url(v: &Value) -> Option<&str> {
    v.get("image_url")?.as_str()
}

/// Ordered set of URL extractors.
#[derive(Clone)]
pub struct UrlExtractor {
    extractors: Vec<(&'static str, Extractor)>,
}

impl std::fmt::Debug for UrlExtractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.paths()).finish()
    }
}

impl Default for UrlExtractor {
    fn default() -> Self {
        Self {
            extractors: vec![
                ("url", top_level_url as Extractor),
                ("data.url", data_url as Extractor),
                ("data[0].url", first_data_url as Extractor),
                ("images[0].url", first_image_url as Extractor),
                ("result.url", result_url as Extractor),
                ("output.url", output_url as Extractor),
                ("image_url", image_url as Extractor),
            ],
        }
    }
}

impl UrlExtractor {
    /// Creates the default extractor list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an extractor, tried after all existing ones.
    pub fn with_extractor(mut self, name: &'static str, extractor: Extractor) -> Self {
        self.extractors.push((name, extractor));
        self
    }

    /// Names of the probed paths, in order.
    pub fn paths(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.extractors.iter().map(|(name, _)| *name)
    }

    /// Returns the first non-empty URL found in `body`.
    ///
    /// Without a match, an `error` or `message` string in the body becomes
    /// [`GenStudioError::Provider`]; otherwise [`GenStudioError::NoImageUrl`].
    pub fn extract(&self, body: &Value) -> Result<String> {
        for (name, extractor) in &self.extractors {
            if let Some(url) = extractor(body).filter(|u| !u.is_empty()) {
                tracing::debug!(path = *name, "found image URL");
                return Ok(url.to_string());
            }
        }

        let message = ["error", "message"]
            .iter()
            .find_map(|key| body.get(*key).and_then(Value::as_str));
        match message {
            Some(message) => Err(GenStudioError::Provider(sanitize_error_message(message))),
            None => Err(GenStudioError::NoImageUrl),
        }
    }
}

/// Extracts an image URL using the default extractor list.
pub fn extract_url(body: &Value) -> Result<String> {
    UrlExtractor::default().extract(body)
}
