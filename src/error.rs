//! Error types for image generation.

/// Maximum number of characters of a raw response body kept in an error.
const MAX_ERROR_TEXT: usize = 200;

/// Errors that can occur during image generation.
#[derive(Debug, thiserror::Error)]
pub enum GenStudioError {
    /// A required credential (API key or relay token) is missing.
    #[error("configuration error: {0}")]
    Config(String),

    /// Invalid request parameters (e.g., empty prompt).
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The relay or provider answered with a non-2xx status.
    #[error("request failed: {status} {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Provider message, or the canonical reason phrase.
        message: String,
    },

    /// Rate limit exceeded.
    #[error("Rate limit exceeded. Please try again in a few moments.")]
    RateLimited,

    /// The provider account ran out of quota.
    #[error("API quota exceeded. Please check your billing.")]
    QuotaExceeded,

    /// The response parsed, but no known field held an image URL.
    #[error("no image URL found in response")]
    NoImageUrl,

    /// The response carried an error message instead of an image URL.
    #[error("provider error: {0}")]
    Provider(String),

    /// The response body could not be interpreted.
    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),

    /// Network or HTTP error.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// I/O error (e.g., saving a downloaded image).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl GenStudioError {
    /// Returns true if this error must reach the caller instead of being
    /// replaced by a placeholder image.
    pub fn is_surfaced(&self) -> bool {
        matches!(
            self,
            Self::Config(_) | Self::InvalidRequest(_) | Self::RateLimited | Self::QuotaExceeded
        )
    }

    /// Builds an error for a non-2xx response.
    ///
    /// Only quota or rate-limit wording in the body selects the specific
    /// variants; a bare 429 is an ordinary [`GenStudioError::Api`] error.
    pub fn from_response(status: u16, reason: Option<&str>, body: &str) -> Self {
        if body.contains("insufficient_quota") || body.contains("exceeded your current quota") {
            return Self::QuotaExceeded;
        }
        if body.contains("rate_limit") {
            return Self::RateLimited;
        }
        let message = error_message_from_body(body)
            .or_else(|| reason.map(str::to_string))
            .unwrap_or_else(|| sanitize_error_message(body));
        Self::Api { status, message }
    }
}

/// Pulls a human-readable message out of a JSON error body.
///
/// Understands `{"error": {"message": ..}}`, `{"error": ".."}` and
/// `{"message": ".."}`.
pub(crate) fn error_message_from_body(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    let message = value
        .pointer("/error/message")
        .or_else(|| value.get("error"))
        .or_else(|| value.get("message"))?
        .as_str()?;
    Some(sanitize_error_message(message))
}

/// Trims and truncates provider text before it is put into an error.
pub(crate) fn sanitize_error_message(text: &str) -> String {
    let text = text.trim();
    match text.char_indices().nth(MAX_ERROR_TEXT) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

/// Result type alias for image generation operations.
pub type Result<T> = std::result::Result<T, GenStudioError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_surfaced() {
        assert!(GenStudioError::Config("missing key".into()).is_surfaced());
        assert!(GenStudioError::InvalidRequest("empty".into()).is_surfaced());
        assert!(GenStudioError::RateLimited.is_surfaced());
        assert!(GenStudioError::QuotaExceeded.is_surfaced());

        assert!(!GenStudioError::NoImageUrl.is_surfaced());
        assert!(!GenStudioError::Provider("bad".into()).is_surfaced());
        assert!(!GenStudioError::Api {
            status: 500,
            message: "Internal Server Error".into()
        }
        .is_surfaced());
    }

    #[test]
    fn test_rate_limit_wording_from_body() {
        let body = r#"{"error":{"code":"rate_limit_exceeded","message":"Slow down"}}"#;
        let err = GenStudioError::from_response(429, Some("Too Many Requests"), body);
        assert!(matches!(err, GenStudioError::RateLimited));
        assert_eq!(
            err.to_string(),
            "Rate limit exceeded. Please try again in a few moments."
        );
    }

    #[test]
    fn test_bare_429_is_not_rate_limited() {
        let err = GenStudioError::from_response(429, Some("Too Many Requests"), "Too Many Requests");
        assert!(!err.is_surfaced());
        assert_eq!(err.to_string(), "request failed: 429 Too Many Requests");

        let err = GenStudioError::from_response(429, Some("Too Many Requests"), "");
        assert!(matches!(err, GenStudioError::Api { status: 429, .. }));
    }

    #[test]
    fn test_quota_beats_rate_limit() {
        let body = r#"{"error":{"code":"insufficient_quota","type":"rate_limit"}}"#;
        let err = GenStudioError::from_response(429, None, body);
        assert!(matches!(err, GenStudioError::QuotaExceeded));
    }

    #[test]
    fn test_api_error_prefers_provider_message() {
        let body = r#"{"error":{"message":"Invalid size"}}"#;
        let err = GenStudioError::from_response(400, Some("Bad Request"), body);
        assert_eq!(err.to_string(), "request failed: 400 Invalid size");
    }

    #[test]
    fn test_api_error_falls_back_to_reason() {
        let err = GenStudioError::from_response(502, Some("Bad Gateway"), "<html>oops</html>");
        assert_eq!(err.to_string(), "request failed: 502 Bad Gateway");
    }

    #[test]
    fn test_error_message_shapes() {
        assert_eq!(
            error_message_from_body(r#"{"error":"nope"}"#).as_deref(),
            Some("nope")
        );
        assert_eq!(
            error_message_from_body(r#"{"message":"denied"}"#).as_deref(),
            Some("denied")
        );
        assert_eq!(error_message_from_body("not json"), None);
    }

    #[test]
    fn test_sanitize_truncates_long_text() {
        let long = "x".repeat(500);
        let sanitized = sanitize_error_message(&long);
        assert_eq!(sanitized.len(), MAX_ERROR_TEXT + 3);
        assert!(sanitized.ends_with("..."));

        assert_eq!(sanitize_error_message("  short \n"), "short");
    }
}
