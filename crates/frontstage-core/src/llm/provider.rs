//! LLM provider trait and the normalized request/response types.
//!
//! Every vendor adapter consumes an [`LlmRequest`] and produces an
//! [`LlmResponse`]; nothing vendor-specific leaks past this module's types.

use crate::error::FlowError;
use async_trait::async_trait;
use base64::Engine;
use std::time::Duration;

/// Base64-encoded image ready to send to an LLM API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageInput {
    /// Base64-encoded image bytes
    pub data: String,
    /// MIME type (e.g., "image/jpeg", "image/png")
    pub media_type: String,
}

impl ImageInput {
    /// Wrap an already base64-encoded payload, as submitted by a browser.
    pub fn from_base64(data: impl Into<String>, media_type: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            media_type: media_type.into(),
        }
    }

    /// Create an `ImageInput` from raw bytes and format string.
    ///
    /// The format is the image format identifier (e.g., "jpeg", "png", "webp").
    pub fn from_bytes(bytes: &[u8], format: &str) -> Self {
        Self {
            data: base64::engine::general_purpose::STANDARD.encode(bytes),
            media_type: media_type_for(format).to_string(),
        }
    }

    /// Return a data URL suitable for OpenAI-style APIs.
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.media_type, self.data)
    }

    /// Approximate decoded size in bytes.
    pub fn decoded_len(&self) -> usize {
        let padding = self.data.bytes().rev().take_while(|b| *b == b'=').count();
        (self.data.len() / 4 * 3).saturating_sub(padding)
    }
}

/// Map a format identifier or file extension to a MIME type.
pub fn media_type_for(format: &str) -> &'static str {
    match format.to_ascii_lowercase().as_str() {
        "jpeg" | "jpg" => "image/jpeg",
        "png" => "image/png",
        "webp" => "image/webp",
        "gif" => "image/gif",
        "heic" => "image/heic",
        other => {
            tracing::warn!("Unknown image format '{other}', defaulting to image/jpeg");
            "image/jpeg"
        }
    }
}

/// A vendor-agnostic generation request.
#[derive(Debug, Clone)]
pub struct LlmRequest {
    /// Final prompt text, after placeholder substitution and augmentation
    pub prompt: String,
    /// Optional system instruction
    pub system_prompt: Option<String>,
    /// At most one image
    pub image: Option<ImageInput>,
    /// Raw user text as submitted, for adapters that want it separately
    pub text: Option<String>,
    /// Sampling temperature, 0.0 to 2.0
    pub temperature: f32,
    /// Maximum tokens to generate
    pub max_tokens: u32,
    /// Provider-specific model identifier
    pub model: String,
}

/// The raw text a model produced.
///
/// Structured sections are derived later by the extractor and are not part
/// of the response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LlmResponse {
    pub raw: String,
}

/// Trait that all LLM providers implement.
///
/// Uses `async_trait` because native async fn in trait is not object-safe
/// (we need `Box<dyn LlmProvider>` for dynamic dispatch).
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Provider identifier for logging (e.g., "anthropic", "google").
    fn name(&self) -> &str;

    /// Make exactly one call to the vendor and return its raw text.
    async fn generate(&self, request: &LlmRequest) -> Result<LlmResponse, FlowError>;
}

/// Resolve `${ENV_VAR}` references in config strings.
pub fn resolve_env_var(value: &str) -> Option<String> {
    if value.starts_with("${") && value.ends_with('}') {
        let var_name = &value[2..value.len() - 1];
        std::env::var(var_name).ok().filter(|v| !v.is_empty())
    } else if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Build the shared HTTP client for an adapter.
///
/// The timeout is a transport setting; a request that exceeds it fails like
/// any other transport error.
pub(crate) fn http_client(provider: &str, timeout: Duration) -> Result<reqwest::Client, FlowError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| FlowError::provider(provider, format!("failed to build HTTP client: {e}")))
}

/// Convert a reqwest send error into a provider error.
pub(crate) fn transport_error(provider: &str, err: reqwest::Error) -> FlowError {
    let message = if err.is_timeout() {
        format!("request timed out: {err}")
    } else if err.is_connect() {
        format!("failed to connect: {err}")
    } else {
        format!("request failed: {err}")
    };
    FlowError::provider(provider, message)
}

/// Turn a non-2xx response into a provider error carrying the status.
pub(crate) async fn status_error(provider: &str, resp: reqwest::Response) -> FlowError {
    let status = resp.status();
    let body = resp.text().await.unwrap_or_default();
    FlowError::Provider {
        provider: provider.to_string(),
        message: format!("HTTP {status}: {body}"),
        status_code: Some(status.as_u16()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_input_from_bytes_jpeg() {
        let input = ImageInput::from_bytes(&[0xFF, 0xD8, 0xFF], "jpeg");
        assert_eq!(input.media_type, "image/jpeg");
        assert!(!input.data.is_empty());
    }

    #[test]
    fn test_image_input_from_bytes_png() {
        let input = ImageInput::from_bytes(&[0x89, 0x50, 0x4E, 0x47], "PNG");
        assert_eq!(input.media_type, "image/png");
    }

    #[test]
    fn test_image_input_data_url() {
        let input = ImageInput::from_base64("AAEC", "image/webp");
        assert_eq!(input.data_url(), "data:image/webp;base64,AAEC");
    }

    #[test]
    fn test_decoded_len_accounts_for_padding() {
        let input = ImageInput::from_bytes(&[1, 2, 3, 4], "png");
        assert_eq!(input.decoded_len(), 4);
        let input = ImageInput::from_bytes(&[1, 2, 3], "png");
        assert_eq!(input.decoded_len(), 3);
    }

    #[test]
    fn test_resolve_env_var() {
        // Non-env-var strings pass through
        assert_eq!(resolve_env_var("plain-key"), Some("plain-key".to_string()));
        // Empty returns None
        assert_eq!(resolve_env_var(""), None);
        // Unset env var returns None
        assert_eq!(resolve_env_var("${DEFINITELY_NOT_SET_XYZ_123}"), None);
    }
}
