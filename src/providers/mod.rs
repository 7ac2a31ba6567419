//! Remote inference abstraction layer.
//!
//! Defines the [`TextGenerator`] and [`ImageGenerator`] traits and the shared
//! request/response types used by their implementations.
//!
//! One provider is implemented:
//! - [`gemini::GeminiClient`]: Gemini `generateContent` for structured text
//!   and Imagen `predict` for images.

use async_trait::async_trait;
use base64::Engine as _;
use regex::Regex;

use crate::prompt::TextRequest;

pub mod gemini;

/// Number of images requested per call.
pub const IMAGE_COUNT: u32 = 1;
/// Output format of generated images.
pub const IMAGE_MIME_TYPE: &str = "image/jpeg";
/// Portrait aspect ratio of generated images.
pub const IMAGE_ASPECT_RATIO: &str = "3:4";

// ---------------------------------------------------------------------------
// Request / Response
// ---------------------------------------------------------------------------

/// A request for one generated image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRequest {
    /// Image prompt.
    pub prompt: String,
    /// Number of images.
    pub count: u32,
    /// Requested output MIME type.
    pub mime_type: String,
    /// Requested aspect ratio (`W:H`).
    pub aspect_ratio: String,
}

impl ImageRequest {
    /// Portrait JPEG request for a single image.
    pub fn portrait(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            count: IMAGE_COUNT,
            mime_type: IMAGE_MIME_TYPE.to_owned(),
            aspect_ratio: IMAGE_ASPECT_RATIO.to_owned(),
        }
    }
}

/// A decoded image returned by an [`ImageGenerator`].
#[derive(Clone, PartialEq, Eq)]
pub struct GeneratedImage {
    /// MIME type of `bytes`.
    pub mime_type: String,
    /// Raw image bytes.
    pub bytes: Vec<u8>,
}

impl std::fmt::Debug for GeneratedImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeneratedImage")
            .field("mime_type", &self.mime_type)
            .field("bytes", &self.bytes.len())
            .finish()
    }
}

impl GeneratedImage {
    /// Decode a base64 payload.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::MissingImage`] for an empty payload and
    /// [`ProviderError::Parse`] when it is not valid base64.
    pub fn from_base64(mime_type: &str, encoded: &str) -> Result<Self, ProviderError> {
        let trimmed = encoded.trim();
        if trimmed.is_empty() {
            return Err(ProviderError::MissingImage);
        }
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(trimmed)
            .map_err(|e| ProviderError::Parse(format!("invalid image base64: {e}")))?;
        if bytes.is_empty() {
            return Err(ProviderError::MissingImage);
        }
        Ok(Self {
            mime_type: mime_type.to_owned(),
            bytes,
        })
    }

    /// Displayable `data:` URI.
    pub fn data_uri(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.mime_type,
            base64::engine::general_purpose::STANDARD.encode(&self.bytes)
        )
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors returned by inference providers.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// HTTP transport failure.
    #[error("provider request failed: {0}")]
    Request(#[from] reqwest::Error),
    /// Response did not match expected wire format.
    #[error("provider response parse error: {0}")]
    Parse(String),
    /// Upstream provider responded with an error status.
    #[error("provider returned non-success status {status}: {body}")]
    HttpStatus {
        /// HTTP status code.
        status: u16,
        /// Sanitized response body.
        body: String,
    },
    /// The text response carried no text.
    #[error("provider returned no text")]
    EmptyResponse,
    /// The image response carried no image bytes.
    #[error("provider returned no image bytes")]
    MissingImage,
}

// ---------------------------------------------------------------------------
// HTTP helpers
// ---------------------------------------------------------------------------

/// Check HTTP response status and return body text or a structured error.
///
/// # Errors
///
/// Returns `ProviderError::Request` on transport failure, `ProviderError::HttpStatus` on non-2xx.
pub async fn check_http_response(response: reqwest::Response) -> Result<String, ProviderError> {
    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        return Err(ProviderError::HttpStatus {
            status: status.as_u16(),
            body: sanitize_http_error_body(&body),
        });
    }
    Ok(body)
}

/// Collapse whitespace, redact credential-like tokens and truncate.
pub fn sanitize_http_error_body(raw: &str) -> String {
    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");

    let mut sanitized = collapsed;
    for pattern in [
        r"AIza[0-9A-Za-z_\-]{30,}",
        r"ya29\.[0-9A-Za-z_\-]{20,}",
        r"sk-[A-Za-z0-9]{32,}",
    ] {
        if let Ok(regex) = Regex::new(pattern) {
            sanitized = regex.replace_all(&sanitized, "[REDACTED]").into_owned();
        }
    }

    const MAX_ERROR_BODY_CHARS: usize = 256;
    if sanitized.chars().count() > MAX_ERROR_BODY_CHARS {
        let shortened = sanitized
            .chars()
            .take(MAX_ERROR_BODY_CHARS)
            .collect::<String>();
        return format!("{shortened}...[truncated]");
    }

    sanitized
}

// ---------------------------------------------------------------------------
// Traits
// ---------------------------------------------------------------------------

/// Structured text generation constrained by a JSON schema.
///
/// Implementations must be `Send + Sync`; one instance is built at startup
/// and shared by every pipeline run.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate JSON text conforming to `request.response_schema`.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError`] on API, network, or wire-format failure.
    async fn generate_json(&self, request: &TextRequest) -> Result<String, ProviderError>;

    /// Model identifier used for text.
    fn text_model(&self) -> &str;
}

/// Image generation.
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    /// Generate one image.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError`] on API, network, or wire-format failure, or
    /// when no image bytes come back.
    async fn generate_image(&self, request: &ImageRequest) -> Result<GeneratedImage, ProviderError>;

    /// Model identifier used for images.
    fn image_model(&self) -> &str;
}
