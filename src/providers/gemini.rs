//! Gemini provider: `models/{model}:generateContent` for structured text and
//! `models/{model}:predict` (Imagen) for images.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::config::GeminiConfig;
use crate::prompt::TextRequest;

use super::{
    check_http_response, GeneratedImage, ImageGenerator, ImageRequest, ProviderError,
    TextGenerator,
};

const API_KEY_HEADER: &str = "x-goog-api-key";
const JSON_MIME_TYPE: &str = "application/json";

// ---------------------------------------------------------------------------
// Wire types (pub for integration testing)
// ---------------------------------------------------------------------------

/// `generateContent` request body.
#[doc(hidden)]
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    /// Conversation contents; a single user turn here.
    pub contents: Vec<GeminiContent>,
    /// Output constraints.
    pub generation_config: GenerationConfig,
}

/// One content turn.
#[doc(hidden)]
#[derive(Debug, Serialize)]
pub struct GeminiContent {
    /// Author role.
    pub role: String,
    /// Text parts.
    pub parts: Vec<GeminiPart>,
}

/// A text part.
#[doc(hidden)]
#[derive(Debug, Serialize)]
pub struct GeminiPart {
    /// Text content.
    pub text: String,
}

/// Structured-output configuration.
#[doc(hidden)]
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    /// Always `application/json`.
    pub response_mime_type: String,
    /// Schema the output must follow.
    pub response_schema: Value,
}

/// `generateContent` response body.
#[doc(hidden)]
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    /// Candidates; the first one is used.
    #[serde(default)]
    pub candidates: Vec<GeminiCandidate>,
}

/// A response candidate.
#[doc(hidden)]
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiCandidate {
    /// Generated content, absent when blocked.
    pub content: Option<GeminiCandidateContent>,
    /// Why generation stopped.
    pub finish_reason: Option<String>,
}

/// Content of a candidate.
#[doc(hidden)]
#[derive(Debug, Deserialize)]
pub struct GeminiCandidateContent {
    /// Response parts.
    #[serde(default)]
    pub parts: Vec<GeminiResponsePart>,
}

/// A response part.
#[doc(hidden)]
#[derive(Debug, Deserialize)]
pub struct GeminiResponsePart {
    /// Text, if this is a text part.
    pub text: Option<String>,
}

/// Imagen `predict` request body.
#[doc(hidden)]
#[derive(Debug, Serialize)]
pub struct PredictRequest {
    /// Prompt instances.
    pub instances: Vec<PredictInstance>,
    /// Generation parameters.
    pub parameters: PredictParameters,
}

/// A prompt instance.
#[doc(hidden)]
#[derive(Debug, Serialize)]
pub struct PredictInstance {
    /// Image prompt.
    pub prompt: String,
}

/// Imagen generation parameters.
#[doc(hidden)]
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictParameters {
    /// Number of images.
    pub sample_count: u32,
    /// Aspect ratio, e.g. `3:4`.
    pub aspect_ratio: String,
    /// Output encoding.
    pub output_options: OutputOptions,
}

/// Imagen output encoding.
#[doc(hidden)]
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputOptions {
    /// Output MIME type.
    pub mime_type: String,
}

/// Imagen `predict` response body.
#[doc(hidden)]
#[derive(Debug, Deserialize)]
pub struct PredictResponse {
    /// Generated images.
    #[serde(default)]
    pub predictions: Vec<Prediction>,
}

/// A generated image.
#[doc(hidden)]
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prediction {
    /// Base64 image bytes.
    pub bytes_base64_encoded: Option<String>,
    /// MIME type reported by the service.
    pub mime_type: Option<String>,
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Gemini API client serving both text and image generation.
#[derive(Clone)]
pub struct GeminiClient {
    base_url: String,
    text_model: String,
    image_model: String,
    api_key: String,
    client: reqwest::Client,
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("base_url", &self.base_url)
            .field("text_model", &self.text_model)
            .field("image_model", &self.image_model)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

impl GeminiClient {
    /// Create a client for explicit endpoints and models.
    pub fn new(
        base_url: impl Into<String>,
        text_model: impl Into<String>,
        image_model: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_owned(),
            text_model: text_model.into(),
            image_model: image_model.into(),
            api_key: api_key.into(),
            client: reqwest::Client::new(),
        }
    }

    /// Create a client from configuration and a resolved API key.
    pub fn from_config(config: &GeminiConfig, api_key: impl Into<String>) -> Self {
        Self::new(
            config.base_url.clone(),
            config.text_model.clone(),
            config.image_model.clone(),
            api_key,
        )
    }

    /// Full URL of a model method.
    pub fn endpoint(&self, model: &str, method: &str) -> String {
        format!("{}/models/{model}:{method}", self.base_url)
    }

    async fn post_json<T: Serialize + ?Sized>(
        &self,
        url: &str,
        body: &T,
    ) -> Result<String, ProviderError> {
        let response = self
            .client
            .post(url)
            .header("content-type", JSON_MIME_TYPE)
            .header(API_KEY_HEADER, &self.api_key)
            .json(body)
            .send()
            .await?;
        check_http_response(response).await
    }
}

// ---------------------------------------------------------------------------
// Request / Response builders (pub for integration testing)
// ---------------------------------------------------------------------------

/// Build a `generateContent` request.
#[doc(hidden)]
pub fn build_text_request(request: &TextRequest) -> GenerateContentRequest {
    GenerateContentRequest {
        contents: vec![GeminiContent {
            role: "user".to_owned(),
            parts: vec![GeminiPart {
                text: request.prompt.clone(),
            }],
        }],
        generation_config: GenerationConfig {
            response_mime_type: JSON_MIME_TYPE.to_owned(),
            response_schema: request.response_schema.clone(),
        },
    }
}

/// Extract the text of the first candidate.
///
/// # Errors
///
/// Returns `ProviderError::Parse` for malformed bodies and
/// `ProviderError::EmptyResponse` when there is no text.
#[doc(hidden)]
pub fn parse_text_response(body: &str) -> Result<String, ProviderError> {
    let resp: GenerateContentResponse =
        serde_json::from_str(body).map_err(|e| ProviderError::Parse(e.to_string()))?;

    let candidate = resp
        .candidates
        .into_iter()
        .next()
        .ok_or(ProviderError::EmptyResponse)?;

    if let Some(reason) = candidate.finish_reason.as_deref() {
        debug!(finish_reason = reason, "text candidate finished");
    }

    let text: String = candidate
        .content
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(ProviderError::EmptyResponse);
    }
    Ok(text)
}

/// Build an Imagen `predict` request.
#[doc(hidden)]
pub fn build_image_request(request: &ImageRequest) -> PredictRequest {
    PredictRequest {
        instances: vec![PredictInstance {
            prompt: request.prompt.clone(),
        }],
        parameters: PredictParameters {
            sample_count: request.count,
            aspect_ratio: request.aspect_ratio.clone(),
            output_options: OutputOptions {
                mime_type: request.mime_type.clone(),
            },
        },
    }
}

/// Decode the first prediction of an Imagen response.
///
/// # Errors
///
/// Returns `ProviderError::Parse` for malformed bodies or base64, and
/// `ProviderError::MissingImage` when no bytes are present.
#[doc(hidden)]
pub fn parse_image_response(body: &str, requested_mime: &str) -> Result<GeneratedImage, ProviderError> {
    let resp: PredictResponse =
        serde_json::from_str(body).map_err(|e| ProviderError::Parse(e.to_string()))?;

    let prediction = resp
        .predictions
        .into_iter()
        .next()
        .ok_or(ProviderError::MissingImage)?;

    let encoded = prediction
        .bytes_base64_encoded
        .ok_or(ProviderError::MissingImage)?;
    let mime = prediction
        .mime_type
        .unwrap_or_else(|| requested_mime.to_owned());
    GeneratedImage::from_base64(&mime, &encoded)
}

// ---------------------------------------------------------------------------
// Trait impls
// ---------------------------------------------------------------------------

#[async_trait::async_trait]
impl TextGenerator for GeminiClient {
    async fn generate_json(&self, request: &TextRequest) -> Result<String, ProviderError> {
        let url = self.endpoint(&self.text_model, "generateContent");
        debug!(model = %self.text_model, prompt_chars = request.prompt.len(), "requesting analysis");
        let payload = self.post_json(&url, &build_text_request(request)).await?;
        parse_text_response(&payload)
    }

    fn text_model(&self) -> &str {
        &self.text_model
    }
}

#[async_trait::async_trait]
impl ImageGenerator for GeminiClient {
    async fn generate_image(&self, request: &ImageRequest) -> Result<GeneratedImage, ProviderError> {
        let url = self.endpoint(&self.image_model, "predict");
        debug!(model = %self.image_model, aspect = %request.aspect_ratio, "requesting image");
        let payload = self.post_json(&url, &build_image_request(request)).await?;
        parse_image_response(&payload, &request.mime_type)
    }

    fn image_model(&self) -> &str {
        &self.image_model
    }
}
