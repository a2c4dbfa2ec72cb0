//! Gemini API wire types.
//!
//! Only the fields Infinipedia reads or writes are modelled; everything else
//! in the replies is ignored by serde.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use infinipedia_core::{ImageData, ImageOptions, ProviderError};

use super::error::{api_error, safety_blocked};

/// Finish reasons that mean the output was withheld by content policy.
const SAFETY_FINISH_REASONS: &[&str] = &["SAFETY", "PROHIBITED_CONTENT", "BLOCKLIST", "SPII"];

// ============================================================================
// generateContent / streamGenerateContent
// ============================================================================

/// Request body for `:generateContent` and `:streamGenerateContent`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    /// Conversation turns; Infinipedia always sends one user turn.
    pub contents: Vec<Content>,
    /// Output configuration.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

impl GenerateContentRequest {
    /// Plain text generation.
    pub fn text(prompt: &str) -> Self {
        Self {
            contents: vec![Content::user(prompt)],
            generation_config: None,
        }
    }

    /// JSON output constrained by `schema`.
    pub fn structured(prompt: &str, schema: Value) -> Self {
        Self {
            contents: vec![Content::user(prompt)],
            generation_config: Some(GenerationConfig {
                response_mime_type: Some("application/json".to_string()),
                response_schema: Some(schema),
            }),
        }
    }
}

/// A conversation turn.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Content {
    /// `user` or `model`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// Content parts.
    #[serde(default)]
    pub parts: Vec<Part>,
}

impl Content {
    /// A single-part user turn.
    pub fn user(text: &str) -> Self {
        Self {
            role: Some("user".to_string()),
            parts: vec![Part {
                text: Some(text.to_string()),
            }],
        }
    }
}

/// A content part. Only text parts are used.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Part {
    /// Text payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// Output configuration for structured generation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    /// MIME type of the reply (`application/json`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_mime_type: Option<String>,
    /// Schema the reply must follow.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_schema: Option<Value>,
}

/// Reply (or one streamed chunk) of `generateContent`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    /// Candidates; Infinipedia reads the first.
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    /// Prompt-level feedback, present when the prompt itself was blocked.
    #[serde(default)]
    pub prompt_feedback: Option<PromptFeedback>,
    /// Error object, sent mid-stream when generation fails after headers.
    #[serde(default)]
    pub error: Option<ApiErrorBody>,
}

/// A generated candidate.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    /// Generated content.
    #[serde(default)]
    pub content: Option<Content>,
    /// Why generation stopped.
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Prompt-level feedback.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    /// Set when the prompt was rejected.
    #[serde(default)]
    pub block_reason: Option<String>,
}

/// Google API error object.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiErrorBody {
    /// HTTP-equivalent status code.
    #[serde(default)]
    pub code: Option<u16>,
    /// Human-readable message.
    #[serde(default)]
    pub message: Option<String>,
    /// Canonical status (`RESOURCE_EXHAUSTED`, `UNAVAILABLE`, ...).
    #[serde(default)]
    pub status: Option<String>,
}

impl GenerateContentResponse {
    /// Fails if the reply carries an error or a content-policy block.
    pub fn check(&self) -> Result<(), ProviderError> {
        if let Some(error) = &self.error {
            return Err(api_error(error));
        }
        if let Some(reason) = self
            .prompt_feedback
            .as_ref()
            .and_then(|feedback| feedback.block_reason.as_deref())
        {
            return Err(safety_blocked(&format!("prompt blocked: {reason}")));
        }
        if let Some(reason) = self
            .candidates
            .iter()
            .filter_map(|candidate| candidate.finish_reason.as_deref())
            .find(|reason| SAFETY_FINISH_REASONS.contains(reason))
        {
            return Err(safety_blocked(&format!("output stopped: {reason}")));
        }
        Ok(())
    }

    /// Concatenated text of the first candidate.
    pub fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|candidate| candidate.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|part| part.text.as_deref())
                    .collect()
            })
            .unwrap_or_default()
    }
}

// ============================================================================
// Imagen :predict
// ============================================================================

/// Request body for Imagen `:predict`.
#[derive(Debug, Clone, Serialize)]
pub struct PredictRequest {
    /// One instance per prompt.
    pub instances: Vec<PredictInstance>,
    /// Sampling parameters.
    pub parameters: PredictParameters,
}

impl PredictRequest {
    /// One image for `prompt`.
    pub fn single(prompt: &str, options: &ImageOptions) -> Self {
        Self {
            instances: vec![PredictInstance {
                prompt: prompt.to_string(),
            }],
            parameters: PredictParameters {
                sample_count: 1,
                aspect_ratio: options.aspect_ratio.as_str().to_string(),
            },
        }
    }
}

/// A prompt instance.
#[derive(Debug, Clone, Serialize)]
pub struct PredictInstance {
    /// Prompt text.
    pub prompt: String,
}

/// Imagen parameters.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictParameters {
    /// Number of images.
    pub sample_count: u32,
    /// Aspect ratio as `W:H`.
    pub aspect_ratio: String,
}

/// Reply of Imagen `:predict`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PredictResponse {
    /// Generated images. Filtered images are omitted entirely.
    #[serde(default)]
    pub predictions: Vec<Prediction>,
}

/// A generated image.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prediction {
    /// Base64 image bytes.
    #[serde(default)]
    pub bytes_base64_encoded: Option<String>,
    /// MIME type.
    #[serde(default)]
    pub mime_type: Option<String>,
    /// Set when the responsible-AI filter removed the image.
    #[serde(default)]
    pub rai_filtered_reason: Option<String>,
}

impl PredictResponse {
    /// The first prediction that carries image bytes.
    pub fn first_image(self) -> Option<ImageData> {
        self.predictions.into_iter().find_map(|prediction| {
            prediction
                .bytes_base64_encoded
                .filter(|bytes| !bytes.is_empty())
                .map(|bytes| ImageData::new(bytes, prediction.mime_type))
        })
    }
}
