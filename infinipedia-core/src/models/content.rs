//! Generated content types.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use super::topic::Topic;
use crate::error::{ProviderError, ProviderErrorKind};

// ============================================================================
// Content Kind
// ============================================================================

/// The three kinds of content generated for a topic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    /// Streamed textual definition.
    Definition,
    /// Structured ASCII art.
    Art,
    /// Illustrative image.
    Image,
}

impl ContentKind {
    /// Returns the stable lowercase token for this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Definition => "definition",
            Self::Art => "art",
            Self::Image => "image",
        }
    }

    /// Parses a kind token (case-insensitive).
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "definition" => Some(Self::Definition),
            "art" => Some(Self::Art),
            "image" => Some(Self::Image),
            _ => None,
        }
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Prompt
// ============================================================================

/// A rendered prompt for one generation request.
///
/// Direct provider clients send `text`; proxy clients only forward the
/// `topic` and `kind` and let the server render the prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    /// The topic the prompt was rendered for.
    pub topic: Topic,
    /// What the prompt asks for.
    pub kind: ContentKind,
    /// The rendered prompt text.
    pub text: String,
}

impl Prompt {
    /// Creates a prompt.
    pub fn new(topic: Topic, kind: ContentKind, text: impl Into<String>) -> Self {
        Self {
            topic,
            kind,
            text: text.into(),
        }
    }
}

// ============================================================================
// Art
// ============================================================================

/// Generated ASCII art for a topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtResult {
    /// The art block, lines separated by `\n`.
    pub art: String,
}

impl ArtResult {
    /// Creates an art result.
    pub fn new(art: impl Into<String>) -> Self {
        Self { art: art.into() }
    }

    /// Extracts art from a structured-output object validated against
    /// [`OutputSchema::ascii_art`].
    pub fn from_structured(value: &Value) -> Result<Self, ProviderError> {
        value
            .get("art")
            .and_then(Value::as_str)
            .filter(|art| !art.trim().is_empty())
            .map(|art| Self::new(art.trim_end()))
            .ok_or_else(|| {
                ProviderError::new(
                    ProviderErrorKind::MalformedResponse,
                    "structured response has no non-empty `art` field",
                )
            })
    }

    /// Returns the art lines.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.art.lines()
    }
}

// ============================================================================
// Image
// ============================================================================

/// A generated image, base64-encoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageData {
    /// Base64 payload (standard alphabet, padded).
    pub base64: String,
    /// MIME type reported by the provider.
    pub mime_type: String,
}

impl ImageData {
    /// Default MIME type when the provider does not report one.
    pub const DEFAULT_MIME_TYPE: &'static str = "image/png";

    /// Creates image data.
    pub fn new(base64: impl Into<String>, mime_type: Option<String>) -> Self {
        Self {
            base64: base64.into(),
            mime_type: mime_type.unwrap_or_else(|| Self::DEFAULT_MIME_TYPE.to_string()),
        }
    }

    /// Returns a `data:` URL suitable for embedding.
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.base64)
    }

    /// Approximate decoded size in bytes.
    pub fn approx_size(&self) -> usize {
        let padding = self.base64.bytes().rev().take_while(|b| *b == b'=').count();
        (self.base64.len() / 4 * 3).saturating_sub(padding)
    }

    /// File extension matching the MIME type.
    pub fn extension(&self) -> &'static str {
        match self.mime_type.as_str() {
            "image/jpeg" | "image/jpg" => "jpg",
            "image/webp" => "webp",
            "image/gif" => "gif",
            _ => "png",
        }
    }
}

// ============================================================================
// Output Schema
// ============================================================================

/// Contract for a structured (JSON) generation.
///
/// `schema` is sent to the provider as the response schema; `required`
/// lists the fields that must be present and non-empty in the parsed reply.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputSchema {
    /// JSON schema sent to the provider.
    pub schema: Value,
    /// Fields that must be present and non-empty.
    pub required: Vec<&'static str>,
}

impl OutputSchema {
    /// Schema for an `{ "art": string }` object.
    pub fn ascii_art() -> Self {
        Self {
            schema: serde_json::json!({
                "type": "OBJECT",
                "properties": {
                    "art": { "type": "STRING" }
                },
                "required": ["art"]
            }),
            required: vec!["art"],
        }
    }

    /// Validates a parsed reply against the required fields.
    ///
    /// Missing, `null`, blank-string, empty-array and empty-object fields
    /// all fail with [`ProviderErrorKind::MalformedResponse`].
    pub fn validate(&self, value: &Value) -> Result<(), ProviderError> {
        if !value.is_object() {
            return Err(ProviderError::new(
                ProviderErrorKind::MalformedResponse,
                "structured response is not a JSON object",
            ));
        }

        for field in &self.required {
            let present = match value.get(*field) {
                None | Some(Value::Null) => false,
                Some(Value::String(s)) => !s.trim().is_empty(),
                Some(Value::Array(a)) => !a.is_empty(),
                Some(Value::Object(o)) => !o.is_empty(),
                Some(_) => true,
            };
            if !present {
                return Err(ProviderError::new(
                    ProviderErrorKind::MalformedResponse,
                    format!("structured response is missing `{field}`"),
                ));
            }
        }
        Ok(())
    }
}
