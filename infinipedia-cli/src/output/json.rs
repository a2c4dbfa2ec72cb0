//! JSON output formatting.

use anyhow::Result;
use infinipedia_core::{ImageData, ProviderErrorKind, Topic, clickable_words};
use infinipedia_session::{ExplorePhase, ExploreState};
use serde::Serialize;

// ============================================================================
// Output Types
// ============================================================================

/// JSON output for a resolved topic.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExploreOutput {
    pub topic: Option<String>,
    pub phase: ExplorePhase,
    pub epoch: u64,
    pub content: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub words: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub art: Option<ArtOutput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<ImageOutput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorOutput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elapsed_ms: Option<u64>,
}

/// Art block.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtOutput {
    pub art: String,
    pub fallback: bool,
}

/// Image summary. The payload itself is only included on request.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageOutput {
    pub mime_type: String,
    pub bytes: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_url: Option<String>,
}

/// Definition failure.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorOutput {
    pub kind: ProviderErrorKind,
    pub message: String,
}

impl ExploreOutput {
    /// Builds the output for a state snapshot.
    pub fn from_state(state: &ExploreState, include_image_data: bool) -> Self {
        let words = if state.phase() == ExplorePhase::Complete {
            clickable_words(&state.content)
                .iter()
                .map(ToString::to_string)
                .collect()
        } else {
            Vec::new()
        };

        Self {
            topic: state.topic.as_ref().map(ToString::to_string),
            phase: state.phase(),
            epoch: state.epoch.value(),
            content: state.content.clone(),
            words,
            art: state.art.as_ref().map(|art| ArtOutput {
                art: art.art.clone(),
                fallback: state.art_is_fallback,
            }),
            image: state
                .image
                .as_ref()
                .map(|image| ImageOutput::new(image, include_image_data)),
            error: state
                .error
                .as_ref()
                .zip(state.error_kind)
                .map(|(message, kind)| ErrorOutput {
                    kind,
                    message: message.clone(),
                }),
            elapsed_ms: state
                .elapsed
                .map(|elapsed| u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)),
        }
    }
}

impl ImageOutput {
    fn new(image: &ImageData, include_data: bool) -> Self {
        Self {
            mime_type: image.mime_type.clone(),
            bytes: image.approx_size(),
            data_url: include_data.then(|| image.data_url()),
        }
    }
}

/// History listing.
#[derive(Debug, Serialize)]
pub struct HistoryOutput {
    pub limit: usize,
    pub entries: Vec<Topic>,
}

// ============================================================================
// JSON Formatter
// ============================================================================

/// JSON formatter.
pub struct JsonFormatter {
    pretty: bool,
}

impl JsonFormatter {
    /// Creates a new JSON formatter.
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    /// Formats any serializable value.
    pub fn format<T: Serialize>(&self, data: &T) -> Result<String> {
        let json = if self.pretty {
            serde_json::to_string_pretty(data)?
        } else {
            serde_json::to_string(data)?
        };
        Ok(json)
    }
}
