//! Request handlers.

use std::sync::Arc;

use axum::Json;
use axum::body::{Body, Bytes};
use axum::extract::State;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use futures::TryStreamExt;
use serde::Deserialize;
use tracing::{info, instrument, warn};

use infinipedia_core::{
    ArtResult, ArtStyle, ContentKind, ContentProvider, OutputSchema, Topic, prompts,
};

use crate::error::ProxyError;
use crate::state::ProxyState;

/// Body of `POST /api/generate`.
///
/// Both fields are optional at the JSON level so that a missing field maps
/// to a specific 400 message rather than a generic parse failure.
#[derive(Debug, Deserialize)]
pub struct GenerateBody {
    /// `definition` or `art`.
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    /// Topic as typed by the user.
    #[serde(default)]
    pub topic: Option<String>,
}

impl GenerateBody {
    /// Validates the body into a kind and a topic.
    ///
    /// # Errors
    ///
    /// Returns a 400-class error for a blank topic or an unsupported type.
    pub fn validate(&self) -> Result<(ContentKind, Topic), ProxyError> {
        let topic = self
            .topic
            .as_deref()
            .and_then(Topic::parse)
            .ok_or(ProxyError::InvalidTopic)?;

        let raw_kind = self.kind.as_deref().unwrap_or_default();
        match ContentKind::parse(raw_kind) {
            Some(kind @ (ContentKind::Definition | ContentKind::Art)) => Ok((kind, topic)),
            _ => Err(ProxyError::UnknownType(raw_kind.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// POST /api/generate
// ---------------------------------------------------------------------------

/// Generates a definition (streamed text) or art (JSON) for a topic.
#[instrument(skip_all)]
pub async fn generate(State(state): State<ProxyState>, body: Bytes) -> Result<Response, ProxyError> {
    let request: GenerateBody = serde_json::from_slice(&body)?;
    let (kind, topic) = request.validate()?;

    let provider = state.provider().ok_or(ProxyError::MissingCredential)?;
    info!(kind = %kind, topic = %topic, "Generate request");

    if kind == ContentKind::Art {
        art(&state, provider, &topic).await
    } else {
        definition(&state, provider, topic).await
    }
}

async fn art(
    state: &ProxyState,
    provider: &Arc<dyn ContentProvider>,
    topic: &Topic,
) -> Result<Response, ProxyError> {
    let prompt = prompts::ascii_art(topic, ArtStyle::default());
    let schema = OutputSchema::ascii_art();
    let value = state
        .retry()
        .run("proxy art", || provider.generate_structured(&prompt, &schema))
        .await
        .inspect_err(|e| warn!(topic = %topic, error = %e, "Art generation failed"))?;
    let art = ArtResult::from_structured(&value)?;
    Ok(Json(art).into_response())
}

async fn definition(
    state: &ProxyState,
    provider: &Arc<dyn ContentProvider>,
    topic: Topic,
) -> Result<Response, ProxyError> {
    let prompt = prompts::definition(&topic);
    let stream = state
        .retry()
        .run("proxy definition", || provider.stream_text(&prompt))
        .await
        .inspect_err(|e| warn!(topic = %topic, error = %e, "Definition stream failed"))?;

    let stream = stream.inspect_err(move |e| {
        warn!(topic = %topic, error = %e, "Definition stream aborted");
    });

    Ok((
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        Body::from_stream(stream),
    )
        .into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(json: &str) -> GenerateBody {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_validate_accepts_known_types() {
        let (kind, topic) = body(r#"{"type": "definition", "topic": " Gravity "}"#)
            .validate()
            .unwrap();
        assert_eq!(kind, ContentKind::Definition);
        assert_eq!(topic.as_str(), "Gravity");

        let (kind, _) = body(r#"{"type": "art", "topic": "Cat"}"#).validate().unwrap();
        assert_eq!(kind, ContentKind::Art);
    }

    #[test]
    fn test_validate_rejects_bad_requests() {
        assert!(matches!(
            body(r#"{"type": "art"}"#).validate(),
            Err(ProxyError::InvalidTopic)
        ));
        assert!(matches!(
            body(r#"{"type": "art", "topic": "   "}"#).validate(),
            Err(ProxyError::InvalidTopic)
        ));
        assert!(matches!(
            body(r#"{"type": "image", "topic": "Cat"}"#).validate(),
            Err(ProxyError::UnknownType(kind)) if kind == "image"
        ));
        assert!(matches!(
            body(r#"{"topic": "Cat"}"#).validate(),
            Err(ProxyError::UnknownType(_))
        ));
    }
}
