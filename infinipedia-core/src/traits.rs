//! Trait definitions for Infinipedia.
//!
//! This module defines the contract that content provider clients satisfy.

use async_trait::async_trait;
use futures::stream::BoxStream;
use serde_json::Value;

use crate::error::ProviderError;
use crate::models::{ImageData, ImageOptions, OutputSchema, Prompt};

/// A pull-based stream of text chunks.
///
/// Chunks arrive in provider order. The stream ends when the provider closes
/// it and cannot be restarted; a fresh call is needed to stream again.
pub type TextStream = BoxStream<'static, Result<String, ProviderError>>;

/// Client for an external generative-content service.
///
/// Implementors are responsible for:
/// - Translating prompts into provider requests
/// - Classifying every failure into a [`ProviderErrorKind`] exactly once
/// - Normalizing replies into Infinipedia types
///
/// Implementations hold no state between calls beyond connection pools.
///
/// [`ProviderErrorKind`]: crate::error::ProviderErrorKind
#[async_trait]
pub trait ContentProvider: Send + Sync {
    /// Stable identifier used in logs (e.g. `"gemini"`, `"proxy"`).
    fn id(&self) -> &str;

    /// Opens a streaming text generation.
    ///
    /// Resolves once the stream is established; failures after that point
    /// are yielded as stream items.
    async fn stream_text(&self, prompt: &Prompt) -> Result<TextStream, ProviderError>;

    /// Runs a single-shot structured generation.
    ///
    /// The reply is validated against `schema`; a missing or empty required
    /// field fails with `MalformedResponse`.
    async fn generate_structured(
        &self,
        prompt: &Prompt,
        schema: &OutputSchema,
    ) -> Result<Value, ProviderError>;

    /// Generates an image.
    ///
    /// Returns `Ok(None)` when the provider produced no image candidate.
    async fn generate_image(
        &self,
        prompt: &Prompt,
        options: &ImageOptions,
    ) -> Result<Option<ImageData>, ProviderError>;
}
