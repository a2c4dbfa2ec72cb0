//! Gemini (Google) provider.
//!
//! Talks to the Generative Language API with an API key sent in the
//! `x-goog-api-key` header.
//!
//! ## API Endpoints
//!
//! - `POST /models/{text}:streamGenerateContent?alt=sse` - definitions
//! - `POST /models/{text}:generateContent` - ASCII art, with
//!   `responseMimeType: application/json` and a `responseSchema`
//! - `POST /models/{image}:predict` - Imagen illustrations
//!
//! ## Safety
//!
//! A blocked prompt comes back as `promptFeedback.blockReason`; withheld
//! output as a candidate with `finishReason: SAFETY`. Both map to
//! `ProviderErrorKind::SafetyBlocked`.

mod api;
mod client;
mod error;

pub use api::{
    ApiErrorBody, Candidate, Content, GenerateContentRequest, GenerateContentResponse,
    GenerationConfig, Part, PredictInstance, PredictParameters, PredictRequest, PredictResponse,
    Prediction, PromptFeedback,
};
pub use client::{DEFAULT_API_BASE, GeminiClient};
