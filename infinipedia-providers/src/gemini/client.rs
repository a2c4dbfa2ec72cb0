//! Direct Gemini client.

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use futures::{StreamExt, TryStreamExt, future};
use serde_json::Value;
use tracing::{debug, instrument, warn};

use infinipedia_core::{
    ContentProvider, ImageData, ImageOptions, OutputSchema, Prompt, ProviderError, TextStream,
};
use infinipedia_fetch::{FetchError, HttpClient, HttpSettings, error_from_reqwest, send, sse_data};

use super::api::{GenerateContentRequest, GenerateContentResponse, PredictRequest, PredictResponse};
use super::error::malformed;
use crate::config::ModelConfig;

/// Generative Language API base URL.
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Calls the Gemini API directly with an API key.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: HttpClient,
    api_key: String,
    api_base: String,
    models: ModelConfig,
}

impl GeminiClient {
    /// Creates a client.
    pub fn new(
        api_key: impl Into<String>,
        models: ModelConfig,
        settings: HttpSettings,
    ) -> Result<Self, FetchError> {
        Ok(Self {
            http: HttpClient::with_settings(settings)?,
            api_key: api_key.into(),
            api_base: DEFAULT_API_BASE.to_string(),
            models,
        })
    }

    /// Points the client at a different API base (tests, regional endpoints).
    #[must_use]
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    fn endpoint(&self, model: &str, method: &str) -> String {
        format!("{}/models/{model}:{method}", self.api_base)
    }
}

/// Parses one SSE payload into its text delta.
fn parse_stream_event(data: &str) -> Result<String, ProviderError> {
    let chunk: GenerateContentResponse =
        serde_json::from_str(data).map_err(|e| malformed("stream chunk", e))?;
    chunk.check()?;
    Ok(chunk.text())
}

/// Removes a Markdown code fence some models wrap JSON output in.
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let inner = inner.strip_prefix("json").unwrap_or(inner);
    inner.strip_suffix("```").unwrap_or(inner).trim()
}

#[async_trait]
impl ContentProvider for GeminiClient {
    fn id(&self) -> &str {
        "gemini"
    }

    #[instrument(skip(self, prompt), fields(topic = %prompt.topic, model = %self.models.text))]
    async fn stream_text(&self, prompt: &Prompt) -> Result<TextStream, ProviderError> {
        let url = format!("{}?alt=sse", self.endpoint(&self.models.text, "streamGenerateContent"));
        let request = self
            .http
            .streaming()
            .post(url)
            .header(API_KEY_HEADER, &self.api_key)
            .json(&GenerateContentRequest::text(&prompt.text));

        let response = send(request).await?;
        debug!("Definition stream opened");

        let bytes = response
            .bytes_stream()
            .map(|chunk| chunk.map_err(|e| error_from_reqwest(&e)));

        let stream = sse_data(bytes)
            .and_then(|data| future::ready(parse_stream_event(&data)))
            .try_filter(|text| future::ready(!text.is_empty()));

        Ok(stream.boxed())
    }

    #[instrument(skip(self, prompt, schema), fields(topic = %prompt.topic, model = %self.models.text))]
    async fn generate_structured(
        &self,
        prompt: &Prompt,
        schema: &OutputSchema,
    ) -> Result<Value, ProviderError> {
        let url = self.endpoint(&self.models.text, "generateContent");
        let request = self
            .http
            .single()
            .post(url)
            .header(API_KEY_HEADER, &self.api_key)
            .json(&GenerateContentRequest::structured(&prompt.text, schema.schema.clone()));

        let reply: GenerateContentResponse = send(request)
            .await?
            .json()
            .await
            .map_err(|e| malformed("generateContent reply", e))?;
        reply.check()?;

        let text = reply.text();
        let value: Value = serde_json::from_str(strip_code_fence(&text))
            .map_err(|e| malformed("structured output", e))?;
        schema.validate(&value)?;

        debug!("Structured output received");
        Ok(value)
    }

    #[instrument(skip(self, prompt, options), fields(topic = %prompt.topic, model = %self.models.image))]
    async fn generate_image(
        &self,
        prompt: &Prompt,
        options: &ImageOptions,
    ) -> Result<Option<ImageData>, ProviderError> {
        let url = self.endpoint(&self.models.image, "predict");
        let request = self
            .http
            .single()
            .post(url)
            .header(API_KEY_HEADER, &self.api_key)
            .json(&PredictRequest::single(&prompt.text, options));

        let reply: PredictResponse = send(request)
            .await?
            .json()
            .await
            .map_err(|e| malformed("predict reply", e))?;

        let Some(image) = reply.first_image() else {
            warn!("No image candidate in reply");
            return Ok(None);
        };

        STANDARD
            .decode(image.base64.as_bytes())
            .map_err(|e| malformed("image payload", e))?;

        debug!(mime = %image.mime_type, bytes = image.approx_size(), "Image received");
        Ok(Some(image))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use infinipedia_core::ProviderErrorKind;

    fn client() -> GeminiClient {
        GeminiClient::new("test-key", ModelConfig::default(), HttpSettings::default()).unwrap()
    }

    #[test]
    fn test_endpoint_format() {
        let client = client().with_api_base("http://localhost:9999/v1beta/");
        assert_eq!(
            client.endpoint("gemini-2.5-flash", "generateContent"),
            "http://localhost:9999/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }

    #[test]
    fn test_parse_stream_event() {
        let data = r#"{"candidates":[{"content":{"parts":[{"text":"Hello"}]}}]}"#;
        assert_eq!(parse_stream_event(data).unwrap(), "Hello");

        let err = parse_stream_event("not json").unwrap_err();
        assert_eq!(err.kind, ProviderErrorKind::MalformedResponse);
    }

    #[test]
    fn test_strip_code_fence() {
        assert_eq!(strip_code_fence("```json\n{\"art\":\"x\"}\n```"), "{\"art\":\"x\"}");
        assert_eq!(strip_code_fence("  {\"art\":\"x\"} "), "{\"art\":\"x\"}");
    }
}
