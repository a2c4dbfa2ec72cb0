//! Proxy endpoint client.
//!
//! The proxy holds the credential and renders prompts server-side, so the
//! client only forwards `{type, topic}`. Definitions come back as a streamed
//! `text/plain` body and art as `{"art": "..."}`. Images are not offered.

use async_trait::async_trait;
use futures::StreamExt;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, instrument};
use url::Url;

use infinipedia_core::{
    ContentKind, ContentProvider, ImageData, ImageOptions, OutputSchema, Prompt, ProviderError,
    ProviderErrorKind, TextStream,
};
use infinipedia_fetch::{FetchError, HttpClient, HttpSettings, error_from_reqwest, send, utf8_text};

/// Request body accepted by `POST /api/generate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateRequest {
    /// `definition` or `art`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Topic as typed by the user.
    pub topic: String,
}

impl GenerateRequest {
    /// Builds a request for `prompt`.
    pub fn for_prompt(prompt: &Prompt) -> Self {
        Self {
            kind: prompt.kind.as_str().to_string(),
            topic: prompt.topic.as_str().to_string(),
        }
    }
}

/// Calls a proxy endpoint.
#[derive(Debug, Clone)]
pub struct ProxyClient {
    http: HttpClient,
    endpoint: Url,
}

impl ProxyClient {
    /// Creates a client for the given endpoint.
    pub fn new(endpoint: Url, settings: HttpSettings) -> Result<Self, FetchError> {
        Ok(Self {
            http: HttpClient::with_settings(settings)?,
            endpoint,
        })
    }

    /// The endpoint URL.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    fn expect_kind(prompt: &Prompt, kind: ContentKind) -> Result<(), ProviderError> {
        if prompt.kind == kind {
            Ok(())
        } else {
            Err(ProviderError::new(
                ProviderErrorKind::InvalidRequest,
                format!("proxy cannot serve {} with a {} prompt", kind, prompt.kind),
            ))
        }
    }
}

#[async_trait]
impl ContentProvider for ProxyClient {
    fn id(&self) -> &str {
        "proxy"
    }

    #[instrument(skip(self, prompt), fields(topic = %prompt.topic, endpoint = %self.endpoint))]
    async fn stream_text(&self, prompt: &Prompt) -> Result<TextStream, ProviderError> {
        Self::expect_kind(prompt, ContentKind::Definition)?;

        let request = self
            .http
            .streaming()
            .post(self.endpoint.clone())
            .json(&GenerateRequest::for_prompt(prompt));
        let response = send(request).await?;
        debug!("Definition stream opened");

        let bytes = response
            .bytes_stream()
            .map(|chunk| chunk.map_err(|e| error_from_reqwest(&e)));
        Ok(utf8_text(bytes).boxed())
    }

    #[instrument(skip(self, prompt, schema), fields(topic = %prompt.topic, endpoint = %self.endpoint))]
    async fn generate_structured(
        &self,
        prompt: &Prompt,
        schema: &OutputSchema,
    ) -> Result<Value, ProviderError> {
        Self::expect_kind(prompt, ContentKind::Art)?;

        let request = self
            .http
            .single()
            .post(self.endpoint.clone())
            .json(&GenerateRequest::for_prompt(prompt));
        let value: Value = send(request).await?.json().await.map_err(|e| {
            ProviderError::new(
                ProviderErrorKind::MalformedResponse,
                format!("proxy reply: {e}"),
            )
        })?;

        schema.validate(&value)?;
        Ok(value)
    }

    async fn generate_image(
        &self,
        prompt: &Prompt,
        _options: &ImageOptions,
    ) -> Result<Option<ImageData>, ProviderError> {
        debug!(topic = %prompt.topic, "Proxy does not offer images");
        Ok(None)
    }
}
