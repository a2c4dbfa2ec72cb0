//! Scripted provider shared by the session tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use futures::StreamExt;
use futures::stream;
use infinipedia_core::{
    ContentProvider, ImageData, ImageOptions, OutputSchema, Prompt, ProviderError,
    ProviderErrorKind, TextStream,
};
use serde_json::{Value, json};

/// Scripted definition for one topic.
#[derive(Debug, Clone)]
pub struct DefinitionScript {
    /// Chunks yielded in order.
    pub chunks: Vec<String>,
    /// Delay before each chunk.
    pub chunk_delay: Duration,
    /// Error yielded after the chunks, if any.
    pub error_after: Option<ProviderErrorKind>,
    /// Error returned when opening the stream, if any.
    pub open_error: Option<ProviderErrorKind>,
}

impl DefinitionScript {
    pub fn chunks<I, S>(chunks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            chunks: chunks.into_iter().map(Into::into).collect(),
            chunk_delay: Duration::from_millis(10),
            error_after: None,
            open_error: None,
        }
    }

    pub fn failing(kind: ProviderErrorKind) -> Self {
        Self {
            open_error: Some(kind),
            ..Self::chunks(Vec::<String>::new())
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.chunk_delay = delay;
        self
    }

    pub fn with_error_after(mut self, kind: ProviderErrorKind) -> Self {
        self.error_after = Some(kind);
        self
    }
}

/// Provider whose replies are scripted per topic.
#[derive(Debug, Default)]
pub struct ScriptedProvider {
    definitions: Mutex<HashMap<String, DefinitionScript>>,
    art: Mutex<HashMap<String, Result<String, ProviderErrorKind>>>,
    images: Mutex<HashMap<String, Result<Option<ImageData>, ProviderErrorKind>>>,
    art_delay: Mutex<Duration>,
    image_delay: Mutex<Duration>,
    pub stream_calls: AtomicU32,
    pub art_calls: AtomicU32,
    pub image_calls: AtomicU32,
}

impl ScriptedProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn definition(self, topic: &str, script: DefinitionScript) -> Self {
        self.definitions.lock().unwrap().insert(topic.to_lowercase(), script);
        self
    }

    pub fn art(self, topic: &str, reply: Result<&str, ProviderErrorKind>) -> Self {
        self.art
            .lock()
            .unwrap()
            .insert(topic.to_lowercase(), reply.map(str::to_string));
        self
    }

    pub fn image(self, topic: &str, reply: Result<Option<ImageData>, ProviderErrorKind>) -> Self {
        self.images.lock().unwrap().insert(topic.to_lowercase(), reply);
        self
    }

    pub fn art_delay(self, delay: Duration) -> Self {
        *self.art_delay.lock().unwrap() = delay;
        self
    }

    pub fn image_delay(self, delay: Duration) -> Self {
        *self.image_delay.lock().unwrap() = delay;
        self
    }

    pub fn stream_count(&self) -> u32 {
        self.stream_calls.load(Ordering::SeqCst)
    }

    pub fn art_count(&self) -> u32 {
        self.art_calls.load(Ordering::SeqCst)
    }

    pub fn image_count(&self) -> u32 {
        self.image_calls.load(Ordering::SeqCst)
    }
}

fn error(kind: ProviderErrorKind) -> ProviderError {
    ProviderError::new(kind, format!("scripted {kind}"))
}

#[async_trait]
impl ContentProvider for ScriptedProvider {
    fn id(&self) -> &str {
        "scripted"
    }

    async fn stream_text(&self, prompt: &Prompt) -> Result<TextStream, ProviderError> {
        self.stream_calls.fetch_add(1, Ordering::SeqCst);
        let script = self
            .definitions
            .lock()
            .unwrap()
            .get(&prompt.topic.key())
            .cloned()
            .unwrap_or_else(|| DefinitionScript::chunks([format!("About {}.", prompt.topic)]));

        if let Some(kind) = script.open_error {
            return Err(error(kind));
        }

        let delay = script.chunk_delay;
        let chunks = stream::iter(script.chunks.into_iter().map(Ok));
        let tail = stream::iter(script.error_after.map(|kind| Err(error(kind))));
        Ok(chunks
            .chain(tail)
            .then(move |item| async move {
                tokio::time::sleep(delay).await;
                item
            })
            .boxed())
    }

    async fn generate_structured(
        &self,
        prompt: &Prompt,
        _schema: &OutputSchema,
    ) -> Result<Value, ProviderError> {
        self.art_calls.fetch_add(1, Ordering::SeqCst);
        let delay = *self.art_delay.lock().unwrap();
        tokio::time::sleep(delay).await;

        let reply = self
            .art
            .lock()
            .unwrap()
            .get(&prompt.topic.key())
            .cloned()
            .unwrap_or_else(|| Ok(format!("[{}]", prompt.topic)));
        reply.map(|art| json!({ "art": art })).map_err(error)
    }

    async fn generate_image(
        &self,
        prompt: &Prompt,
        _options: &ImageOptions,
    ) -> Result<Option<ImageData>, ProviderError> {
        self.image_calls.fetch_add(1, Ordering::SeqCst);
        let delay = *self.image_delay.lock().unwrap();
        tokio::time::sleep(delay).await;

        let reply = self
            .images
            .lock()
            .unwrap()
            .get(&prompt.topic.key())
            .cloned()
            .unwrap_or_else(|| Ok(Some(ImageData::new("aW1n", Some("image/png".into())))));
        reply.map_err(error)
    }
}
