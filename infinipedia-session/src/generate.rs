//! Single generation operations.
//!
//! Each operation goes through the retry policy; art and image also go
//! through the response cache. Definitions are never cached, and only the
//! stream setup is retried.

use infinipedia_core::{
    ArtResult, ImageData, OutputSchema, ProviderError, TextStream, Topic, fallback_art, prompts,
};
use infinipedia_store::{CacheKey, CachedResponse};
use tracing::{debug, instrument, warn};

use crate::context::SessionContext;

impl SessionContext {
    /// Generates art for `topic` in the session art style.
    ///
    /// Cached results are returned without calling the provider. Only
    /// successful results are cached.
    ///
    /// # Errors
    ///
    /// Returns the classified provider error after retries.
    #[instrument(skip(self), fields(topic = %topic, provider = self.provider().id()))]
    pub async fn generate_art(&self, topic: &Topic) -> Result<ArtResult, ProviderError> {
        let key = CacheKey::art(topic, self.art_style());
        if let Some(art) = self.cache().art(&key) {
            debug!(key = %key, "Art served from cache");
            return Ok(art);
        }

        let prompt = prompts::ascii_art(topic, self.art_style());
        let schema = OutputSchema::ascii_art();
        let provider = self.provider();

        let value = self
            .retry()
            .run("art", || provider.generate_structured(&prompt, &schema))
            .await?;
        let art = ArtResult::from_structured(&value)?;

        self.cache().set(key, CachedResponse::Art(art.clone()));
        Ok(art)
    }

    /// Generates art, substituting the local fallback on any failure.
    ///
    /// The flag is true when the fallback was used.
    pub async fn art_or_fallback(&self, topic: &Topic) -> (ArtResult, bool) {
        match self.generate_art(topic).await {
            Ok(art) => (art, false),
            Err(error) => {
                warn!(topic = %topic, kind = ?error.kind, error = %error, "Art generation failed, using fallback");
                (fallback_art(topic), true)
            }
        }
    }

    /// Generates an image for `topic` with the session image options.
    ///
    /// `Ok(None)` means the provider produced no image; that outcome is
    /// cached like a success.
    ///
    /// # Errors
    ///
    /// Returns the classified provider error after retries.
    #[instrument(skip(self), fields(topic = %topic, provider = self.provider().id()))]
    pub async fn generate_image(&self, topic: &Topic) -> Result<Option<ImageData>, ProviderError> {
        let options = *self.image_options();
        let key = CacheKey::image(topic, &options);
        if let Some(image) = self.cache().image(&key) {
            debug!(key = %key, "Image served from cache");
            return Ok(image);
        }

        let prompt = prompts::image(topic, &options);
        let provider = self.provider();

        let image = self
            .retry()
            .run("image", || provider.generate_image(&prompt, &options))
            .await?;

        self.cache().set(key, CachedResponse::Image(image.clone()));
        Ok(image)
    }

    /// Generates an image, degrading to absent on any failure.
    pub async fn image_or_absent(&self, topic: &Topic) -> Option<ImageData> {
        self.generate_image(topic).await.unwrap_or_else(|error| {
            warn!(topic = %topic, kind = ?error.kind, error = %error, "Image generation failed");
            None
        })
    }

    /// Opens the definition stream for `topic`.
    ///
    /// # Errors
    ///
    /// Returns the classified provider error if the stream could not be
    /// established after retries. Errors after that point arrive as stream
    /// items and are not retried.
    #[instrument(skip(self), fields(topic = %topic, provider = self.provider().id()))]
    pub async fn open_definition(&self, topic: &Topic) -> Result<TextStream, ProviderError> {
        let prompt = prompts::definition(topic);
        let provider = self.provider();

        self.retry()
            .run("definition", || provider.stream_text(&prompt))
            .await
    }
}
