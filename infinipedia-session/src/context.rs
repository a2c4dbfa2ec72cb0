//! Session context.
//!
//! Everything the generation tasks share lives here: the provider client,
//! the response cache, the history tracker, the retry policy and the
//! generation options. A context is built once per session and handed to
//! the orchestrator behind an `Arc`.

use std::sync::Arc;

use infinipedia_core::{ArtStyle, ContentProvider, ImageOptions};
use infinipedia_fetch::RetryPolicy;
use infinipedia_providers::build_provider;
use infinipedia_store::{
    DEFAULT_HISTORY_LIMIT, HistoryTracker, KeyValueStore, MemoryKvStore, ResponseCache, Settings,
};
use tracing::debug;

use crate::error::SessionError;

/// Shared dependencies for one session.
#[derive(Clone)]
pub struct SessionContext {
    provider: Arc<dyn ContentProvider>,
    cache: Arc<ResponseCache>,
    history: Arc<HistoryTracker>,
    retry: RetryPolicy,
    art_style: ArtStyle,
    image_options: ImageOptions,
}

impl std::fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionContext")
            .field("provider", &self.provider.id())
            .field("cached", &self.cache.len())
            .field("history", &self.history.entries().len())
            .field("retry", &self.retry)
            .field("art_style", &self.art_style)
            .field("image_options", &self.image_options)
            .finish()
    }
}

impl SessionContext {
    /// Starts building a context around `provider`.
    pub fn builder(provider: Arc<dyn ContentProvider>) -> SessionContextBuilder {
        SessionContextBuilder::new(provider)
    }

    /// Builds a context from user settings.
    ///
    /// The provider is selected from `settings.provider`; history is loaded
    /// from `store`.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Provider`] when the provider cannot be built,
    /// e.g. because no API key is configured.
    pub fn from_settings(
        settings: &Settings,
        store: Arc<dyn KeyValueStore>,
    ) -> Result<Self, SessionError> {
        let provider = build_provider(&settings.provider)?;
        Ok(Self::with_provider(settings, provider, store))
    }

    /// Builds a context from user settings around an existing provider.
    pub fn with_provider(
        settings: &Settings,
        provider: Arc<dyn ContentProvider>,
        store: Arc<dyn KeyValueStore>,
    ) -> Self {
        let history = HistoryTracker::load(store, settings.history_limit);
        Self::builder(provider)
            .history(Arc::new(history))
            .retry(settings.retry.policy())
            .art_style(settings.art_style)
            .image_options(settings.image)
            .build()
    }

    /// The provider client.
    pub fn provider(&self) -> &Arc<dyn ContentProvider> {
        &self.provider
    }

    /// The session response cache.
    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }

    /// The visited-topic history.
    pub fn history(&self) -> &HistoryTracker {
        &self.history
    }

    /// Retry policy applied to every provider call.
    pub fn retry(&self) -> &RetryPolicy {
        &self.retry
    }

    /// Art style for generated art.
    pub fn art_style(&self) -> ArtStyle {
        self.art_style
    }

    /// Image style and aspect ratio.
    pub fn image_options(&self) -> &ImageOptions {
        &self.image_options
    }
}

// ============================================================================
// Builder
// ============================================================================

/// Builder for [`SessionContext`].
///
/// Unset parts default to an empty cache, an in-memory history with the
/// default limit, the default retry policy and default styles.
pub struct SessionContextBuilder {
    provider: Arc<dyn ContentProvider>,
    cache: Option<Arc<ResponseCache>>,
    history: Option<Arc<HistoryTracker>>,
    retry: RetryPolicy,
    art_style: ArtStyle,
    image_options: ImageOptions,
}

impl SessionContextBuilder {
    fn new(provider: Arc<dyn ContentProvider>) -> Self {
        Self {
            provider,
            cache: None,
            history: None,
            retry: RetryPolicy::default(),
            art_style: ArtStyle::default(),
            image_options: ImageOptions::default(),
        }
    }

    /// Shares an existing cache.
    #[must_use]
    pub fn cache(mut self, cache: Arc<ResponseCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Uses an existing history tracker.
    #[must_use]
    pub fn history(mut self, history: Arc<HistoryTracker>) -> Self {
        self.history = Some(history);
        self
    }

    /// Sets the retry policy.
    #[must_use]
    pub fn retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Sets the art style.
    #[must_use]
    pub fn art_style(mut self, style: ArtStyle) -> Self {
        self.art_style = style;
        self
    }

    /// Sets the image options.
    #[must_use]
    pub fn image_options(mut self, options: ImageOptions) -> Self {
        self.image_options = options;
        self
    }

    /// Finishes the context.
    pub fn build(self) -> SessionContext {
        let history = self.history.unwrap_or_else(|| {
            Arc::new(HistoryTracker::load(
                Arc::new(MemoryKvStore::new()),
                DEFAULT_HISTORY_LIMIT,
            ))
        });

        debug!(
            provider = self.provider.id(),
            max_retries = self.retry.max_retries,
            art_style = %self.art_style.as_str(),
            "Session context ready"
        );

        SessionContext {
            provider: self.provider,
            cache: self.cache.unwrap_or_default(),
            history,
            retry: self.retry,
            art_style: self.art_style,
            image_options: self.image_options,
        }
    }
}
