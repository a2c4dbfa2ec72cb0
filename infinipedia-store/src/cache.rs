//! Session-scoped response cache for art and images.
//!
//! Definitions are never cached. Entries never expire; the cache lives as
//! long as the session.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Mutex, PoisonError};

use infinipedia_core::{ArtResult, ArtStyle, ContentKind, ImageData, ImageOptions, Topic};
use tracing::trace;

/// Deterministic composite key: `kind:topic-lowercase[:param=value...]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    fn new(kind: ContentKind, topic: &Topic) -> Self {
        Self(format!("{}:{}", kind.as_str(), topic.key()))
    }

    fn with_param(mut self, name: &str, value: &str) -> Self {
        self.0.push(':');
        self.0.push_str(name);
        self.0.push('=');
        self.0.push_str(value);
        self
    }

    /// Key for art in the given style.
    pub fn art(topic: &Topic, style: ArtStyle) -> Self {
        Self::new(ContentKind::Art, topic).with_param("style", style.as_str())
    }

    /// Key for an image with the given options.
    pub fn image(topic: &Topic, options: &ImageOptions) -> Self {
        Self::new(ContentKind::Image, topic)
            .with_param("style", options.style.as_str())
            .with_param("aspect", options.aspect_ratio.as_str())
    }

    /// The key string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A cached generation result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CachedResponse {
    /// Generated art.
    Art(ArtResult),
    /// Image result, including a confirmed absence.
    Image(Option<ImageData>),
}

/// Thread-safe, unbounded response cache.
#[derive(Debug, Default)]
pub struct ResponseCache {
    entries: Mutex<HashMap<CacheKey, CachedResponse>>,
}

impl ResponseCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up a key.
    pub fn get(&self, key: &CacheKey) -> Option<CachedResponse> {
        let hit = self.lock().get(key).cloned();
        trace!(key = %key, hit = hit.is_some(), "Cache lookup");
        hit
    }

    /// Stores a value, replacing any previous one.
    pub fn set(&self, key: CacheKey, value: CachedResponse) {
        trace!(key = %key, "Cache store");
        self.lock().insert(key, value);
    }

    /// Cached art for `key`, if the entry holds art.
    pub fn art(&self, key: &CacheKey) -> Option<ArtResult> {
        match self.get(key)? {
            CachedResponse::Art(art) => Some(art),
            CachedResponse::Image(_) => None,
        }
    }

    /// Cached image result for `key`. The outer `Option` is the cache hit.
    pub fn image(&self, key: &CacheKey) -> Option<Option<ImageData>> {
        match self.get(key)? {
            CachedResponse::Image(image) => Some(image),
            CachedResponse::Art(_) => None,
        }
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns true if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<CacheKey, CachedResponse>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
