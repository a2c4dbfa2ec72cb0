//! Shared state for the proxy handlers.

use std::sync::Arc;

use infinipedia_core::ContentProvider;
use infinipedia_fetch::RetryPolicy;
use infinipedia_providers::{ProviderBuildError, ProviderConfig, ProviderSource, build_provider};
use tracing::warn;

/// State shared by every request.
#[derive(Clone)]
pub struct ProxyState {
    provider: Option<Arc<dyn ContentProvider>>,
    retry: RetryPolicy,
}

impl std::fmt::Debug for ProxyState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProxyState")
            .field("provider", &self.provider.as_ref().map(|p| p.id().to_string()))
            .field("retry", &self.retry)
            .finish()
    }
}

impl ProxyState {
    /// State backed by `provider`.
    pub fn new(provider: Arc<dyn ContentProvider>) -> Self {
        Self {
            provider: Some(provider),
            retry: RetryPolicy::default(),
        }
    }

    /// State without a credential. Every generation request fails with 500.
    pub fn unconfigured() -> Self {
        Self {
            provider: None,
            retry: RetryPolicy::default(),
        }
    }

    /// Builds a direct provider client from `config`, whatever its source.
    ///
    /// A missing API key is not fatal: the server still starts and answers
    /// every request with a missing-credential error.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn from_config(config: &ProviderConfig) -> Result<Self, ProviderBuildError> {
        let direct = ProviderConfig {
            source: ProviderSource::Direct,
            ..config.clone()
        };
        match build_provider(&direct) {
            Ok(provider) => Ok(Self::new(provider)),
            Err(ProviderBuildError::MissingApiKey) => {
                warn!("No API key configured, proxy will reject generation requests");
                Ok(Self::unconfigured())
            }
            Err(e) => Err(e),
        }
    }

    /// Sets the retry policy for upstream calls.
    #[must_use]
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// The provider, if a credential is configured.
    pub fn provider(&self) -> Option<&Arc<dyn ContentProvider>> {
        self.provider.as_ref()
    }

    /// Retry policy for upstream calls.
    pub fn retry(&self) -> &RetryPolicy {
        &self.retry
    }
}
