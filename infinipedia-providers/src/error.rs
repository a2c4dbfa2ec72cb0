//! Provider construction errors.

use infinipedia_fetch::FetchError;
use thiserror::Error;

/// Errors raised while building a provider from configuration.
#[derive(Debug, Error)]
pub enum ProviderBuildError {
    /// Direct mode without a credential.
    #[error("No API key configured. Set GEMINI_API_KEY (or API_KEY) or add provider.api_key to the settings file")]
    MissingApiKey,

    /// Proxy mode without an endpoint.
    #[error("Proxy mode requires provider.proxy_url in the settings file")]
    MissingProxyUrl,

    /// Endpoint URL could not be parsed.
    #[error("Invalid URL {url}: {reason}")]
    InvalidUrl {
        /// The offending URL.
        url: String,
        /// Parser message.
        reason: String,
    },

    /// HTTP client construction failed.
    #[error(transparent)]
    Http(#[from] FetchError),
}
