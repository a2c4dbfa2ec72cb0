//! Fetch error types.

use thiserror::Error;

/// Errors raised while setting up network clients.
///
/// Failures of individual provider calls are reported as
/// [`ProviderError`](infinipedia_core::ProviderError) instead.
#[derive(Debug, Error)]
pub enum FetchError {
    /// HTTP client could not be built.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Invalid URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}
