//! HTTP client construction.

use std::time::Duration;

use infinipedia_core::ProviderError;
use reqwest::{Client, Response};
use tracing::debug;

use crate::classify::{error_from_body, error_from_reqwest};
use crate::error::FetchError;

/// Default timeout for single-shot requests.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Default connect timeout, applied to streams as well.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Timeouts for the provider HTTP clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpSettings {
    /// Whole-request timeout for single-shot calls.
    pub timeout: Duration,
    /// Connect timeout for every call.
    pub connect_timeout: Duration,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        }
    }
}

/// A pair of `reqwest` clients.
///
/// Streaming responses can legitimately run longer than any whole-request
/// timeout, so the streaming client only bounds the connect phase.
#[derive(Debug, Clone)]
pub struct HttpClient {
    single: Client,
    streaming: Client,
}

impl HttpClient {
    /// Creates clients with default settings.
    pub fn new() -> Result<Self, FetchError> {
        Self::with_settings(HttpSettings::default())
    }

    /// Creates clients with the given timeouts.
    pub fn with_settings(settings: HttpSettings) -> Result<Self, FetchError> {
        let user_agent = concat!("infinipedia/", env!("CARGO_PKG_VERSION"));

        let single = Client::builder()
            .timeout(settings.timeout)
            .connect_timeout(settings.connect_timeout)
            .user_agent(user_agent)
            .build()?;

        let streaming = Client::builder()
            .connect_timeout(settings.connect_timeout)
            .user_agent(user_agent)
            .build()?;

        debug!(
            timeout_secs = settings.timeout.as_secs(),
            connect_timeout_secs = settings.connect_timeout.as_secs(),
            "HTTP clients created"
        );

        Ok(Self { single, streaming })
    }

    /// Client for single-shot requests.
    pub fn single(&self) -> &Client {
        &self.single
    }

    /// Client for streamed responses.
    pub fn streaming(&self) -> &Client {
        &self.streaming
    }
}

/// Sends a request, classifying transport failures.
pub async fn send(request: reqwest::RequestBuilder) -> Result<Response, ProviderError> {
    let response = request.send().await.map_err(|e| error_from_reqwest(&e))?;
    ensure_success(response).await
}

/// Passes a successful response through, or turns its body into a
/// classified [`ProviderError`].
pub async fn ensure_success(response: Response) -> Result<Response, ProviderError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let error = error_from_body(status.as_u16(), &body);
    debug!(status = status.as_u16(), kind = %error.kind, "Provider returned an error");
    Err(error)
}
