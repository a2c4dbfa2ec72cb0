//! Session error types.

use infinipedia_providers::ProviderBuildError;
use thiserror::Error;

/// Errors raised while assembling a session.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The configured provider could not be built.
    #[error("Provider setup failed: {0}")]
    Provider(#[from] ProviderBuildError),
}
