//! Error types for the proxy endpoint.
//!
//! [`ProxyError`] converts into an HTTP response with a `{"error": ...}`
//! body via its [`IntoResponse`] implementation.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use infinipedia_core::ProviderError;
use serde_json::json;

/// Errors returned by `POST /api/generate`.
#[derive(Debug, thiserror::Error)]
pub enum ProxyError {
    /// The body is not valid JSON.
    #[error("Invalid JSON body: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// The topic is absent or blank.
    #[error("Missing or invalid topic")]
    InvalidTopic,

    /// The `type` field names nothing the proxy serves.
    #[error("Unknown generation type: {0}")]
    UnknownType(String),

    /// The server has no provider credential.
    #[error("Server is missing its API key")]
    MissingCredential,

    /// The upstream provider failed.
    #[error("{0}")]
    Provider(#[from] ProviderError),
}

impl ProxyError {
    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidJson(_) | Self::InvalidTopic | Self::UnknownType(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::MissingCredential | Self::Provider(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let status = self.status();
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use infinipedia_core::ProviderErrorKind;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ProxyError::InvalidTopic.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ProxyError::UnknownType("image".into()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(ProxyError::MissingCredential.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let upstream = ProviderError::new(ProviderErrorKind::RateLimited, "quota exceeded");
        assert_eq!(ProxyError::from(upstream).status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_provider_message_keeps_classification_label() {
        let upstream = ProviderError::new(ProviderErrorKind::SafetyBlocked, "SAFETY");
        assert_eq!(ProxyError::from(upstream).to_string(), "safety blocked: SAFETY");
    }
}
