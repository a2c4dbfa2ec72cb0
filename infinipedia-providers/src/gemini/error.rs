//! Gemini reply errors.
//!
//! HTTP-level failures are classified by `infinipedia_fetch`; these helpers
//! cover failures reported inside a 200 reply.

use infinipedia_core::{ProviderError, ProviderErrorKind};
use infinipedia_fetch::classify;

use super::api::ApiErrorBody;

/// Converts an in-body error object.
pub(crate) fn api_error(body: &ApiErrorBody) -> ProviderError {
    let status = body.status.as_deref().unwrap_or("ERROR");
    let message = body.message.as_deref().unwrap_or("provider reported an error");
    let text = format!("{status}: {message}");

    let err = ProviderError::new(classify(body.code, &text), text);
    match body.code {
        Some(code) => err.with_status(code),
        None => err,
    }
}

/// A content-policy block.
pub(crate) fn safety_blocked(detail: &str) -> ProviderError {
    ProviderError::new(ProviderErrorKind::SafetyBlocked, detail)
}

/// A reply that could not be decoded.
pub(crate) fn malformed(context: &str, error: impl std::fmt::Display) -> ProviderError {
    ProviderError::new(
        ProviderErrorKind::MalformedResponse,
        format!("{context}: {error}"),
    )
}
