//! Provider error classification.
//!
//! Every failure that leaves a provider client goes through one of the
//! functions here, so the rest of the system only ever sees a
//! [`ProviderErrorKind`].

use infinipedia_core::{ProviderError, ProviderErrorKind};
use serde::Deserialize;

// ============================================================================
// Keyword tables
// ============================================================================

const RATE_LIMIT_MARKERS: &[&str] = &[
    "resource_exhausted",
    "rate limit",
    "rate-limit",
    "quota",
    "too many requests",
];

const OVERLOAD_MARKERS: &[&str] = &["overloaded", "unavailable", "try again later"];

const SAFETY_MARKERS: &[&str] = &["safety", "blockreason", "prohibited_content", "blocklist"];

const INVALID_MARKERS: &[&str] = &[
    "invalid_argument",
    "api key not valid",
    "api_key_invalid",
    "permission_denied",
    "unauthenticated",
];

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| haystack.contains(needle))
}

/// Classifies a failure from its HTTP status (if any) and body text.
///
/// Status codes win over body text for the transient classes and for
/// credential failures (401/403); body text is consulted for everything else
/// because providers report safety blocks and quota errors with generic 400
/// codes.
pub fn classify(status: Option<u16>, body: &str) -> ProviderErrorKind {
    match status {
        Some(429) => return ProviderErrorKind::RateLimited,
        Some(502 | 503 | 504 | 529) => return ProviderErrorKind::Overloaded,
        _ => {}
    }

    let text = body.to_ascii_lowercase();
    if contains_any(&text, RATE_LIMIT_MARKERS) {
        ProviderErrorKind::RateLimited
    } else if contains_any(&text, OVERLOAD_MARKERS) {
        ProviderErrorKind::Overloaded
    } else if matches!(status, Some(401 | 403)) || contains_any(&text, INVALID_MARKERS) {
        ProviderErrorKind::InvalidRequest
    } else if contains_any(&text, SAFETY_MARKERS) {
        ProviderErrorKind::SafetyBlocked
    } else if matches!(status, Some(400..=499)) {
        ProviderErrorKind::InvalidRequest
    } else {
        ProviderErrorKind::Unknown
    }
}

// ============================================================================
// Error bodies
// ============================================================================

#[derive(Debug, Deserialize)]
struct GoogleErrorEnvelope {
    error: GoogleErrorBody,
}

#[derive(Debug, Deserialize)]
struct GoogleErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    status: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PlainErrorBody {
    error: String,
}

/// Extracts a human-readable message from an error body.
///
/// Understands the Google API envelope (`{"error": {"message", "status"}}`)
/// and the proxy's flat `{"error": "..."}` shape; anything else is returned
/// truncated.
fn message_from_body(body: &str) -> String {
    if let Ok(envelope) = serde_json::from_str::<GoogleErrorEnvelope>(body) {
        let GoogleErrorBody { message, status } = envelope.error;
        return match (status, message) {
            (Some(status), Some(message)) => format!("{status}: {message}"),
            (None, Some(message)) => message,
            (Some(status), None) => status,
            (None, None) => "provider returned an empty error".to_string(),
        };
    }
    if let Ok(plain) = serde_json::from_str::<PlainErrorBody>(body) {
        return plain.error;
    }
    let trimmed = body.trim();
    if trimmed.chars().count() > 300 {
        let cut: String = trimmed.chars().take(300).collect();
        format!("{cut}...")
    } else {
        trimmed.to_string()
    }
}

/// Kind named by a leading `"<label>: "` prefix, as written by
/// [`ProviderError`]'s `Display` (the proxy forwards upstream failures this
/// way).
fn labeled_kind(message: &str) -> Option<ProviderErrorKind> {
    let (label, _) = message.split_once(": ")?;
    ProviderErrorKind::all()
        .iter()
        .copied()
        .find(|kind| kind.label() == label)
}

/// Builds a classified error from a non-success HTTP reply.
pub fn error_from_body(status: u16, body: &str) -> ProviderError {
    let message = message_from_body(body);
    let kind = labeled_kind(&message)
        .unwrap_or_else(|| classify(Some(status), &format!("{message} {body}")));
    ProviderError::new(kind, message).with_status(status)
}

/// Builds a classified error from a transport failure.
///
/// Timeouts and connection failures count as [`ProviderErrorKind::Overloaded`]
/// so the retry policy treats them as transient.
pub fn error_from_reqwest(error: &reqwest::Error) -> ProviderError {
    let status = error.status().map(|s| s.as_u16());
    let kind = if error.is_timeout() || error.is_connect() {
        ProviderErrorKind::Overloaded
    } else if error.is_decode() {
        ProviderErrorKind::MalformedResponse
    } else {
        classify(status, &error.to_string())
    };

    let err = ProviderError::new(kind, error.to_string());
    match status {
        Some(status) => err.with_status(status),
        None => err,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(classify(Some(429), ""), ProviderErrorKind::RateLimited);
        assert_eq!(classify(Some(503), ""), ProviderErrorKind::Overloaded);
        assert_eq!(classify(Some(529), ""), ProviderErrorKind::Overloaded);
        assert_eq!(classify(Some(404), "not found"), ProviderErrorKind::InvalidRequest);
        assert_eq!(classify(Some(500), "boom"), ProviderErrorKind::Unknown);
        assert_eq!(classify(None, "connection reset"), ProviderErrorKind::Unknown);
    }

    #[test]
    fn test_body_keywords() {
        assert_eq!(
            classify(Some(400), "RESOURCE_EXHAUSTED: Quota exceeded"),
            ProviderErrorKind::RateLimited
        );
        assert_eq!(
            classify(Some(500), "The model is overloaded."),
            ProviderErrorKind::Overloaded
        );
        assert_eq!(
            classify(Some(400), "Response was blocked due to SAFETY"),
            ProviderErrorKind::SafetyBlocked
        );
        assert_eq!(
            classify(Some(400), "API key not valid. Please pass a valid API key."),
            ProviderErrorKind::InvalidRequest
        );
    }

    #[test]
    fn test_google_error_envelope() {
        let body = r#"{"error":{"code":429,"message":"Resource has been exhausted (e.g. check quota).","status":"RESOURCE_EXHAUSTED"}}"#;
        let err = error_from_body(429, body);
        assert_eq!(err.kind, ProviderErrorKind::RateLimited);
        assert_eq!(err.status, Some(429));
        assert!(err.message.starts_with("RESOURCE_EXHAUSTED"));
    }

    #[test]
    fn test_blocked_api_is_a_credential_problem() {
        let body = r#"{"error":{"code":403,"message":"Requests to this API generativelanguage.googleapis.com method google.ai.generativelanguage.v1beta.GenerativeService.StreamGenerateContent are blocked.","status":"PERMISSION_DENIED"}}"#;
        let err = error_from_body(403, body);
        assert_eq!(err.kind, ProviderErrorKind::InvalidRequest);
        assert_eq!(err.status, Some(403));

        assert_eq!(classify(Some(403), "blocked"), ProviderErrorKind::InvalidRequest);
        assert_eq!(
            classify(Some(200), r#"{"promptFeedback":{"blockReason":"OTHER"}}"#),
            ProviderErrorKind::SafetyBlocked
        );
    }

    #[test]
    fn test_labeled_proxy_errors_keep_their_kind() {
        for kind in ProviderErrorKind::all() {
            let upstream = ProviderError::new(*kind, "upstream said no").retry_exhausted(4);
            let body = serde_json::json!({ "error": upstream.to_string() }).to_string();
            assert_eq!(error_from_body(500, &body).kind, *kind, "{kind}");
        }

        let err = error_from_body(500, r#"{"error":"malformed response: missing art"}"#);
        assert_eq!(err.kind, ProviderErrorKind::MalformedResponse);
        assert_eq!(err.message, "malformed response: missing art");
    }

    #[test]
    fn test_unlabeled_message_falls_back_to_keywords() {
        let err = error_from_body(500, r#"{"error":"note: nothing matched"}"#);
        assert_eq!(err.kind, ProviderErrorKind::Unknown);
    }

    #[test]
    fn test_unavailable_envelope_with_500() {
        let body = r#"{"error":{"code":500,"message":"Service temporarily down","status":"UNAVAILABLE"}}"#;
        assert_eq!(error_from_body(500, body).kind, ProviderErrorKind::Overloaded);
    }

    #[test]
    fn test_plain_error_body() {
        let err = error_from_body(400, r#"{"error":"Missing topic"}"#);
        assert_eq!(err.message, "Missing topic");
        assert_eq!(err.kind, ProviderErrorKind::InvalidRequest);
    }

    #[test]
    fn test_long_body_is_truncated() {
        let body = "x".repeat(1000);
        let err = error_from_body(500, &body);
        assert_eq!(err.message.chars().count(), 303);
    }
}
