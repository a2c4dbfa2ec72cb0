//! Core error types for Infinipedia.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::models::Topic;

/// Core error type for validation of Infinipedia types.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Topic is empty after trimming.
    #[error("Topic must not be empty")]
    EmptyTopic,

    /// Unknown option value (style, ratio, theme).
    #[error("Invalid option: {0}")]
    InvalidOption(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

// ============================================================================
// Provider Error
// ============================================================================

/// Closed classification of provider failures.
///
/// Classification happens once, at the provider-client boundary. Everything
/// downstream matches on the kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderErrorKind {
    /// Quota or rate limit hit. Transient.
    RateLimited,
    /// Provider temporarily overloaded or unavailable. Transient.
    Overloaded,
    /// Content policy rejected the prompt or the output.
    SafetyBlocked,
    /// Provider reply failed shape validation.
    MalformedResponse,
    /// Request rejected as invalid (bad key, bad parameters).
    InvalidRequest,
    /// Anything else, including transport failures.
    Unknown,
}

impl ProviderErrorKind {
    /// Returns true for the classes the retry policy retries.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::RateLimited | Self::Overloaded)
    }

    /// Returns every kind.
    pub fn all() -> &'static [ProviderErrorKind] {
        &[
            Self::RateLimited,
            Self::Overloaded,
            Self::SafetyBlocked,
            Self::MalformedResponse,
            Self::InvalidRequest,
            Self::Unknown,
        ]
    }

    /// Returns a short label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::RateLimited => "rate limited",
            Self::Overloaded => "overloaded",
            Self::SafetyBlocked => "safety blocked",
            Self::MalformedResponse => "malformed response",
            Self::InvalidRequest => "invalid request",
            Self::Unknown => "unknown error",
        }
    }
}

impl fmt::Display for ProviderErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A classified failure from a content provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderError {
    /// Classification.
    pub kind: ProviderErrorKind,
    /// Diagnostic message (not shown to users verbatim).
    pub message: String,
    /// HTTP status, when the failure came from an HTTP reply.
    pub status: Option<u16>,
    /// Total attempts made when the retry policy gave up.
    pub exhausted_after: Option<u32>,
}

impl ProviderError {
    /// Creates a provider error.
    pub fn new(kind: ProviderErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            status: None,
            exhausted_after: None,
        }
    }

    /// Attaches the HTTP status.
    #[must_use]
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    /// Marks the error as the last one seen before retries ran out.
    #[must_use]
    pub fn retry_exhausted(mut self, attempts: u32) -> Self {
        self.exhausted_after = Some(attempts);
        self
    }

    /// Returns true if retrying may succeed.
    pub fn is_transient(&self) -> bool {
        self.kind.is_transient()
    }

    /// Returns true if the retry policy gave up on this error.
    pub fn is_retry_exhausted(&self) -> bool {
        self.exhausted_after.is_some()
    }

    /// Message shown to the user when the definition for `topic` fails.
    pub fn user_message(&self, topic: &Topic) -> String {
        match self.kind {
            ProviderErrorKind::RateLimited | ProviderErrorKind::Overloaded => {
                "The service is busy right now. Please try again in a moment.".to_string()
            }
            ProviderErrorKind::SafetyBlocked => {
                format!("Content about \"{topic}\" is restricted and can't be generated.")
            }
            ProviderErrorKind::MalformedResponse
            | ProviderErrorKind::InvalidRequest
            | ProviderErrorKind::Unknown => {
                format!("Could not generate content for \"{topic}\". Please try again.")
            }
        }
    }
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)?;
        if let Some(status) = self.status {
            write!(f, " (HTTP {status})")?;
        }
        if let Some(attempts) = self.exhausted_after {
            write!(f, " [retries exhausted after {attempts} attempts]")?;
        }
        Ok(())
    }
}

impl std::error::Error for ProviderError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_kinds() {
        assert!(ProviderErrorKind::RateLimited.is_transient());
        assert!(ProviderErrorKind::Overloaded.is_transient());
        assert!(!ProviderErrorKind::SafetyBlocked.is_transient());
        assert!(!ProviderErrorKind::MalformedResponse.is_transient());
        assert!(!ProviderErrorKind::Unknown.is_transient());
    }

    #[test]
    fn test_display_includes_annotations() {
        let err = ProviderError::new(ProviderErrorKind::RateLimited, "quota exceeded")
            .with_status(429)
            .retry_exhausted(4);
        assert_eq!(
            err.to_string(),
            "rate limited: quota exceeded (HTTP 429) [retries exhausted after 4 attempts]"
        );
        assert!(err.is_retry_exhausted());
    }

    #[test]
    fn test_user_messages() {
        let topic = Topic::new("Gravity").unwrap();

        let busy = ProviderError::new(ProviderErrorKind::Overloaded, "503");
        assert!(busy.user_message(&topic).contains("busy"));

        let blocked = ProviderError::new(ProviderErrorKind::SafetyBlocked, "SAFETY");
        assert!(blocked.user_message(&topic).contains("\"Gravity\""));
        assert!(blocked.user_message(&topic).contains("restricted"));

        let unknown = ProviderError::new(ProviderErrorKind::Unknown, "boom");
        assert!(unknown.user_message(&topic).starts_with("Could not generate content"));
    }
}
