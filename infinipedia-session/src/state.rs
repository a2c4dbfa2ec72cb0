//! Observable exploration state.

use std::fmt;
use std::time::Duration;

use infinipedia_core::{ArtResult, ImageData, ProviderErrorKind, Topic};
use serde::Serialize;

// ============================================================================
// Epoch
// ============================================================================

/// Generation epoch.
///
/// Exactly one epoch is current. Every task is tagged with the epoch it was
/// started under and may only touch state while that epoch is current.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Epoch(u64);

impl Epoch {
    /// Returns the raw counter.
    pub fn value(self) -> u64 {
        self.0
    }

    /// Returns the following epoch.
    #[must_use]
    pub fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

impl fmt::Display for Epoch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// ============================================================================
// Phase
// ============================================================================

/// Coarse phase derived from [`ExploreState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExplorePhase {
    /// No topic has been resolved.
    Idle,
    /// The definition is still streaming.
    Loading,
    /// The definition finished with content.
    Complete,
    /// The definition finished successfully but produced no text.
    Empty,
    /// The definition failed.
    Failed,
}

impl ExplorePhase {
    /// Returns the lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Loading => "loading",
            Self::Complete => "complete",
            Self::Empty => "empty",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for ExplorePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// State
// ============================================================================

/// Everything the presentation layer renders for the active topic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExploreState {
    /// Current epoch.
    pub epoch: Epoch,
    /// Active topic, if any.
    pub topic: Option<Topic>,
    /// Definition text accumulated so far.
    pub content: String,
    /// Art, once settled.
    pub art: Option<ArtResult>,
    /// True if `art` is the locally synthesized fallback.
    pub art_is_fallback: bool,
    /// Image, once settled and present.
    pub image: Option<ImageData>,
    /// Definition stream still open.
    pub definition_loading: bool,
    /// Art not yet settled.
    pub art_loading: bool,
    /// Image not yet settled.
    pub image_loading: bool,
    /// User-facing definition error.
    pub error: Option<String>,
    /// Classification of the definition error.
    pub error_kind: Option<ProviderErrorKind>,
    /// Time from resolve to the definition settling.
    pub elapsed: Option<Duration>,
}

impl ExploreState {
    /// Fresh state for a newly started epoch.
    pub(crate) fn started(epoch: Epoch, topic: Topic) -> Self {
        Self {
            epoch,
            topic: Some(topic),
            definition_loading: true,
            art_loading: true,
            image_loading: true,
            ..Self::default()
        }
    }

    /// Derives the coarse phase.
    pub fn phase(&self) -> ExplorePhase {
        if self.topic.is_none() {
            ExplorePhase::Idle
        } else if self.definition_loading {
            ExplorePhase::Loading
        } else if self.error.is_some() {
            ExplorePhase::Failed
        } else if self.content.trim().is_empty() {
            ExplorePhase::Empty
        } else {
            ExplorePhase::Complete
        }
    }

    /// True once definition, art and image have all settled.
    pub fn is_settled(&self) -> bool {
        !(self.definition_loading || self.art_loading || self.image_loading)
    }

    /// True while any of the three tasks is still running.
    pub fn is_loading(&self) -> bool {
        !self.is_settled()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn topic() -> Topic {
        Topic::new("Gravity").unwrap()
    }

    #[test]
    fn test_epoch_ordering() {
        let first = Epoch::default();
        let second = first.next();
        assert!(second > first);
        assert_eq!(second.value(), 1);
        assert_eq!(second.to_string(), "#1");
    }

    #[test]
    fn test_phase_progression() {
        let mut state = ExploreState::default();
        assert_eq!(state.phase(), ExplorePhase::Idle);
        assert!(state.is_settled());

        state = ExploreState::started(Epoch::default().next(), topic());
        assert_eq!(state.phase(), ExplorePhase::Loading);
        assert!(state.is_loading());

        state.content.push_str("Gravity is a force.");
        state.definition_loading = false;
        assert_eq!(state.phase(), ExplorePhase::Complete);
        assert!(!state.is_settled());

        state.art_loading = false;
        state.image_loading = false;
        assert!(state.is_settled());
    }

    #[test]
    fn test_empty_is_distinct_from_failed() {
        let mut state = ExploreState::started(Epoch::default(), topic());
        state.definition_loading = false;
        state.content.push_str("  \n");
        assert_eq!(state.phase(), ExplorePhase::Empty);

        state.error = Some("busy".into());
        assert_eq!(state.phase(), ExplorePhase::Failed);
    }

    #[test]
    fn test_phase_serializes_lowercase() {
        assert_eq!(ExplorePhase::Complete.to_string(), "complete");
        assert_eq!(serde_json::to_string(&ExplorePhase::Empty).unwrap(), "\"empty\"");
    }
}
