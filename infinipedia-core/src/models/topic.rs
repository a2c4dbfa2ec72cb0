//! Topic type.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::error::CoreError;

/// A user-chosen subject string.
///
/// Topics are trimmed on construction and compared case-insensitively, so
/// `"Cat"` and `" cat "` are the same topic. The original casing is kept for
/// display.
#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct Topic(String);

impl Topic {
    /// Creates a topic from user input.
    ///
    /// Returns [`CoreError::EmptyTopic`] if the input is blank after trimming.
    pub fn new(input: impl AsRef<str>) -> Result<Self, CoreError> {
        let trimmed = input.as_ref().trim();
        if trimmed.is_empty() {
            return Err(CoreError::EmptyTopic);
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Creates a topic, returning `None` for blank input.
    pub fn parse(input: impl AsRef<str>) -> Option<Self> {
        Self::new(input).ok()
    }

    /// Builds a topic from a compile-time constant known to be non-blank.
    pub(crate) fn from_static(value: &'static str) -> Self {
        Self(value.trim().to_string())
    }

    /// Returns the topic as entered (trimmed).
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the lowercase comparison key.
    pub fn key(&self) -> String {
        self.0.to_lowercase()
    }

    /// Returns the number of characters in the topic.
    pub fn char_len(&self) -> usize {
        self.0.chars().count()
    }
}

impl PartialEq for Topic {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0 || self.key() == other.key()
    }
}

impl Eq for Topic {}

impl Hash for Topic {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Topic {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<&str> for Topic {
    type Error = CoreError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<String> for Topic {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl<'de> Deserialize<'de> for Topic {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::new(raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_topic_is_trimmed() {
        let topic = Topic::new("  Black hole \n").unwrap();
        assert_eq!(topic.as_str(), "Black hole");
    }

    #[test]
    fn test_blank_topic_rejected() {
        assert!(matches!(Topic::new("   "), Err(CoreError::EmptyTopic)));
        assert!(Topic::parse("").is_none());
    }

    #[test]
    fn test_case_insensitive_equality_and_hash() {
        let a = Topic::new("Cat").unwrap();
        let b = Topic::new(" cAT").unwrap();
        assert_eq!(a, b);

        let mut set = HashSet::new();
        set.insert(a);
        assert!(!set.insert(b));
    }

    #[test]
    fn test_display_keeps_casing() {
        let topic = Topic::new("Quantum Entanglement").unwrap();
        assert_eq!(topic.to_string(), "Quantum Entanglement");
        assert_eq!(topic.key(), "quantum entanglement");
    }

    #[test]
    fn test_serde_as_plain_string() {
        let topic = Topic::new("Gravity").unwrap();
        assert_eq!(serde_json::to_string(&topic).unwrap(), "\"Gravity\"");

        let parsed: Vec<Topic> = serde_json::from_str(r#"["Cat", "Dog"]"#).unwrap();
        assert_eq!(parsed.len(), 2);
        assert!(serde_json::from_str::<Topic>("\"  \"").is_err());
    }
}
