//! Provider configuration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use infinipedia_core::CoreError;
use infinipedia_fetch::HttpSettings;

/// Environment variables consulted for the API key, in order.
pub const API_KEY_ENV_VARS: &[&str] = &["GEMINI_API_KEY", "API_KEY"];

/// Default text model.
pub const DEFAULT_TEXT_MODEL: &str = "gemini-2.5-flash";

/// Default image model.
pub const DEFAULT_IMAGE_MODEL: &str = "imagen-4.0-generate-001";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Where generation requests go.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderSource {
    /// Call the Gemini API directly with an API key.
    #[default]
    Direct,
    /// Call a proxy endpoint that holds the credential.
    Proxy,
}

impl ProviderSource {
    /// Returns the settings token.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Direct => "direct",
            Self::Proxy => "proxy",
        }
    }
}

impl fmt::Display for ProviderSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderSource {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "direct" => Ok(Self::Direct),
            "proxy" => Ok(Self::Proxy),
            other => Err(CoreError::InvalidOption(format!("unknown provider source: {other}"))),
        }
    }
}

/// Model identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Model for definitions and art.
    pub text: String,
    /// Model for images.
    pub image: String,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            text: DEFAULT_TEXT_MODEL.to_string(),
            image: DEFAULT_IMAGE_MODEL.to_string(),
        }
    }
}

/// Provider section of the settings file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Direct or proxy.
    pub source: ProviderSource,
    /// API key for direct calls. Environment variables are used when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Models used for direct calls.
    pub models: ModelConfig,
    /// Override for the Gemini API base URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_base: Option<String>,
    /// Proxy endpoint URL (e.g. `http://127.0.0.1:8787/api/generate`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proxy_url: Option<String>,
    /// Timeout for single-shot requests, in seconds.
    pub timeout_secs: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            source: ProviderSource::Direct,
            api_key: None,
            models: ModelConfig::default(),
            api_base: None,
            proxy_url: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl ProviderConfig {
    /// Resolves the API key from settings, then from the environment.
    pub fn resolve_api_key(&self) -> Option<String> {
        self.resolve_api_key_with(|name| std::env::var(name).ok())
    }

    /// Resolves the API key using a custom environment lookup.
    pub fn resolve_api_key_with<F>(&self, lookup: F) -> Option<String>
    where
        F: Fn(&str) -> Option<String>,
    {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .map(ToString::to_string)
            .or_else(|| {
                API_KEY_ENV_VARS
                    .iter()
                    .filter_map(|name| lookup(name))
                    .map(|key| key.trim().to_string())
                    .find(|key| !key.is_empty())
            })
    }

    /// HTTP settings derived from the timeout.
    pub fn http_settings(&self) -> HttpSettings {
        HttpSettings {
            timeout: Duration::from_secs(self.timeout_secs.max(1)),
            ..HttpSettings::default()
        }
    }
}
