//! User preferences store.
//!
//! Manages user settings with persistence and change notification.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{RwLock, watch};
use tracing::{debug, info, warn};

use infinipedia_core::{ArtStyle, ImageOptions};
use infinipedia_fetch::RetryPolicy;
use infinipedia_fetch::retry::{
    DEFAULT_BASE_DELAY, DEFAULT_JITTER_MAX, DEFAULT_MAX_DELAY, DEFAULT_MAX_RETRIES,
};
use infinipedia_providers::ProviderConfig;

use crate::error::StoreError;
use crate::history::DEFAULT_HISTORY_LIMIT;
use crate::persistence::{default_data_dir, default_settings_path, load_json, save_json};

/// Default base URL for shareable links.
pub const DEFAULT_SHARE_BASE_URL: &str = "https://infinipedia.app/";

// ============================================================================
// Settings Types
// ============================================================================

/// User preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Number of remembered topics.
    pub history_limit: usize,

    /// Retry tunables for provider calls.
    pub retry: RetrySettings,

    /// Provider selection and credentials.
    pub provider: ProviderConfig,

    /// ASCII art style.
    pub art_style: ArtStyle,

    /// Image style and aspect ratio.
    pub image: ImageOptions,

    /// Base URL for shareable links.
    pub share_base_url: String,

    /// Override for the durable storage directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            history_limit: DEFAULT_HISTORY_LIMIT,
            retry: RetrySettings::default(),
            provider: ProviderConfig::default(),
            art_style: ArtStyle::default(),
            image: ImageOptions::default(),
            share_base_url: DEFAULT_SHARE_BASE_URL.to_string(),
            data_dir: None,
        }
    }
}

impl Settings {
    /// Directory for durable key-value entries.
    pub fn data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(default_data_dir)
    }
}

/// Retry tunables, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrySettings {
    /// Retries after the first attempt.
    pub max_attempts: u32,
    /// Delay before the first retry.
    pub base_delay_ms: u64,
    /// Upper bound of the random jitter.
    pub jitter_ms: u64,
    /// Cap on the exponential delay.
    pub max_delay_ms: u64,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_RETRIES,
            base_delay_ms: duration_ms(DEFAULT_BASE_DELAY),
            jitter_ms: duration_ms(DEFAULT_JITTER_MAX),
            max_delay_ms: duration_ms(DEFAULT_MAX_DELAY),
        }
    }
}

impl RetrySettings {
    /// Builds the retry policy.
    pub fn policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_attempts)
            .with_base_delay(Duration::from_millis(self.base_delay_ms))
            .with_jitter(Duration::from_millis(self.jitter_ms))
            .with_max_delay(Duration::from_millis(self.max_delay_ms))
    }
}

fn duration_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

// ============================================================================
// Settings Store
// ============================================================================

/// Persistent settings store with change notifications.
#[derive(Debug)]
pub struct SettingsStore {
    settings: Arc<RwLock<Settings>>,
    path: PathBuf,
    notify: watch::Sender<u64>,
}

impl SettingsStore {
    /// Creates a store holding default settings, backed by `path`.
    pub fn new(path: PathBuf) -> Self {
        let (notify, _) = watch::channel(0);
        Self {
            settings: Arc::new(RwLock::new(Settings::default())),
            path,
            notify,
        }
    }

    /// Loads settings from the default path.
    ///
    /// # Errors
    ///
    /// Returns error if settings cannot be loaded from disk.
    pub async fn load_default() -> Result<Self, StoreError> {
        Self::load(default_settings_path()).await
    }

    /// Loads settings from a path.
    ///
    /// A missing file yields defaults; an unreadable one is logged and also
    /// yields defaults.
    ///
    /// # Errors
    ///
    /// Returns error if settings cannot be loaded from disk.
    pub async fn load(path: PathBuf) -> Result<Self, StoreError> {
        let settings = match load_json::<Settings>(&path).await {
            Ok(settings) => {
                info!(path = %path.display(), "Loaded settings");
                settings
            }
            Err(e) if e.is_not_found() => {
                debug!(path = %path.display(), "Settings file not found, using defaults");
                Settings::default()
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to load settings, using defaults");
                Settings::default()
            }
        };

        let (notify, _) = watch::channel(0);
        Ok(Self {
            settings: Arc::new(RwLock::new(settings)),
            path,
            notify,
        })
    }

    /// Backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Gets a copy of the current settings.
    pub async fn get(&self) -> Settings {
        self.settings.read().await.clone()
    }

    /// Updates settings and notifies subscribers.
    pub async fn update<F>(&self, f: F)
    where
        F: FnOnce(&mut Settings),
    {
        {
            let mut settings = self.settings.write().await;
            f(&mut settings);
        }
        self.notify_change();
    }

    /// Restores defaults and notifies subscribers.
    pub async fn reset(&self) {
        self.update(|settings| *settings = Settings::default()).await;
    }

    /// Saves settings to disk.
    ///
    /// # Errors
    ///
    /// Returns error if settings cannot be written to disk.
    pub async fn save(&self) -> Result<(), StoreError> {
        let settings = self.settings.read().await.clone();
        save_json(&self.path, &settings).await?;
        info!(path = %self.path.display(), "Settings saved");
        Ok(())
    }

    /// Subscribes to settings changes. The value is a change counter.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.notify.subscribe()
    }

    fn notify_change(&self) {
        self.notify.send_modify(|version| *version += 1);
    }
}
