// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Infinipedia Store
//!
//! State that outlives a single generation.
//!
//! This crate provides:
//!
//! - **KeyValueStore**: Best-effort durable string entries (file or memory)
//! - **HistoryTracker**: Bounded, de-duplicated visited-topic list
//! - **ResponseCache**: Session-scoped art and image results
//! - **ThemeStore**: Light/dark preference
//! - **SettingsStore**: User preferences with persistence
//! - **Persistence**: File I/O helpers with atomic writes
//!
//! ## Usage
//!
//! ```ignore
//! use std::sync::Arc;
//! use infinipedia_store::{FileKvStore, HistoryTracker, SettingsStore};
//!
//! let settings = SettingsStore::load_default().await?.get().await;
//! let kv = Arc::new(FileKvStore::new(settings.data_dir()));
//! let history = HistoryTracker::load(kv, settings.history_limit);
//!
//! // Subscribe to changes
//! let mut rx = history.subscribe();
//! while rx.changed().await.is_ok() {
//!     println!("History: {:?}", *rx.borrow());
//! }
//! ```

pub mod cache;
pub mod error;
pub mod history;
pub mod kv;
pub mod persistence;
pub mod settings_store;
pub mod theme;

pub use cache::{CacheKey, CachedResponse, ResponseCache};
pub use error::StoreError;
pub use history::{DEFAULT_HISTORY_LIMIT, HISTORY_KEY, HistoryTracker};
pub use kv::{FileKvStore, KeyValueStore, MemoryKvStore};
pub use persistence::{
    default_config_dir, default_data_dir, default_settings_path, load_json, load_json_or_default,
    save_json, write_atomic,
};
pub use settings_store::{DEFAULT_SHARE_BASE_URL, RetrySettings, Settings, SettingsStore};
pub use theme::{THEME_KEY, ThemeStore};

#[cfg(test)]
mod persistence_tests;
