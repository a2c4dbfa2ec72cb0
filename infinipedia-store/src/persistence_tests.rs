//! Persistence round-trip and edge case tests.
//!
//! Tests file I/O operations, settings round-trip, and history surviving a
//! restart through the file store.

use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;

use crate::history::{HISTORY_KEY, HistoryTracker};
use crate::kv::{FileKvStore, KeyValueStore};
use crate::persistence::{load_json, load_json_or_default, save_json};
use crate::settings_store::{Settings, SettingsStore};
use crate::theme::ThemeStore;
use infinipedia_core::{ArtStyle, Theme, Topic};

// ============================================================================
// JSON Persistence Tests
// ============================================================================

#[tokio::test]
async fn test_save_and_load_json_roundtrip() {
    let temp_dir = TempDir::new().unwrap();
    let file_path = temp_dir.path().join("test.json");

    let mut settings = Settings::default();
    settings.history_limit = 20;
    settings.art_style = ArtStyle::Dense;

    save_json(&file_path, &settings).await.unwrap();
    let loaded: Settings = load_json(&file_path).await.unwrap();

    assert_eq!(loaded, settings);
}

#[tokio::test]
async fn test_save_creates_parent_directories() {
    let temp_dir = TempDir::new().unwrap();
    let nested_path = temp_dir.path().join("deeply").join("nested").join("test.json");

    let data = serde_json::json!({"key": "value"});

    let result = save_json(&nested_path, &data).await;
    assert!(result.is_ok());
    assert!(nested_path.exists());
}

#[tokio::test]
async fn test_load_nonexistent_file() {
    let file_path = PathBuf::from("/nonexistent/path/settings.json");

    let result: Result<Settings, _> = load_json(&file_path).await;
    assert!(result.unwrap_err().is_not_found());

    let defaults: Settings = load_json_or_default(&file_path).await;
    assert_eq!(defaults, Settings::default());
}

// ============================================================================
// Settings Store
// ============================================================================

#[tokio::test]
async fn test_settings_store_round_trip() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("settings.json");

    let store = SettingsStore::load(path.clone()).await.unwrap();
    assert_eq!(store.get().await, Settings::default());

    store.update(|s| s.provider.api_key = Some("secret".into())).await;
    store.save().await.unwrap();

    let reloaded = SettingsStore::load(path).await.unwrap();
    assert_eq!(reloaded.get().await.provider.api_key.as_deref(), Some("secret"));
}

#[tokio::test]
async fn test_corrupted_settings_fall_back_to_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("settings.json");
    tokio::fs::write(&path, "{ not json").await.unwrap();

    let store = SettingsStore::load(path).await.unwrap();
    assert_eq!(store.get().await, Settings::default());
}

// ============================================================================
// Durable entries across restarts
// ============================================================================

#[test]
fn test_history_survives_restart() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path().join("data");

    {
        let history = HistoryTracker::load(Arc::new(FileKvStore::new(&dir)), 8);
        history.record(&Topic::new("Cat").unwrap());
        history.record(&Topic::new("Dog").unwrap());
    }

    let history = HistoryTracker::load(Arc::new(FileKvStore::new(&dir)), 8);
    let names: Vec<String> = history.entries().iter().map(ToString::to_string).collect();
    assert_eq!(names, vec!["Dog", "Cat"]);
}

#[test]
fn test_corrupted_history_file_is_reset() {
    let temp_dir = TempDir::new().unwrap();
    let kv = FileKvStore::new(temp_dir.path());
    kv.set(HISTORY_KEY, "[\"Cat\"");

    let history = HistoryTracker::load(Arc::new(kv.clone()), 8);
    assert!(history.entries().is_empty());
    assert!(!kv.path_for(HISTORY_KEY).exists());
}

#[test]
fn test_theme_survives_restart() {
    let temp_dir = TempDir::new().unwrap();

    ThemeStore::new(Arc::new(FileKvStore::new(temp_dir.path()))).set(Theme::Light);

    let themes = ThemeStore::new(Arc::new(FileKvStore::new(temp_dir.path())));
    assert_eq!(themes.get(), Theme::Light);
}
