//! Theme preference.

use std::sync::Arc;

use infinipedia_core::Theme;
use tracing::{debug, warn};

use crate::kv::KeyValueStore;

/// Storage key for the theme.
pub const THEME_KEY: &str = "theme";

/// Reads and writes the `light|dark` preference.
#[derive(Debug, Clone)]
pub struct ThemeStore {
    store: Arc<dyn KeyValueStore>,
}

impl ThemeStore {
    /// Creates a theme store on top of `store`.
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Current theme. Absent or unrecognized content reads as dark.
    pub fn get(&self) -> Theme {
        match self.store.get(THEME_KEY) {
            None => Theme::default(),
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                warn!(value = %raw.trim(), "Ignoring unknown stored theme");
                Theme::default()
            }),
        }
    }

    /// Persists a theme.
    pub fn set(&self, theme: Theme) {
        self.store.set(THEME_KEY, theme.as_str());
        debug!(theme = %theme, "Theme saved");
    }

    /// Flips the theme and returns the new value.
    pub fn toggle(&self) -> Theme {
        let next = self.get().toggled();
        self.set(next);
        next
    }
}
