//! Shared wiring for the commands that generate content.

use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use infinipedia_core::{ImageData, Theme};
use infinipedia_session::{Epoch, ExploreState, SessionContext, TopicOrchestrator};
use infinipedia_store::{FileKvStore, KeyValueStore, Settings, SettingsStore, ThemeStore};
use tracing::{debug, info};

use crate::Cli;
use crate::output::{Renderer, TextFormatter};

/// Loads settings from `--config` or the default location.
pub async fn load_settings(cli: &Cli) -> Result<SettingsStore> {
    let store = match &cli.config {
        Some(path) => SettingsStore::load(path.clone()).await?,
        None => SettingsStore::load_default().await?,
    };
    debug!(path = %store.path().display(), "Settings loaded");
    Ok(store)
}

/// Durable key-value store for theme and history.
pub fn open_kv(settings: &Settings) -> Arc<dyn KeyValueStore> {
    Arc::new(FileKvStore::new(settings.data_dir()))
}

/// Stored theme preference.
pub fn load_theme(settings: &Settings) -> Theme {
    ThemeStore::new(open_kv(settings)).get()
}

/// Builds the orchestrator from settings.
pub fn open_orchestrator(settings: &Settings) -> Result<TopicOrchestrator> {
    let context = SessionContext::from_settings(settings, open_kv(settings)).context(
        "Could not set up the content provider. Set GEMINI_API_KEY or configure a proxy URL",
    )?;
    info!(provider = context.provider().id(), "Session started");
    Ok(TopicOrchestrator::new(Arc::new(context)))
}

/// Renderer for the current terminal settings.
pub fn renderer(cli: &Cli, theme: Theme) -> Renderer {
    Renderer::new(TextFormatter::new(!cli.no_color, theme))
}

/// Prints every update for `epoch` until it settles, then returns the
/// final state.
pub async fn follow(
    orchestrator: &TopicOrchestrator,
    epoch: Epoch,
    renderer: &mut Renderer,
) -> Result<ExploreState> {
    let mut rx = orchestrator.subscribe();
    let mut stdout = std::io::stdout();

    loop {
        let state = rx.borrow_and_update().clone();
        if state.epoch != epoch {
            return Ok(state);
        }

        let text = renderer.render(&state);
        if !text.is_empty() {
            stdout.write_all(text.as_bytes())?;
            stdout.flush()?;
        }
        if renderer.is_finished() {
            return Ok(state);
        }

        rx.changed().await?;
    }
}

/// Writes the decoded image to `path`.
pub fn save_image(image: &ImageData, path: &Path) -> Result<()> {
    let bytes = STANDARD
        .decode(image.base64.as_bytes())
        .context("Image payload is not valid base64")?;
    std::fs::write(path, &bytes)
        .with_context(|| format!("Failed to write image to {}", path.display()))?;
    info!(path = %path.display(), bytes = bytes.len(), "Image saved");
    Ok(())
}
