//! Config command - manage configuration.

use anyhow::Result;
use clap::{Args, Subcommand};
use infinipedia_core::Theme;
use infinipedia_store::{Settings, ThemeStore, default_config_dir};
use tracing::info;

use super::session::{load_settings, open_kv};
use crate::output::JsonFormatter;
use crate::{Cli, OutputFormat};

const MASK: &str = "********";

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Config subcommands.
#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration.
    Show,

    /// Show configuration paths.
    Path,

    /// Set the display theme.
    Theme {
        /// `light` or `dark`.
        theme: Theme,
    },

    /// Reset to defaults.
    Reset,
}

/// Runs the config command.
pub async fn run(args: &ConfigArgs, cli: &Cli) -> Result<()> {
    match &args.action {
        ConfigAction::Show => show_config(cli).await,
        ConfigAction::Path => show_paths(cli).await,
        ConfigAction::Theme { theme } => set_theme(*theme, cli).await,
        ConfigAction::Reset => reset_config(cli).await,
    }
}

/// Settings with the API key hidden.
fn masked(mut settings: Settings) -> Settings {
    if settings.provider.api_key.is_some() {
        settings.provider.api_key = Some(MASK.to_string());
    }
    settings
}

async fn show_config(cli: &Cli) -> Result<()> {
    let settings = masked(load_settings(cli).await?.get().await);
    let theme = ThemeStore::new(open_kv(&settings)).get();

    match cli.format {
        OutputFormat::Text => {
            let provider = &settings.provider;
            println!("Infinipedia Configuration");
            println!("{}", "─".repeat(40));
            println!();
            println!("Provider:       {}", provider.source);
            println!("Text model:     {}", provider.models.text);
            println!("Image model:    {}", provider.models.image);
            println!("API key:        {}", provider.api_key.as_deref().unwrap_or("(from environment)"));
            if let Some(url) = &provider.proxy_url {
                println!("Proxy URL:      {url}");
            }
            println!("Timeout:        {}s", provider.timeout_secs);
            println!();
            println!("Art style:      {}", settings.art_style);
            println!("Image style:    {}", settings.image.style);
            println!("Aspect ratio:   {}", settings.image.aspect_ratio);
            println!("History limit:  {}", settings.history_limit);
            println!(
                "Retries:        {} (base {}ms, jitter {}ms, cap {}ms)",
                settings.retry.max_attempts,
                settings.retry.base_delay_ms,
                settings.retry.jitter_ms,
                settings.retry.max_delay_ms
            );
            println!("Share base URL: {}", settings.share_base_url);
            println!("Theme:          {theme}");
        }
        OutputFormat::Json => {
            let output = serde_json::json!({ "settings": settings, "theme": theme });
            println!("{}", JsonFormatter::new(cli.pretty).format(&output)?);
        }
    }

    Ok(())
}

async fn show_paths(cli: &Cli) -> Result<()> {
    let store = load_settings(cli).await?;
    let data_dir = store.get().await.data_dir();
    let config_dir = default_config_dir();

    match cli.format {
        OutputFormat::Text => {
            println!("Configuration Paths");
            println!("{}", "─".repeat(40));
            println!();
            println!("Config dir:    {}", config_dir.display());
            println!("Settings file: {}", store.path().display());
            println!("Data dir:      {}", data_dir.display());
        }
        OutputFormat::Json => {
            let paths = serde_json::json!({
                "config_dir": config_dir.display().to_string(),
                "settings_file": store.path().display().to_string(),
                "data_dir": data_dir.display().to_string(),
            });
            println!("{}", JsonFormatter::new(cli.pretty).format(&paths)?);
        }
    }

    Ok(())
}

async fn set_theme(theme: Theme, cli: &Cli) -> Result<()> {
    let settings = load_settings(cli).await?.get().await;
    ThemeStore::new(open_kv(&settings)).set(theme);

    info!(theme = %theme, "Theme updated");
    if !cli.quiet {
        println!("Theme set to: {theme}");
    }
    Ok(())
}

async fn reset_config(cli: &Cli) -> Result<()> {
    let store = load_settings(cli).await?;
    store.reset().await;
    store.save().await?;

    info!(path = %store.path().display(), "Settings reset");
    if !cli.quiet {
        println!("Configuration reset to defaults");
    }
    Ok(())
}
