//! Define command - generate content for a single topic.

use std::path::PathBuf;

use anyhow::{Result, bail};
use clap::Args;
use infinipedia_core::{Topic, random_topic};
use infinipedia_session::{ExplorePhase, ResolveOutcome};
use tracing::warn;

use super::session::{follow, load_settings, load_theme, open_orchestrator, renderer, save_image};
use crate::output::{ExploreOutput, JsonFormatter};
use crate::{Cli, OutputFormat};

/// Arguments for the define command.
#[derive(Args)]
pub struct DefineArgs {
    /// Topic to define. Multiple words are joined with spaces.
    #[arg(required = true)]
    pub topic: Vec<String>,

    #[command(flatten)]
    pub options: GenerateOptions,
}

/// Options shared by `define` and `random`.
#[derive(Args, Default)]
pub struct GenerateOptions {
    /// Write the generated image to this file.
    #[arg(long, value_name = "PATH")]
    pub save_image: Option<PathBuf>,

    /// Include the image payload as a data URL in JSON output.
    #[arg(long)]
    pub image_data: bool,
}

/// Runs the define command.
pub async fn run(args: &DefineArgs, cli: &Cli) -> Result<()> {
    let Some(topic) = Topic::parse(args.topic.join(" ")) else {
        bail!("Topic must not be empty");
    };
    define(topic, &args.options, cli).await
}

/// Runs the random command.
pub async fn run_random(options: &GenerateOptions, cli: &Cli) -> Result<()> {
    define(random_topic(), options, cli).await
}

async fn define(topic: Topic, options: &GenerateOptions, cli: &Cli) -> Result<()> {
    let settings = load_settings(cli).await?.get().await;
    let orchestrator = open_orchestrator(&settings)?;

    let ResolveOutcome::Started(epoch) = orchestrator.resolve_topic(topic) else {
        bail!("Topic could not be resolved");
    };

    let state = match cli.format {
        OutputFormat::Text => {
            let mut renderer = renderer(cli, load_theme(&settings));
            follow(&orchestrator, epoch, &mut renderer).await?
        }
        OutputFormat::Json => {
            let state = orchestrator.settled(epoch).await;
            let output = ExploreOutput::from_state(&state, options.image_data);
            println!("{}", JsonFormatter::new(cli.pretty).format(&output)?);
            state
        }
    };

    if let Some(path) = &options.save_image {
        match &state.image {
            Some(image) => save_image(image, path)?,
            None => warn!("No image was generated, nothing saved"),
        }
    }

    if state.phase() == ExplorePhase::Failed {
        bail!(
            "{}",
            state.error.as_deref().unwrap_or("Definition generation failed")
        );
    }
    Ok(())
}
