//! Share command - print a shareable link for a topic.

use anyhow::{Context, Result, bail};
use clap::Args;
use infinipedia_core::{Topic, share_url};
use url::Url;

use super::session::load_settings;
use crate::output::JsonFormatter;
use crate::{Cli, OutputFormat};

/// Arguments for the share command.
#[derive(Args)]
pub struct ShareArgs {
    /// Topic to share. Multiple words are joined with spaces.
    #[arg(required = true)]
    pub topic: Vec<String>,

    /// Base URL to use instead of the configured one.
    #[arg(long)]
    pub base: Option<String>,
}

/// Runs the share command.
pub async fn run(args: &ShareArgs, cli: &Cli) -> Result<()> {
    let Some(topic) = Topic::parse(args.topic.join(" ")) else {
        bail!("Topic must not be empty");
    };

    let base = match &args.base {
        Some(base) => base.clone(),
        None => load_settings(cli).await?.get().await.share_base_url,
    };
    let base = Url::parse(&base).with_context(|| format!("Invalid share base URL: {base}"))?;
    let url = share_url(&base, &topic);

    match cli.format {
        OutputFormat::Text => println!("{url}"),
        OutputFormat::Json => {
            let output = serde_json::json!({ "topic": topic, "url": url.as_str() });
            println!("{}", JsonFormatter::new(cli.pretty).format(&output)?);
        }
    }
    Ok(())
}
