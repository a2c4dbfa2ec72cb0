//! History command - list or clear visited topics.

use anyhow::Result;
use clap::Args;
use infinipedia_store::HistoryTracker;

use super::session::{load_settings, load_theme, open_kv};
use crate::output::{HistoryOutput, JsonFormatter, TextFormatter};
use crate::{Cli, OutputFormat};

/// Arguments for the history command.
#[derive(Args)]
pub struct HistoryArgs {
    /// Forget every entry.
    #[arg(long)]
    pub clear: bool,
}

/// Runs the history command.
pub async fn run(args: &HistoryArgs, cli: &Cli) -> Result<()> {
    let settings = load_settings(cli).await?.get().await;
    let history = HistoryTracker::load(open_kv(&settings), settings.history_limit);

    if args.clear {
        history.clear();
        if !cli.quiet {
            println!("History cleared");
        }
        return Ok(());
    }

    match cli.format {
        OutputFormat::Text => {
            let formatter = TextFormatter::new(!cli.no_color, load_theme(&settings));
            println!("{}", formatter.format_history(&history.entries()));
        }
        OutputFormat::Json => {
            let output = HistoryOutput {
                limit: history.limit(),
                entries: history.entries(),
            };
            println!("{}", JsonFormatter::new(cli.pretty).format(&output)?);
        }
    }

    Ok(())
}
