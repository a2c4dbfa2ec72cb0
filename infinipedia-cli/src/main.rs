// Lint configuration for this crate
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! Infinipedia CLI - an endless encyclopedia in the terminal.
//!
//! # Examples
//!
//! ```bash
//! # Interactive exploration
//! infinipedia
//! infinipedia explore "Black Hole"
//!
//! # One-shot definition with art and image
//! infinipedia define Gravity --save-image gravity.png
//!
//! # JSON output
//! infinipedia define Gravity --format json --pretty
//!
//! # Random topic
//! infinipedia random
//!
//! # Run the generation proxy
//! infinipedia serve --addr 127.0.0.1:8787
//! ```

mod commands;
mod output;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use commands::{config, define, explore, history, serve, share};

// ============================================================================
// CLI Definition
// ============================================================================

/// Infinipedia CLI - an endless encyclopedia.
#[derive(Parser)]
#[command(name = "infinipedia")]
#[command(about = "An endless encyclopedia generated on demand")]
#[command(long_about = r#"
Infinipedia writes a short definition, an ASCII illustration and an image
for any topic you give it. Every word of a definition is a new topic.

Providers:
  • Gemini, called directly (set GEMINI_API_KEY)
  • An Infinipedia proxy (`infinipedia serve`)

Examples:
  infinipedia                        # Interactive exploration
  infinipedia define Gravity         # One topic, then exit
  infinipedia random                 # Something unexpected
  infinipedia share "Black Hole"     # Shareable link
  infinipedia --format json define X # JSON output
"#)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run. If none, starts an interactive session.
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output format (text or json).
    #[arg(long, short = 'f', default_value = "text", global = true)]
    pub format: OutputFormat,

    /// Pretty-print JSON output.
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Settings file to use instead of the default one.
    #[arg(long, short, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output (show debug info).
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Disable colored output.
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Quiet mode (minimal output).
    #[arg(long, short, global = true)]
    pub quiet: bool,
}

/// CLI commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Explore topics interactively (default if no command specified).
    #[command(visible_alias = "e")]
    Explore(explore::ExploreArgs),

    /// Generate one topic and exit.
    #[command(visible_alias = "d")]
    Define(define::DefineArgs),

    /// Generate a random topic and exit.
    #[command(visible_alias = "r")]
    Random(define::GenerateOptions),

    /// List or clear visited topics.
    History(history::HistoryArgs),

    /// Print a shareable link for a topic.
    Share(share::ShareArgs),

    /// Run the generation proxy.
    Serve(serve::ServeArgs),

    /// Manage configuration.
    Config(config::ConfigArgs),
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Human-readable text with colors.
    #[default]
    Text,
    /// JSON output for scripting.
    Json,
}

/// CLI exit codes.
#[repr(i32)]
pub enum ExitCode {
    /// Success.
    Success = 0,
    /// General error.
    Error = 1,
}

// ============================================================================
// Logging Setup
// ============================================================================

fn setup_logging(verbose: bool, quiet: bool) {
    if quiet {
        return;
    }

    let filter = if verbose {
        EnvFilter::new("infinipedia=debug,info")
    } else {
        EnvFilter::new("infinipedia=warn")
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let result = match &cli.command {
        Some(Commands::Explore(args)) => explore::run(args, &cli).await,
        Some(Commands::Define(args)) => define::run(args, &cli).await,
        Some(Commands::Random(options)) => define::run_random(options, &cli).await,
        Some(Commands::History(args)) => history::run(args, &cli).await,
        Some(Commands::Share(args)) => share::run(args, &cli).await,
        Some(Commands::Serve(args)) => serve::run(args, &cli).await,
        Some(Commands::Config(args)) => config::run(args, &cli).await,
        None => explore::run(&explore::ExploreArgs::default(), &cli).await,
    };

    if let Err(e) = result {
        if !cli.quiet {
            eprintln!("Error: {e:#}");
        }
        std::process::exit(ExitCode::Error as i32);
    }

    Ok(())
}
