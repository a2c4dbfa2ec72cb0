//! Serve command - run the generation proxy.

use std::net::SocketAddr;

use anyhow::{Context, Result};
use clap::Args;
use infinipedia_proxy::{DEFAULT_ADDR, ProxyState, serve};

use super::session::load_settings;
use crate::Cli;

/// Arguments for the serve command.
#[derive(Args)]
pub struct ServeArgs {
    /// Address to listen on.
    #[arg(long, default_value = DEFAULT_ADDR)]
    pub addr: SocketAddr,
}

/// Runs the serve command.
pub async fn run(args: &ServeArgs, cli: &Cli) -> Result<()> {
    let settings = load_settings(cli).await?.get().await;
    let state = ProxyState::from_config(&settings.provider)
        .context("Failed to set up the upstream provider")?
        .with_retry(settings.retry.policy());

    if !cli.quiet {
        eprintln!("Serving POST /api/generate on http://{}", args.addr);
    }
    serve(args.addr, state).await?;
    Ok(())
}
