// Allow common clippy pedantic lints
#![allow(clippy::must_use_candidate)]
#![allow(clippy::needless_pass_by_value)]

//! pinfeed CLI
//!
//! Command-line interface for fetching collections

use anyhow::Context;
use clap::Parser;
use pinfeed::cli::{Cli, Runner};
use tracing::warn;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let runner = Runner::new(cli);

    // Ctrl+C stops every run; partial collections are still written
    let cancel = runner.cancellation().clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, finishing with partial results");
            cancel.cancel();
        }
    });

    // Incomplete collections are reported, not fatal
    runner.run().await.context("pinfeed could not start")?;
    Ok(())
}
