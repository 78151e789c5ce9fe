//! issh CLI
//!
//! `issh [OPTIONS] [SETUP ARGS...] <ENDPOINT>`
//!
//! Every failure is terminal: it is logged, printed, and the process exits 1.

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use issh::output::print_error;
use issh::{Cli, Invocation};
use issh_core::config;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run_cli(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::debug!("Exiting after error: {:?}", e);
            print_error(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}

async fn run_cli(cli: Cli) -> Result<()> {
    let config = config::load_or_default(cli.config.as_deref()).with_context(|| match &cli.config {
        Some(path) => format!("Failed to load config from {:?}", path),
        None => "Failed to load default config".to_string(),
    });

    // Config errors are reported once logging is up
    let log_level = cli
        .log_level()
        .map(str::to_string)
        .or_else(|| config.as_ref().ok().and_then(|c| c.log_level.clone()))
        .unwrap_or_else(|| "warn".to_string());

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or(log_level),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let config = config?;
    tracing::debug!("Effective config: {:?}", config);

    let invocation = Invocation::resolve(&cli, &config)?;
    tracing::debug!("Invocation: {:?}", invocation);

    issh::run(invocation).await?;
    Ok(())
}
