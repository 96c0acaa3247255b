use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use qb_config::QuoteConfig;
use qb_store::QuoteStore;

mod cli;
mod csrf;
mod error;
mod pages;
mod routes;
mod server;

fn main() {
    if let Err(error) = run() {
        eprintln!("quotebook error: {error:#}");
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    init_tracing(cli.quiet, cli.verbose)?;

    dotenvy::dotenv().ok();
    let config =
        QuoteConfig::load_with_overrides(&cli.overrides()).context("failed to load configuration")?;

    let store = QuoteStore::open(&config.quotes_dir).with_context(|| {
        format!("failed to open quote store at {}", config.quotes_dir.display())
    })?;
    tracing::info!(dir = %config.quotes_dir.display(), "using quote store");

    let app = Arc::new(routes::App::new(store, &config));
    server::serve(app, &config.listen, config.workers)?;
    Ok(())
}

fn init_tracing(quiet: bool, verbose: bool) -> anyhow::Result<()> {
    let level = if quiet {
        "warn"
    } else if verbose {
        "debug"
    } else {
        "info"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env("QUOTEBOOK_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}
