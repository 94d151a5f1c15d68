//! Cache bootstrap - application entry point
//!
//! Loads cache settings, establishes the connection (retrying, then failing
//! or degrading per environment mode) and dispatches to a command. A fatal
//! establishment error exits with status 1.

mod cli;
mod commands;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use common::CacheSettings;
use domain::EnvironmentMode;

use cli::{Cli, Commands};
use commands::Context;

#[tokio::main]
async fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize tracing (verbose mode sets debug level)
    init_tracing(cli.verbose);

    // Load configuration
    let mut settings = CacheSettings::from_env();
    if let Some(max_retries) = cli.max_retries {
        settings.connection.max_retries = max_retries;
    }
    tracing::debug!(settings = ?settings, "Configuration loaded");

    let ctx = Context {
        settings,
        mode: cli
            .profile
            .as_deref()
            .map(|p| EnvironmentMode::from_profile(Some(p))),
        namespace: cli.namespace,
    };

    // Execute command
    let result = match cli.command {
        Commands::Check(args) => commands::check::execute(args, ctx).await,
        Commands::Get(args) => commands::ops::get(args, ctx).await,
        Commands::Set(args) => commands::ops::set(args, ctx).await,
        Commands::Del(args) => commands::ops::delete(args, ctx).await,
        Commands::Selftest => commands::selftest::execute(ctx).await,
    };

    // Handle errors
    if let Err(e) = result {
        tracing::error!("Command failed: {}", e);
        std::process::exit(1);
    }
}

/// Initialize tracing subscriber
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        "debug".to_string()
    } else {
        std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string())
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::new(filter))
        .init();
}
