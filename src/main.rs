//! Exa CLI
//!
//! Command-line client for the Exa search, contents, answer and context API

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::debug;

use exa_cli::commands::{self, Cli, CommandContext};
use exa_cli::config::{CredentialStore, Settings};
use exa_cli::output::render_error;
use exa_cli::utils::logging::init_logging;
use exa_cli::AppError;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let mode = cli.global.output_mode();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if e.downcast_ref::<AppError>().map_or(true, AppError::should_log_details) {
                debug!("Command failed: {:?}", e);
            }
            render_error(&e, mode);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    // Load .env file if it exists
    dotenv::dotenv().ok();

    let store = CredentialStore::default_location()?;
    let settings = Settings::load(&store).context("Failed to load settings")?;

    init_logging(&settings.logging, cli.global.debug);
    debug!("{}", exa_cli::version_info());
    debug!("Using API endpoint {}", settings.api.base_url);

    let ctx = CommandContext::new(settings, store, &cli.global);
    commands::execute(&cli.command, &ctx).await?;

    Ok(())
}
