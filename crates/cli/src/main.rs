mod args;

use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use buildfetch_core::{
    create_downloader, load_config, load_config_from_env, validate_config, Config, Credential,
    SanitizedConfig,
};

use args::{Cli, Command};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    let verbose = matches!(&cli.command, Command::Download(args) if args.verbose);
    let default_filter = if verbose { "debug" } else { "info" };

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut config = read_config(&cli.config)?;

    match cli.command {
        Command::Config(service) => {
            service.apply(&mut config);
            let sanitized = SanitizedConfig::from(&config);
            println!(
                "{}",
                serde_json::to_string_pretty(&sanitized).context("Failed to render config")?
            );
        }
        Command::Download(args) => {
            args.service.apply(&mut config);
            validate_config(&config).context("Configuration validation failed")?;

            info!("Build service: {}", config.service.base_url());
            info!("Authentication: {}", auth_description(&config));

            let downloader =
                create_downloader(&config).context("Failed to create artifact downloader")?;
            let outcome = downloader
                .run(args.to_request())
                .await
                .context("Artifact download failed")?;

            for warning in &outcome.warnings {
                info!("Skipped: {}", warning);
            }
            info!(
                "Downloaded {} artifact(s) to {}",
                outcome.reports.len(),
                outcome.destination.display()
            );
        }
    }

    Ok(())
}

fn read_config(path: &Path) -> Result<Config> {
    if path.exists() {
        info!("Loading configuration from {:?}", path);
        load_config(path).with_context(|| format!("Failed to load config from {:?}", path))
    } else {
        info!("No configuration file at {:?}, using defaults", path);
        load_config_from_env().context("Failed to load config from environment")
    }
}

fn auth_description(config: &Config) -> &'static str {
    if Credential::from_token(config.service.access_token.as_deref()).is_authenticated() {
        "personal access token"
    } else {
        "anonymous"
    }
}
