use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use ideas_api::cli::Cli;
use ideas_api::config::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up JWT_SECRET, DATABASE_URL, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    // Refuse to start on missing or malformed configuration
    let config = AppConfig::from_env().context("invalid configuration")?;

    ideas_api::cli::run(cli, config).await
}
