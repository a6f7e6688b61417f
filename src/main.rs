use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use quakemap::{config, feed, render, server};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch both feeds once and write the map page
    Render {
        #[arg(short, long, value_name = "FILE", default_value = "config.toml")]
        config: PathBuf,
        /// Overrides output.html from the config
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
    /// Serve the map, rebuilding it on every request
    Serve {
        #[arg(short, long, value_name = "FILE", default_value = "config.toml")]
        config: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match &cli.command {
        Commands::Render { config, output } => {
            info!("Rendering map with config: {:?}", config);
            let app_config = config::AppConfig::load_from_file(config)?;
            let fetcher = feed::HttpFetcher::new(app_config.feeds.timeout())
                .context("Failed to build HTTP client")?;
            let path = output.clone().unwrap_or_else(|| app_config.output.html.clone());

            render::render_to_file(&app_config, &fetcher, &path).await?;
        }
        Commands::Serve { config } => {
            info!("Serving map with config: {:?}", config);
            let app_config = config::AppConfig::load_from_file(config)?;
            let fetcher = feed::HttpFetcher::new(app_config.feeds.timeout())
                .context("Failed to build HTTP client")?;

            server::start_server(app_config, fetcher).await?;
        }
    }

    Ok(())
}
