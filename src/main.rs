use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::mpsc;

use dexfeed::api::PokeClient;
use dexfeed::app::{App, AppEvent};
use dexfeed::config::Config;
use dexfeed::ui;

/// Get the config directory path (~/.config/dexfeed/)
fn get_config_dir() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME environment variable not set")?;
    let config_dir = PathBuf::from(home).join(".config").join("dexfeed");
    Ok(config_dir)
}

#[derive(Parser, Debug)]
#[command(name = "dexfeed", about = "Terminal Pokedex backed by PokeAPI")]
struct Args {
    /// Override the API base URL
    #[arg(long, value_name = "URL")]
    api_url: Option<String>,

    /// Disable the background full-catalog preload
    #[arg(long)]
    no_preload: bool,

    /// Write debug logs to a file instead of stderr
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Logging to stderr would corrupt the alternate screen, so the TUI
    // only logs when a file sink is given.
    if let Some(path) = &args.log_file {
        let file = std::fs::File::create(path)
            .with_context(|| format!("Failed to create log file: {}", path.display()))?;
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_writer(std::sync::Arc::new(file))
            .with_ansi(false)
            .init();
    }

    let config_dir = get_config_dir()?;
    let mut config = Config::load(&config_dir.join("config.toml"))?;

    if let Some(url) = args.api_url {
        config.api_base_url = url;
    }
    if args.no_preload {
        config.background_preload = false;
    }

    let http = reqwest::Client::builder()
        .user_agent(concat!("dexfeed/", env!("CARGO_PKG_VERSION")))
        .build()
        .context("Failed to build HTTP client")?;
    let client = PokeClient::new(
        http,
        &config.api_base_url,
        Duration::from_secs(config.request_timeout_secs),
    )
    .context("Invalid API base URL")?;

    let mut app = App::new(client, config);

    // Create event channel for background tasks
    let (event_tx, event_rx) = mpsc::channel::<AppEvent>(32);

    // Run the TUI
    ui::run(&mut app, event_tx, event_rx).await?;

    Ok(())
}
