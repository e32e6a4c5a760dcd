use anyhow::Context;
use clap::{Parser, Subcommand};
use std::sync::Arc;
use tracing::{error, info};

use tk_api::{
    config::{Config, DEFAULT_CONFIG_PATH},
    logger,
    server::HttpServer,
    services::{ticket::Ticket, upstream::UpstreamClient},
    storage, supervisor, AppState,
};

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[derive(Parser)]
#[command(name = "tk_api", version, about = "Show/event/place catalog proxy")]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: String,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Print build info as JSON and exit
    Version,
}

fn print_version() {
    let info = serde_json::json!({
        "name": env!("CARGO_PKG_NAME"),
        "release": env!("CARGO_PKG_VERSION"),
    });
    println!("{info}");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    if let Some(Command::Version) = cli.command {
        print_version();
        return Ok(());
    }

    let config = Config::load(&cli.config)
        .with_context(|| format!("Can't load config file: {}", cli.config))?;
    logger::init(&config.logger)?;

    info!("Starting {} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));

    // Хранилище обязано подключиться, иначе работать нечем
    let storage = storage::new_storage(&config.storage);
    let ticket = match Ticket::new(storage).await {
        Ok(ticket) => Arc::new(ticket),
        Err(e) => {
            error!("Can't connect to storage: {}", e);
            std::process::exit(1);
        }
    };

    let upstream = UpstreamClient::from_config(&config.upstream)
        .context("Failed to create upstream HTTP client")?;
    let state = Arc::new(AppState {
        app: ticket.clone(),
        upstream,
    });

    let server = Arc::new(HttpServer::new(&config.http, state));
    supervisor::run(ticket, server, supervisor::wait_for_signal()).await;

    info!("{} stopped", env!("CARGO_PKG_NAME"));
    Ok(())
}
