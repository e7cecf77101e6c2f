//! Draftview Development Backend
//!
//! Run with: cargo run --bin draftview-devserver
//!
//! # Configuration
//!
//! Environment variables:
//! - `DRAFTVIEW_DEVSERVER_HOST`: Host to bind to (default: 127.0.0.1)
//! - `DRAFTVIEW_DEVSERVER_PORT`: Port to listen on (default: 5000)
//! - `DRAFTVIEW_CARDS_PATH`: JSON card list with `id`, `cost` and `name`
//! - `RUST_LOG`: Log filter (default: draftview=info)

use clap::Parser;
use draftview::Config;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "draftview-devserver")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "In-memory drafting backend for local runs")]
struct Args {
    /// Config file (default: ~/.config/draftview/config.toml or ./draftview.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Host to bind to
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long)]
    port: Option<u16>,

    /// Card catalog (JSON)
    #[arg(long)]
    cards: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };
    if let Some(host) = args.host {
        config.devserver.host = host;
    }
    if let Some(port) = args.port {
        config.devserver.port = port;
    }
    if args.cards.is_some() {
        config.devserver.cards_path = args.cards;
    }

    draftview::logging::init(&config.logging);
    tracing::info!("Starting draft dev server v{}", env!("CARGO_PKG_VERSION"));

    draftview::devserver::serve(&config.devserver).await?;

    Ok(())
}
