//! # Albumen Server
//!
//! Serves a local photo directory over HTTP together with the capture
//! details embedded in each image.

use albumen_server::{AppState, config::Config, create_app};
use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// CLI entry point
#[derive(Parser, Debug)]
#[command(name = "albumen-server")]
#[command(about = "Local photo server with embedded capture details")]
struct ServeArgs {
    /// Server port (overrides config)
    #[arg(short, long, env = "SERVER_PORT")]
    port: Option<u16>,

    /// Server host (overrides config)
    #[arg(long, env = "SERVER_HOST")]
    host: Option<String>,

    /// Directory holding the photos to serve (overrides config)
    #[arg(long, env = "PHOTOS_DIR")]
    photos_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env before clap reads its env fallbacks
    dotenvy::dotenv().ok();
    let args = ServeArgs::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "albumen_server=info,albumen_core=info,tower_http=warn".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = load_config(&args).context("failed to load configuration")?;

    if config.photos_dir.is_dir() {
        info!("Photo directory: {}", config.photos_dir.display());
    } else {
        warn!(
            "Photo directory {} does not exist - listings will return 404 until it is created",
            config.photos_dir.display()
        );
    }

    let host = config.server_host.clone();
    let port = config.server_port;
    let app = create_app(AppState::new(config));

    let listener = tokio::net::TcpListener::bind((host.as_str(), port))
        .await
        .with_context(|| format!("failed to bind {host}:{port}"))?;
    info!(
        "Starting Albumen photo server on http://{}",
        listener.local_addr()?
    );

    axum::serve(listener, app).await?;

    Ok(())
}

fn load_config(args: &ServeArgs) -> anyhow::Result<Config> {
    let mut config = Config::from_env()?;

    if let Some(port) = args.port {
        config.server_port = port;
    }
    if let Some(host) = args.host.clone() {
        config.server_host = host;
    }
    if let Some(photos_dir) = args.photos_dir.clone() {
        config.photos_dir = photos_dir;
    }

    Ok(config)
}
