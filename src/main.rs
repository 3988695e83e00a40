//! s3browse - HTTP gateway for browsing S3-compatible buckets
//!
//! Exposes an object-storage account as browsable web pages: the root
//! path lists buckets, a bucket path lists its keys, and a full object
//! path streams the object's bytes.

mod config;
mod errors;
mod path;
mod render;
mod routes;
mod server;
mod storage;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::server::Server;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::parse();
    if let Err(e) = config.validate() {
        error!("{e}");
        std::process::exit(1);
    }

    info!("Starting s3browse");

    let storage = storage::create_backend(&config).await?;
    info!(endpoint = %config.s3_endpoint, "Storage backend initialized");

    let server = Server::new(&config, storage);

    let shutdown_signal = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install CTRL+C signal handler");
        info!("Received shutdown signal");
    };

    if let Err(e) = server.start(shutdown_signal).await {
        error!(error = %e, "Server error");
        return Err(e);
    }

    info!("Server shutdown complete");
    Ok(())
}
