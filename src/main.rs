//! Blue/green edge emulator.
//!
//! Runs the three edge interceptors the way the CDN does, in front of an
//! S3-compatible origin.
//!
//! # Architecture Overview
//!
//! ```text
//!                      ┌──────────────────────────────────────────────────────┐
//!                      │                     EDGE EMULATOR                     │
//!                      │                                                       │
//!   Viewer Request     │  ┌────────────────┐      ┌────────────────┐          │
//!   ───────────────────┼─▶│ viewer-request │─────▶│ origin-request │          │
//!   Host: app-test.…   │  │   classify     │      │    rewrite     │          │
//!                      │  └────────────────┘      └───────┬────────┘          │
//!                      │   x-blue-green-host               │ origin path      │
//!                      │   x-blue-green-context            │ /blue | /green   │
//!                      │                                   ▼                   │
//!   Viewer Response    │  ┌────────────────┐      ┌────────────────┐          │
//!   ◀──────────────────┼──│origin-response │◀─────│  origin fetch  │◀─────────┼──── Bucket
//!                      │  │   fallback     │      │  (hyper-util)  │          │
//!                      │  └───────┬────────┘      └────────────────┘          │
//!                      │          │ 403/404                                    │
//!                      │          ▼                                            │
//!                      │   GET <scheme>://<viewer host>/index.html             │
//!                      └──────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use blue_green_edge::config::loader::load_config;
use blue_green_edge::observability::{logging, metrics};
use blue_green_edge::{EdgeConfig, EdgeServer, Shutdown};

#[derive(Parser)]
#[command(name = "blue-green-edge")]
#[command(about = "Local edge emulator for blue/green routing", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file. Defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => EdgeConfig::default(),
    };

    logging::init_logging(&config.observability);

    tracing::info!("blue-green-edge v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        origin = %config.origin.domain_name,
        fallback_scheme = %config.fallback.scheme,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server = EdgeServer::new(config)?;
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
