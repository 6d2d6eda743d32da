//! GoRadar relay
//!
//! A small HTTP relay that forwards scanner events to the GoRadar aggregator.
//!
//! # Architecture Overview
//!
//! ```text
//!                      ┌──────────────────────────────────────────────────┐
//!                      │                  GORADAR RELAY                    │
//!                      │                                                   │
//!   Scanner POST       │  ┌─────────┐    ┌───────────┐    ┌───────────┐   │
//!   ───────────────────┼─▶│  http   │───▶│ transform │───▶│ upstream  │───┼──▶ data.goradar.io
//!                      │  │ server  │    │ (optional)│    │  client   │   │
//!                      │  └─────────┘    └───────────┘    └─────┬─────┘   │
//!   JSON status        │       ▲                                 │         │
//!   ◀──────────────────┼───────┴─────────────────────────────────┘         │
//!                      │                                                   │
//!                      │  config · observability · lifecycle               │
//!                      └──────────────────────────────────────────────────┘
//! ```

use goradar_relay::cli::Cli;
use goradar_relay::lifecycle;
use goradar_relay::observability::logging;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse_or_exit();
    let config = cli.into_config()?;

    logging::init_logging(&config.observability)?;

    tracing::info!("goradar-relay v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        port = config.listener.port,
        mode = %config.mode,
        upstream = %config.upstream.url,
        upstream_timeout_secs = config.upstream.timeout_secs,
        "Configuration loaded"
    );

    lifecycle::run(config).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
