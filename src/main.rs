//! API gateway (v1)
//!
//! # Architecture Overview
//!
//! ```text
//!                      ┌──────────────────────────────────────────────────┐
//!                      │                   API GATEWAY                    │
//!                      │                                                  │
//!   Client Request     │  ┌─────────┐   ┌───────────┐   ┌─────────────┐   │
//!   ───────────────────┼─▶│  http   │──▶│ admission │──▶│  discovery  │◀──┼──── Health
//!                      │  │ server  │   │  (quota)  │   │  resolver   │   │     Registry
//!                      │  └─────────┘   └───────────┘   └──────┬──────┘   │
//!                      │                                       │          │
//!                      │                                       ▼          │
//!   Client Response    │  ┌─────────┐                   ┌─────────────┐   │
//!   ◀──────────────────┼──│response │◀──────────────────│ forwarding  │◀──┼──── Upstream
//!                      │  │ mapping │                   │   engine    │   │     Instance
//!                      │  └─────────┘                   └─────────────┘   │
//!                      │                                                  │
//!                      │  config · observability · lifecycle              │
//!                      └──────────────────────────────────────────────────┘
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use api_gateway::lifecycle::startup::{resolve_config, Overrides};
use api_gateway::observability::{logging, metrics};
use api_gateway::{GatewayServer, Shutdown};

#[derive(Parser)]
#[command(name = "api-gateway")]
#[command(about = "Service-discovery API gateway", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(short, long, env = "GATEWAY_CONFIG")]
    config: Option<PathBuf>,

    /// Listener bind address, overriding the file.
    #[arg(short, long, env = "GATEWAY_BIND")]
    bind: Option<String>,

    /// Health registry base URL, overriding the file.
    #[arg(long, env = "CONSUL_URL")]
    registry_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let overrides = Overrides {
        bind_address: cli.bind,
        registry_url: cli.registry_url,
    };
    let config = resolve_config(cli.config.as_deref(), overrides)?;

    logging::init_logging(&config.observability);
    tracing::info!("api-gateway v{} starting", env!("CARGO_PKG_VERSION"));

    if config.observability.metrics_enabled {
        let addr: SocketAddr = config.observability.metrics_address.parse()?;
        metrics::init_metrics(addr);
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    shutdown.trigger_on_signal();

    let server = GatewayServer::new(config)?;
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
