//! Order gateway
//!
//! ```text
//!                  ┌───────────────────────────────────────────────────────┐
//!   Request        │  http server ──▶ api route ──▶ gateway dispatcher     │
//!   ───────────────┼─▶ (request id,    (query/body     │                  │
//!                  │    trace, limits)  extraction)    ▼                  │
//!                  │                           breaker registry           │
//!                  │                                   │                  │
//!                  │                  open? ◀──────────┤                  │
//!                  │                    │              ▼                  │
//!   Response       │                 503 fallback   service layer ──▶ token signer (login)
//!   ◀──────────────┼── 200/204/404/409 ◀────────────────┘                 │
//!                  └───────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;

use order_gateway::config::loader::{default_config, load_config};
use order_gateway::lifecycle::startup;
use order_gateway::observability::logging::init_logging;
use order_gateway::service::{InMemoryServices, Services};

#[derive(Parser)]
#[command(name = "order-gateway")]
#[command(about = "Circuit-breaking REST gateway for the order platform", long_about = None)]
struct Args {
    /// Path to a TOML config file; built-in defaults when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => default_config()?,
    };

    init_logging(&config.observability);

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "order-gateway starting");
    tracing::info!(
        bind_address = %config.listener.bind_address,
        max_connections = config.listener.max_connections,
        request_timeout_secs = config.timeouts.request_secs,
        admin_enabled = config.admin.enabled,
        "Configuration loaded"
    );

    let store = InMemoryServices::new();
    startup::run(config, Services::in_memory(&store)).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
