//! Startup orchestration.
//!
//! # Responsibilities
//! - Build the signer and breaker registry from validated configuration
//! - Install the metrics exporter
//! - Bind the gateway and admin listeners and start serving
//!
//! # Design Decisions
//! - Subsystems initialize in order, not concurrently
//! - Listeners bind last; a bind failure aborts startup

use std::net::SocketAddr;
use std::sync::Arc;

use thiserror::Error;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use crate::admin::{self, AdminState};
use crate::auth::AuthError;
use crate::config::GatewayConfig;
use crate::gateway::Gateway;
use crate::http::GatewayServer;
use crate::lifecycle::{signals, Shutdown};
use crate::observability::metrics;
use crate::service::Services;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("signing key rejected: {0}")]
    Auth(#[from] AuthError),

    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Serve(#[from] std::io::Error),

    #[error("server task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Listeners that are up and serving.
pub struct Running {
    pub gateway: Gateway,
    pub address: SocketAddr,
    pub admin_address: Option<SocketAddr>,
    server: JoinHandle<Result<(), std::io::Error>>,
    admin: Option<JoinHandle<Result<(), std::io::Error>>>,
}

impl Running {
    /// Wait for every listener to stop.
    pub async fn wait(self) -> Result<(), StartupError> {
        self.server.await??;
        if let Some(admin) = self.admin {
            admin.await??;
        }
        Ok(())
    }
}

async fn bind(address: &str) -> Result<TcpListener, StartupError> {
    TcpListener::bind(address).await.map_err(|source| StartupError::Bind {
        address: address.to_string(),
        source,
    })
}

/// Bring the gateway up; listeners stop when `shutdown` is triggered.
pub async fn start(config: GatewayConfig, services: Services, shutdown: &Shutdown) -> Result<Running, StartupError> {
    let gateway = Gateway::from_config(&config, services)?;

    tracing::info!(
        failure_threshold = config.breaker.failure_threshold,
        open_duration_ms = config.breaker.open_duration_ms,
        half_open_trials = config.breaker.half_open_trials,
        downstream_ms = config.timeouts.downstream_ms,
        "Gateway configured"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(e) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                error = %e,
                "Failed to parse metrics address"
            ),
        }
    }

    let (admin, admin_address) = if config.admin.enabled {
        let listener = bind(&config.admin.bind_address).await?;
        let address = listener.local_addr()?;
        let state = AdminState {
            registry: Arc::clone(gateway.registry()),
            api_key: Arc::from(config.admin.api_key.as_str()),
        };
        let handle = tokio::spawn(admin::run_admin(listener, state, shutdown.subscribe()));
        (Some(handle), Some(address))
    } else {
        (None, None)
    };

    let listener = bind(&config.listener.bind_address).await?;
    let address = listener.local_addr()?;
    let server = GatewayServer::new(config, gateway.clone());
    let server = tokio::spawn(server.run(listener, shutdown.subscribe()));

    Ok(Running {
        gateway,
        address,
        admin_address,
        server,
        admin,
    })
}

/// Start, serve until SIGINT/SIGTERM, then drain.
pub async fn run(config: GatewayConfig, services: Services) -> Result<(), StartupError> {
    let shutdown = Shutdown::new();
    let running = start(config, services, &shutdown).await?;
    tracing::info!(address = %running.address, "Gateway ready");

    signals::shutdown_signal().await;
    shutdown.trigger();
    running.wait().await
}
