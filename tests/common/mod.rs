//! Shared utilities for integration and load testing.

#![allow(dead_code)]

use std::net::SocketAddr;

use gateway_sdk::GatewayClient;
use order_gateway::config::BreakerConfig;
use order_gateway::lifecycle::startup::{self, Running};
use order_gateway::service::{InMemoryServices, Services};
use order_gateway::{GatewayConfig, Shutdown};

pub const SECRET: &str = "integration-test-secret-32-bytes";
pub const ADMIN_KEY: &str = "integration-admin-key";

/// Config bound to ephemeral loopback ports, metrics off, admin on.
pub fn test_config(breaker: BreakerConfig) -> GatewayConfig {
    let mut config = GatewayConfig::default();
    config.listener.bind_address = "127.0.0.1:0".into();
    config.breaker = breaker;
    config.auth.secret = SECRET.into();
    config.observability.metrics_enabled = false;
    config.admin.enabled = true;
    config.admin.bind_address = "127.0.0.1:0".into();
    config.admin.api_key = ADMIN_KEY.into();
    config
}

/// A gateway serving an in-memory store on real sockets.
pub struct TestGateway {
    pub store: InMemoryServices,
    pub client: GatewayClient,
    pub address: SocketAddr,
    pub admin_address: SocketAddr,
    pub running: Running,
    shutdown: Shutdown,
}

impl TestGateway {
    pub fn admin_url(&self, path: &str) -> String {
        format!("http://{}{}", self.admin_address, path)
    }

    pub async fn stop(self) {
        self.shutdown.trigger();
        self.running.wait().await.unwrap();
    }
}

pub async fn start_gateway(config: GatewayConfig) -> TestGateway {
    let store = InMemoryServices::new();
    let shutdown = Shutdown::new();
    let running = startup::start(config, Services::in_memory(&store), &shutdown)
        .await
        .unwrap();

    let address = running.address;
    let admin_address = running.admin_address.expect("admin listener enabled");

    TestGateway {
        store,
        client: GatewayClient::new(&format!("http://{}", address)),
        address,
        admin_address,
        running,
        shutdown,
    }
}

/// Plain client for the admin API; callers add `bearer_auth(ADMIN_KEY)`.
pub fn admin_client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}
