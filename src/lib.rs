//! Resilient REST gateway for the order platform.
//!
//! Every entity route goes through a per-dependency circuit breaker; the
//! four principal kinds additionally get a signed bearer token on login.

pub mod admin;
pub mod api;
pub mod auth;
pub mod config;
pub mod gateway;
pub mod http;
pub mod lifecycle;
pub mod model;
pub mod observability;
pub mod resilience;
pub mod service;

pub use config::schema::GatewayConfig;
pub use gateway::Gateway;
pub use http::GatewayServer;
pub use lifecycle::Shutdown;
