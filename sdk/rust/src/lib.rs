//! HTTP client for the order gateway.

mod client;

pub use client::{GatewayClient, PrincipalKind, Reply};
