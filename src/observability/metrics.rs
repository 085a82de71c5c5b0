//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_requests_total` (counter): requests by dependency, outcome
//! - `gateway_fallback_total` (counter): 503s by dependency and cause
//! - `gateway_downstream_duration_seconds` (histogram): latency of calls that
//!   reached the dependency (breaker rejections excluded)
//! - `gateway_breaker_transitions_total` (counter): state changes by breaker, target
//! - `gateway_breaker_state` (gauge): 0=closed, 1=open, 2=half-open; set when
//!   a breaker is created and on every transition
//! - `gateway_tokens_issued_total` (counter): tokens by role

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

use crate::resilience::circuit_breaker::BreakerState;

/// Install the Prometheus recorder with its own scrape listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_request(dependency: &'static str, outcome: &'static str) {
    metrics::counter!("gateway_requests_total", "dependency" => dependency, "outcome" => outcome)
        .increment(1);
}

pub fn record_downstream_duration(dependency: &'static str, start: Instant) {
    metrics::histogram!("gateway_downstream_duration_seconds", "dependency" => dependency)
        .record(start.elapsed().as_secs_f64());
}

pub fn record_fallback(dependency: &'static str, cause: &'static str) {
    metrics::counter!("gateway_fallback_total", "dependency" => dependency, "cause" => cause)
        .increment(1);
}

pub fn record_breaker_transition(breaker: &str, to: BreakerState) {
    metrics::counter!(
        "gateway_breaker_transitions_total",
        "breaker" => breaker.to_string(),
        "to" => to.as_str()
    )
    .increment(1);
    record_breaker_state(breaker, to);
}

pub fn record_breaker_state(breaker: &str, state: BreakerState) {
    metrics::gauge!("gateway_breaker_state", "breaker" => breaker.to_string())
        .set(f64::from(state as u8));
}

pub fn record_token_issued(role: &'static str) {
    metrics::counter!("gateway_tokens_issued_total", "role" => role).increment(1);
}
