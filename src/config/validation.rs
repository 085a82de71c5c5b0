//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (thresholds > 0, ratio within (0, 1])
//! - Reject signing keys too short for HMAC-SHA256
//! - Keep the downstream deadline inside the request timeout
//! - Check addresses parse
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GatewayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use crate::config::schema::GatewayConfig;

/// Minimum HMAC key length in bytes (256 bits).
pub const MIN_SECRET_LEN: usize = 32;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field, e.g. `breaker.window_size`.
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Check every semantic rule and collect all violations.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "listener.bind_address",
            format!("'{}' is not a socket address", config.listener.bind_address),
        ));
    }
    if config.listener.max_connections == 0 {
        errors.push(ValidationError::new("listener.max_connections", "must be greater than 0"));
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::new("timeouts.request_secs", "must be greater than 0"));
    }
    if config.timeouts.downstream_ms == 0 {
        errors.push(ValidationError::new("timeouts.downstream_ms", "must be greater than 0"));
    }
    // Downstream deadline must expire before the whole-request timeout.
    let request_ms = config.timeouts.request_secs.saturating_mul(1000);
    if config.timeouts.request_secs > 0 && config.timeouts.downstream_ms >= request_ms {
        errors.push(ValidationError::new(
            "timeouts.downstream_ms",
            format!("must be less than timeouts.request_secs ({request_ms} ms)"),
        ));
    }

    let breaker = &config.breaker;
    if breaker.failure_threshold == 0 {
        errors.push(ValidationError::new("breaker.failure_threshold", "must be greater than 0"));
    }
    if breaker.window_size == 0 {
        errors.push(ValidationError::new("breaker.window_size", "must be greater than 0"));
    }
    if breaker.minimum_calls == 0 || breaker.minimum_calls > breaker.window_size {
        errors.push(ValidationError::new(
            "breaker.minimum_calls",
            format!("must be between 1 and window_size ({})", breaker.window_size),
        ));
    }
    if !(breaker.failure_rate_threshold > 0.0 && breaker.failure_rate_threshold <= 1.0) {
        errors.push(ValidationError::new(
            "breaker.failure_rate_threshold",
            "must be within (0.0, 1.0]",
        ));
    }
    if breaker.open_duration_ms == 0 {
        errors.push(ValidationError::new("breaker.open_duration_ms", "must be greater than 0"));
    }
    if breaker.half_open_trials == 0 {
        errors.push(ValidationError::new("breaker.half_open_trials", "must be greater than 0"));
    }

    if config.auth.secret.len() < MIN_SECRET_LEN {
        errors.push(ValidationError::new(
            "auth.secret",
            format!("must be at least {MIN_SECRET_LEN} bytes"),
        ));
    }
    if config.auth.token_ttl_secs == Some(0) {
        errors.push(ValidationError::new("auth.token_ttl_secs", "must be greater than 0 when set"));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!("'{}' is not a socket address", config.observability.metrics_address),
        ));
    }

    if config.admin.enabled {
        if config.admin.api_key.is_empty() {
            errors.push(ValidationError::new("admin.api_key", "must not be empty"));
        }
        if config.admin.bind_address.parse::<SocketAddr>().is_err() {
            errors.push(ValidationError::new(
                "admin.bind_address",
                format!("'{}' is not a socket address", config.admin.bind_address),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
