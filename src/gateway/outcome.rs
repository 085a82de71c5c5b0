//! Outcome taxonomy.
//!
//! `Domain` values are produced inside the guarded call and count as
//! successes to the breaker. `Fallback` is produced only outside it, when the
//! breaker rejected the call or the call failed on infrastructure.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use thiserror::Error;

use crate::auth::AuthError;
use crate::service::{Principal, ServiceError};

/// Result of a downstream call that completed.
#[derive(Debug, Clone, PartialEq)]
pub enum Domain<T> {
    /// Value found or written.
    Found(T),
    /// Deletion completed.
    Deleted,
    /// Lookup miss.
    NotFound,
    /// Write collided with an existing key.
    Conflict(String),
}

impl<T> Domain<T> {
    pub fn from_option(value: Option<T>) -> Self {
        match value {
            Some(value) => Domain::Found(value),
            None => Domain::NotFound,
        }
    }

    pub fn try_map<U, E>(self, f: impl FnOnce(T) -> Result<U, E>) -> Result<Domain<U>, E> {
        Ok(match self {
            Domain::Found(value) => Domain::Found(f(value)?),
            Domain::Deleted => Domain::Deleted,
            Domain::NotFound => Domain::NotFound,
            Domain::Conflict(key) => Domain::Conflict(key),
        })
    }

    /// Metric label.
    pub fn label(&self) -> &'static str {
        match self {
            Domain::Found(_) => "found",
            Domain::Deleted => "deleted",
            Domain::NotFound => "not_found",
            Domain::Conflict(_) => "conflict",
        }
    }
}

/// Degraded result. The only source of 503.
#[derive(Debug, Error)]
pub enum Fallback {
    #[error("circuit breaker '{dependency}' is open")]
    BreakerOpen { dependency: &'static str },

    #[error("dependency '{dependency}' failed: {source}")]
    Infrastructure {
        dependency: &'static str,
        #[source]
        source: ServiceError,
    },
}

impl Fallback {
    pub fn dependency(&self) -> &'static str {
        match self {
            Fallback::BreakerOpen { dependency } | Fallback::Infrastructure { dependency, .. } => dependency,
        }
    }

    /// Metric label.
    pub fn cause(&self) -> &'static str {
        match self {
            Fallback::BreakerOpen { .. } => "breaker_open",
            Fallback::Infrastructure { .. } => "infrastructure",
        }
    }
}

/// Anything a route handler can fail with besides a domain outcome.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error(transparent)]
    Unavailable(#[from] Fallback),

    /// Token minting failed after a successful lookup.
    #[error("failed to issue token: {0}")]
    Token(#[from] AuthError),

    #[error("missing query parameter '{0}'")]
    MissingParam(&'static str),
}

/// Successful login: the principal plus its bearer token.
///
/// Serialises as `{ "<kind>": principal, "token": "<jwt>" }`.
#[derive(Debug, Clone, PartialEq)]
pub struct Login<P> {
    pub principal: P,
    pub token: String,
}

impl<P: Principal> Serialize for Login<P> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry(P::BODY_KEY, &self.principal)?;
        map.serialize_entry("token", &self.token)?;
        map.end()
    }
}
