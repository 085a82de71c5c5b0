//! Breaker registry.
//!
//! # Responsibilities
//! - Map a dependency name to its single breaker instance
//! - Create breakers lazily with the configured default policy
//! - Expose snapshots and resets to the admin API

use std::sync::Arc;

use dashmap::DashMap;

use crate::config::BreakerConfig;
use crate::observability::metrics;
use crate::resilience::circuit_breaker::{BreakerSnapshot, BreakerState, CircuitBreaker};

/// Name-keyed arena of breakers. Entries are never removed.
#[derive(Debug)]
pub struct BreakerRegistry {
    breakers: DashMap<String, Arc<CircuitBreaker>>,
    policy: BreakerConfig,
}

impl BreakerRegistry {
    pub fn new(policy: BreakerConfig) -> Self {
        Self {
            breakers: DashMap::new(),
            policy,
        }
    }

    /// Get the breaker for `name`, creating it on first use.
    ///
    /// Racing first calls for the same name all receive the same instance:
    /// construction happens under the shard's write lock.
    pub fn get(&self, name: &str) -> Arc<CircuitBreaker> {
        if let Some(existing) = self.breakers.get(name) {
            return Arc::clone(existing.value());
        }

        let breaker = self
            .breakers
            .entry(name.to_string())
            .or_insert_with(|| {
                tracing::debug!(breaker = %name, "Creating circuit breaker");
                metrics::record_breaker_state(name, BreakerState::Closed);
                Arc::new(CircuitBreaker::new(name, self.policy.clone()))
            });
        Arc::clone(breaker.value())
    }

    /// Look up a breaker without creating it.
    pub fn find(&self, name: &str) -> Option<Arc<CircuitBreaker>> {
        self.breakers.get(name).map(|b| Arc::clone(b.value()))
    }

    /// Snapshots of every breaker, sorted by name.
    pub fn snapshots(&self) -> Vec<BreakerSnapshot> {
        let mut snapshots: Vec<_> = self.breakers.iter().map(|b| b.value().snapshot()).collect();
        snapshots.sort_by(|a, b| a.name.cmp(&b.name));
        snapshots
    }

    /// Force a breaker closed. Returns false if no breaker has that name.
    pub fn reset(&self, name: &str) -> bool {
        match self.find(name) {
            Some(breaker) => {
                breaker.reset();
                true
            }
            None => false,
        }
    }

    pub fn policy(&self) -> &BreakerConfig {
        &self.policy
    }

    pub fn len(&self) -> usize {
        self.breakers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.breakers.is_empty()
    }
}
