//! Circuit breaker for downstream service protection.
//!
//! # States
//! - Closed: normal operation, calls pass through
//! - Open: dependency assumed down, calls fail fast
//! - Half-Open: a bounded number of trial calls test recovery
//!
//! # State Transitions
//! ```text
//! Closed → Open: consecutive failures >= failure_threshold,
//!                or windowed failure ratio >= failure_rate_threshold
//! Open → Half-Open: open_duration elapsed (checked on the next call)
//! Half-Open → Closed: a trial call succeeds (counters reset)
//! Half-Open → Open: a trial call fails (timer restarts)
//! ```
//!
//! # Design Decisions
//! - One lock-protected record per breaker; every admission decision and
//!   every outcome is applied under that lock
//! - Each state entry bumps a generation; outcomes from calls admitted
//!   under an earlier generation are discarded, so late completions can
//!   never trigger a second transition
//! - Only the error branch of the guarded call counts as a failure; the
//!   caller decides what an error is
//! - No timeout here; deadlines belong to the downstream call

use std::collections::VecDeque;
use std::future::Future;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use serde::Serialize;
use thiserror::Error;

use crate::config::BreakerConfig;
use crate::observability::metrics;

/// Breaker state.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BreakerState {
    Closed = 0,
    Open = 1,
    HalfOpen = 2,
}

impl BreakerState {
    pub fn as_str(self) -> &'static str {
        match self {
            BreakerState::Closed => "closed",
            BreakerState::Open => "open",
            BreakerState::HalfOpen => "half_open",
        }
    }
}

/// Why a guarded call did not produce a value.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CallError<E> {
    /// The breaker rejected the call without invoking the downstream operation.
    #[error("circuit breaker '{0}' is open")]
    Open(String),

    /// The downstream operation ran and failed.
    #[error("downstream call failed: {0}")]
    Failed(E),
}

/// Point-in-time view of a breaker, for the admin API.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct BreakerSnapshot {
    pub name: String,
    pub state: BreakerState,
    pub consecutive_failures: u32,
    pub window_calls: usize,
    pub window_failures: usize,
    pub trials_admitted: u32,
    pub rejected: u64,
}

#[derive(Debug)]
struct Inner {
    state: BreakerState,
    generation: u64,
    consecutive_failures: u32,
    /// Trailing outcomes, `true` = failure.
    window: VecDeque<bool>,
    window_failures: usize,
    opened_at: Option<Instant>,
    trials_admitted: u32,
    rejected: u64,
}

impl Inner {
    fn new() -> Self {
        Self {
            state: BreakerState::Closed,
            generation: 0,
            consecutive_failures: 0,
            window: VecDeque::new(),
            window_failures: 0,
            opened_at: None,
            trials_admitted: 0,
            rejected: 0,
        }
    }

    fn push_outcome(&mut self, failed: bool, window_size: usize) {
        self.window.push_back(failed);
        if failed {
            self.window_failures += 1;
        }
        while self.window.len() > window_size {
            if self.window.pop_front() == Some(true) {
                self.window_failures -= 1;
            }
        }
    }
}

/// A circuit breaker guarding one downstream dependency.
#[derive(Debug)]
pub struct CircuitBreaker {
    name: String,
    policy: BreakerConfig,
    inner: Mutex<Inner>,
}

impl CircuitBreaker {
    /// Create a closed breaker.
    pub fn new(name: impl Into<String>, policy: BreakerConfig) -> Self {
        Self {
            name: name.into(),
            policy,
            inner: Mutex::new(Inner::new()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn policy(&self) -> &BreakerConfig {
        &self.policy
    }

    /// Current state. An open breaker whose timer has run out still reads
    /// as open until the next call moves it to half-open.
    pub fn state(&self) -> BreakerState {
        self.lock().state
    }

    pub fn snapshot(&self) -> BreakerSnapshot {
        let inner = self.lock();
        BreakerSnapshot {
            name: self.name.clone(),
            state: inner.state,
            consecutive_failures: inner.consecutive_failures,
            window_calls: inner.window.len(),
            window_failures: inner.window_failures,
            trials_admitted: inner.trials_admitted,
            rejected: inner.rejected,
        }
    }

    /// Run `f` through the breaker.
    ///
    /// `Ok` results count as successes and `Err` results as failures. If the
    /// future is dropped or panics before completing, the call is recorded
    /// as a failure.
    pub async fn call<T, E, F, Fut>(&self, f: F) -> Result<T, CallError<E>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let permit = self
            .try_acquire()
            .ok_or_else(|| CallError::Open(self.name.clone()))?;

        match f().await {
            Ok(value) => {
                permit.success();
                Ok(value)
            }
            Err(e) => {
                permit.failure();
                Err(CallError::Failed(e))
            }
        }
    }

    /// Ask for permission to make one call. `None` means the circuit is
    /// open (or half-open with every trial slot taken).
    pub fn try_acquire(&self) -> Option<CallPermit<'_>> {
        let mut inner = self.lock();

        match inner.state {
            BreakerState::Closed => {}
            BreakerState::Open => {
                let elapsed = inner
                    .opened_at
                    .map_or(true, |at| at.elapsed() >= self.policy.open_duration());
                if !elapsed {
                    inner.rejected += 1;
                    return None;
                }
                self.transition(&mut inner, BreakerState::HalfOpen);
                inner.trials_admitted = 1;
            }
            BreakerState::HalfOpen => {
                if inner.trials_admitted >= self.policy.half_open_trials {
                    inner.rejected += 1;
                    return None;
                }
                inner.trials_admitted += 1;
            }
        }

        Some(CallPermit {
            breaker: self,
            generation: inner.generation,
            settled: false,
        })
    }

    /// Force the breaker back to closed with empty counters.
    pub fn reset(&self) {
        let mut inner = self.lock();
        self.transition(&mut inner, BreakerState::Closed);
        tracing::info!(breaker = %self.name, "Circuit breaker reset");
    }

    fn record(&self, generation: u64, failed: bool) {
        let mut inner = self.lock();
        if inner.generation != generation {
            // Admitted before the last transition.
            return;
        }

        match inner.state {
            BreakerState::Closed => {
                inner.push_outcome(failed, self.policy.window_size);
                if failed {
                    inner.consecutive_failures = inner.consecutive_failures.saturating_add(1);
                } else {
                    inner.consecutive_failures = 0;
                }
                if self.should_trip(&inner) {
                    self.transition(&mut inner, BreakerState::Open);
                }
            }
            BreakerState::HalfOpen => {
                let to = if failed {
                    BreakerState::Open
                } else {
                    BreakerState::Closed
                };
                self.transition(&mut inner, to);
            }
            BreakerState::Open => {}
        }
    }

    fn should_trip(&self, inner: &Inner) -> bool {
        if inner.consecutive_failures >= self.policy.failure_threshold {
            return true;
        }
        let calls = inner.window.len();
        calls >= self.policy.minimum_calls
            && calls > 0
            && inner.window_failures as f64 / calls as f64 >= self.policy.failure_rate_threshold
    }

    fn transition(&self, inner: &mut Inner, to: BreakerState) {
        let from = inner.state;
        inner.state = to;
        inner.generation += 1;
        inner.trials_admitted = 0;

        match to {
            BreakerState::Closed => {
                inner.consecutive_failures = 0;
                inner.window.clear();
                inner.window_failures = 0;
                inner.opened_at = None;
            }
            BreakerState::Open => {
                inner.opened_at = Some(Instant::now());
            }
            BreakerState::HalfOpen => {}
        }

        if from != to {
            match to {
                BreakerState::Open => tracing::warn!(
                    breaker = %self.name,
                    from = from.as_str(),
                    to = to.as_str(),
                    consecutive_failures = inner.consecutive_failures,
                    "Circuit breaker opened"
                ),
                _ => tracing::info!(
                    breaker = %self.name,
                    from = from.as_str(),
                    to = to.as_str(),
                    "Circuit breaker state change"
                ),
            }
            metrics::record_breaker_transition(&self.name, to);
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // Every mutation completes before the guard drops, so a poisoned
        // record is still consistent.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Permission to make one call through a breaker.
///
/// Settle it with [`CallPermit::success`] or [`CallPermit::failure`];
/// dropping it unsettled records a failure.
#[must_use = "an unsettled permit is recorded as a failure"]
#[derive(Debug)]
pub struct CallPermit<'a> {
    breaker: &'a CircuitBreaker,
    generation: u64,
    settled: bool,
}

impl CallPermit<'_> {
    pub fn success(mut self) {
        self.settled = true;
        self.breaker.record(self.generation, false);
    }

    pub fn failure(mut self) {
        self.settled = true;
        self.breaker.record(self.generation, true);
    }
}

impl Drop for CallPermit<'_> {
    fn drop(&mut self) {
        if !self.settled {
            self.breaker.record(self.generation, true);
        }
    }
}
