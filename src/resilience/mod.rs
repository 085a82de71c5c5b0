//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Guarded downstream call:
//!     → registry.rs (get-or-create the breaker named after the dependency)
//!     → circuit_breaker.rs (admit or reject; record the outcome)
//!     → timeouts.rs (deadline on the downstream call itself)
//! ```
//!
//! # Design Decisions
//! - One breaker per dependency name, shared by every request for the
//!   process lifetime, so failure history accumulates
//! - Never retry; retry policy belongs to the caller
//! - Domain outcomes (not found, duplicate key) are successes to the breaker

pub mod circuit_breaker;
pub mod registry;
pub mod timeouts;

pub use circuit_breaker::{BreakerSnapshot, BreakerState, CallError, CallPermit, CircuitBreaker};
pub use registry::BreakerRegistry;
