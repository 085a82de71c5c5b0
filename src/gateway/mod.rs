//! Gateway dispatcher subsystem.
//!
//! # Data Flow
//! ```text
//! Route handler
//!     → dispatcher.rs (resolve breaker by dependency name)
//!     → breaker admits? ── no ──→ Fallback::BreakerOpen ──→ 503
//!     → downstream call on its own task, under the deadline
//!         value / absence / duplicate → Domain (breaker success) → 200 / 204 / 404 / 409
//!         infrastructure error        → Fallback::Infrastructure → 503
//!     → login only: token signer after a Found lookup
//! ```
//!
//! # Design Decisions
//! - Domain outcomes are built inside the guarded call; nothing but
//!   `Fallback` maps to 503
//! - No cancellation: a dispatched call runs to completion even if the
//!   client disconnects
//! - One generic login flow for every principal kind

pub mod dispatcher;
pub mod outcome;

pub use dispatcher::Gateway;
pub use outcome::{Domain, Fallback, GatewayError, Login};
