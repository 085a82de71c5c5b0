//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Validated config → signer + registry → metrics → bind listeners → serve
//!
//! Shutdown (shutdown.rs):
//!     Trigger → gateway and admin listeners stop accepting → drain → exit
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → trigger graceful shutdown
//! ```
//!
//! # Design Decisions
//! - Fail fast: a weak signing key or an unbindable address is fatal
//! - Listeners start last (traffic only when ready)
//! - In-flight guarded calls finish on their own tasks during drain

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::Shutdown;
