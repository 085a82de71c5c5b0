//! Identity subsystem.
//!
//! # Data Flow
//! ```text
//! Successful login lookup (gateway dispatcher)
//!     → signer.rs (HS256 over {sub, role, iat[, exp]})
//!     → compact token returned in the login body
//!
//! Verifying party (another service, or tests):
//!     → signer.rs verify / authorize (same key, expected role)
//! ```
//!
//! # Design Decisions
//! - The key is injected once at startup; the signer holds no other state
//! - A short key is a startup error, never a per-request one
//! - Tokens carry no expiry unless `auth.token_ttl_secs` is set

pub mod claims;
pub mod signer;

pub use claims::{Claims, Role};
pub use signer::{AuthError, TokenSigner};
