//! REST route groups, one per entity.
//!
//! # Data Flow
//! ```text
//! /{Entity}Controller/{operation}
//!     → query / JSON extraction (400 on missing or malformed input,
//!       before any breaker is consulted)
//!     → Gateway::guard(dependency, service call)
//!     → Domain | Fallback → status code (http/response.rs)
//! ```
//!
//! # Design Decisions
//! - The four principal kinds share one generic set of handlers
//! - Deletes always answer 204, whether or not the row existed

pub mod address;
pub mod cart;
pub mod food;
pub mod order;
pub mod order_detail;
pub mod principal;

use std::collections::HashMap;

use axum::Router;

use crate::gateway::{Gateway, GatewayError};

/// Raw query string for handlers whose parameter names vary by kind.
pub type Params = HashMap<String, String>;

/// Pull a required parameter out of `params`.
pub fn required(params: &Params, name: &'static str) -> Result<String, GatewayError> {
    params.get(name).cloned().ok_or(GatewayError::MissingParam(name))
}

/// Every entity route group.
pub fn routes() -> Router<Gateway> {
    Router::new()
        .merge(principal::admin_routes())
        .merge(principal::business_routes())
        .merge(principal::driver_routes())
        .merge(principal::user_routes())
        .merge(cart::routes())
        .merge(address::routes())
        .merge(food::routes())
        .merge(order::routes())
        .merge(order_detail::routes())
}
