//! Outcome to response mapping.
//!
//! # Status Contract
//! - `Domain::Found` → 200 with JSON body
//! - `Domain::Deleted` → 204, no body
//! - `Domain::NotFound` → 404
//! - `Domain::Conflict` → 409
//! - `Fallback` (breaker open or infrastructure) → 503, one body for both
//! - missing query parameter → 400, token signing failure → 500

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::json;

use crate::gateway::{Domain, Fallback, GatewayError};

fn error_body(status: StatusCode, message: String) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

impl<T: Serialize> IntoResponse for Domain<T> {
    fn into_response(self) -> Response {
        match self {
            Domain::Found(value) => (StatusCode::OK, Json(value)).into_response(),
            Domain::Deleted => StatusCode::NO_CONTENT.into_response(),
            Domain::NotFound => error_body(StatusCode::NOT_FOUND, "not found".into()),
            Domain::Conflict(key) => error_body(StatusCode::CONFLICT, format!("duplicate key '{key}'")),
        }
    }
}

impl IntoResponse for Fallback {
    fn into_response(self) -> Response {
        // Cause stays internal (logs, metrics); clients see one answer.
        error_body(StatusCode::SERVICE_UNAVAILABLE, "service unavailable".into())
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        match self {
            GatewayError::Unavailable(fallback) => fallback.into_response(),
            GatewayError::Token(e) => {
                tracing::error!(error = %e, "Token signing failed");
                error_body(StatusCode::INTERNAL_SERVER_ERROR, "failed to issue token".into())
            }
            GatewayError::MissingParam(name) => {
                error_body(StatusCode::BAD_REQUEST, format!("missing query parameter '{name}'"))
            }
        }
    }
}
