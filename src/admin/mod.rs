//! Operator API.
//!
//! # Data Flow
//! ```text
//! gateway-cli / operator
//!     → auth.rs (bearer API key)
//!     → handlers.rs (status, breaker snapshots, breaker reset)
//!     → BreakerRegistry shared with the gateway
//! ```
//!
//! Served on its own listener (`admin.bind_address`) when `admin.enabled`.

pub mod auth;
pub mod handlers;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::{middleware, Router};
use tokio::net::TcpListener;
use tokio::sync::broadcast;

use crate::resilience::BreakerRegistry;

use self::auth::admin_auth_middleware;
use self::handlers::{get_breakers, get_status, reset_breaker};

/// State shared by the admin handlers.
#[derive(Clone)]
pub struct AdminState {
    pub registry: Arc<BreakerRegistry>,
    pub api_key: Arc<str>,
}

pub fn setup_admin_router(state: AdminState) -> Router {
    Router::new()
        .route("/admin/status", get(get_status))
        .route("/admin/breakers", get(get_breakers))
        .route("/admin/breakers/{name}/reset", post(reset_breaker))
        .layer(middleware::from_fn_with_state(state.clone(), admin_auth_middleware))
        .with_state(state)
}

/// Serve the admin API until `shutdown` fires.
pub async fn run_admin(
    listener: TcpListener,
    state: AdminState,
    mut shutdown: broadcast::Receiver<()>,
) -> Result<(), std::io::Error> {
    tracing::info!(address = %listener.local_addr()?, "Admin API starting");
    axum::serve(listener, setup_admin_router(state))
        .with_graceful_shutdown(async move {
            let _ = shutdown.recv().await;
        })
        .await?;
    tracing::info!("Admin API stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::Value;
    use tower::ServiceExt;

    use crate::config::BreakerConfig;
    use crate::resilience::BreakerState;

    fn state() -> AdminState {
        AdminState {
            registry: Arc::new(BreakerRegistry::new(BreakerConfig {
                failure_threshold: 1,
                ..BreakerConfig::default()
            })),
            api_key: Arc::from("test-key"),
        }
    }

    fn request(method: &str, uri: &str, key: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(key) = key {
            builder = builder.header("Authorization", format!("Bearer {key}"));
        }
        builder.body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_rejects_missing_or_wrong_key() {
        let router = setup_admin_router(state());

        let none = router.clone().oneshot(request("GET", "/admin/status", None)).await.unwrap();
        assert_eq!(none.status(), StatusCode::UNAUTHORIZED);

        let wrong = router.oneshot(request("GET", "/admin/status", Some("nope"))).await.unwrap();
        assert_eq!(wrong.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_lists_and_resets_breakers() {
        let state = state();
        state.registry.get("order").try_acquire().unwrap().failure();
        let router = setup_admin_router(state.clone());

        let listed = router
            .clone()
            .oneshot(request("GET", "/admin/breakers", Some("test-key")))
            .await
            .unwrap();
        assert_eq!(listed.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(listed.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body[0]["name"], "order");
        assert_eq!(body[0]["state"], "open");

        let reset = router
            .clone()
            .oneshot(request("POST", "/admin/breakers/order/reset", Some("test-key")))
            .await
            .unwrap();
        assert_eq!(reset.status(), StatusCode::OK);
        assert_eq!(state.registry.get("order").state(), BreakerState::Closed);

        let unknown = router
            .oneshot(request("POST", "/admin/breakers/ghost/reset", Some("test-key")))
            .await
            .unwrap();
        assert_eq!(unknown.status(), StatusCode::NOT_FOUND);
    }
}
