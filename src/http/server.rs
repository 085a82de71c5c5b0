//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum Router with every entity route group
//! - Wire up middleware: request ID, tracing, timeout, concurrency and body limits
//! - Bind to a listener and serve until shutdown

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::{broadcast, Semaphore};
use tower::ServiceBuilder;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::api;
use crate::config::GatewayConfig;
use crate::gateway::Gateway;
use crate::http::request::{propagate_request_id_layer, set_request_id_layer};
use crate::observability::tracing::request_span;

/// HTTP server for the entity façades.
pub struct GatewayServer {
    router: Router,
    config: GatewayConfig,
}

impl GatewayServer {
    /// Create a new server with the given configuration.
    pub fn new(config: GatewayConfig, gateway: Gateway) -> Self {
        let router = Self::build_router(&config, gateway);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    pub fn build_router(config: &GatewayConfig, gateway: Gateway) -> Router {
        let permits = Arc::new(Semaphore::new(config.listener.max_connections));

        Router::new()
            .merge(api::routes())
            .with_state(gateway)
            .layer(
                ServiceBuilder::new()
                    .layer(set_request_id_layer())
                    .layer(TraceLayer::new_for_http().make_span_with(request_span::<Body>))
                    .layer(propagate_request_id_layer())
                    .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
                    .layer(middleware::from_fn_with_state(permits, limit_concurrency))
                    .layer(RequestBodyLimitLayer::new(config.security.max_body_size)),
            )
    }

    /// Serve on `listener` until `shutdown` fires.
    pub async fn run(self, listener: TcpListener, mut shutdown: broadcast::Receiver<()>) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            max_connections = self.config.listener.max_connections,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Hold a permit for the lifetime of the request; waits when all are taken.
async fn limit_concurrency(State(permits): State<Arc<Semaphore>>, request: Request, next: Next) -> Response {
    match permits.acquire_owned().await {
        Ok(_permit) => next.run(request).await,
        Err(_) => StatusCode::SERVICE_UNAVAILABLE.into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use axum::http::Request;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::auth::{Role, TokenSigner};
    use crate::config::BreakerConfig;
    use crate::resilience::BreakerRegistry;
    use crate::service::{InMemoryServices, Services};

    const SECRET: &[u8] = b"router-test-secret-of-32-bytes!!";

    fn app(store: &InMemoryServices, policy: BreakerConfig) -> (Router, Gateway) {
        let gateway = Gateway::new(
            Arc::new(BreakerRegistry::new(policy)),
            TokenSigner::new(SECRET, None).unwrap(),
            Services::in_memory(store),
            Duration::from_millis(500),
        );
        (GatewayServer::build_router(&GatewayConfig::default(), gateway.clone()), gateway)
    }

    fn get(uri: &str) -> Request<Body> {
        Request::get(uri).body(Body::empty()).unwrap()
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::post(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn delete(uri: &str) -> Request<Body> {
        Request::delete(uri).body(Body::empty()).unwrap()
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_user_save_conflict_and_miss() {
        let store = InMemoryServices::new();
        let (router, gateway) = app(&store, BreakerConfig::default());
        let user = json!({ "userId": "u1", "password": "pw" });

        let saved = router.clone().oneshot(post_json("/UserController/saveUser", user.clone())).await.unwrap();
        assert_eq!(saved.status(), StatusCode::OK);
        assert_eq!(body_json(saved).await["userId"], "u1");

        let dup = router.clone().oneshot(post_json("/UserController/saveUser", user)).await.unwrap();
        assert_eq!(dup.status(), StatusCode::CONFLICT);
        assert_eq!(gateway.registry().get("user").snapshot().consecutive_failures, 0);

        let miss = router
            .clone()
            .oneshot(get("/UserController/getUserByIdByPass?userId=ghost&password=pw"))
            .await
            .unwrap();
        assert_eq!(miss.status(), StatusCode::NOT_FOUND);

        let exists = router.oneshot(get("/UserController/getUserById?userId=ghost")).await.unwrap();
        assert_eq!(exists.status(), StatusCode::OK);
        assert_eq!(body_json(exists).await, json!(false));
    }

    #[tokio::test]
    async fn test_login_body_and_token() {
        let store = InMemoryServices::new();
        let (router, gateway) = app(&store, BreakerConfig::default());
        router
            .clone()
            .oneshot(post_json(
                "/DeliveryDriverController/saveDriver",
                json!({ "deliveryDriverId": "d1", "password": "pw" }),
            ))
            .await
            .unwrap();

        let response = router
            .oneshot(get("/DeliveryDriverController/getDriverByIdByPass?deliveryDriverId=d1&password=pw"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["driver"]["deliveryDriverId"], "d1");
        let claims = gateway.signer().verify(body["token"].as_str().unwrap()).unwrap();
        assert_eq!(claims.sub, "d1");
        assert_eq!(claims.role, Role::DeliveryDriver);
    }

    #[tokio::test]
    async fn test_missing_params_rejected_before_breaker() {
        let store = InMemoryServices::new();
        let (router, gateway) = app(&store, BreakerConfig::default());

        for uri in [
            "/AdminController/getAdminByIdByPass?adminId=a1",
            "/CartController/listCartByUser",
            "/OrderController/listOrderByState?orderState=shipped",
            "/OrderController/listOrderByDateBetween?start=yesterday&end=today",
        ] {
            let response = router.clone().oneshot(get(uri)).await.unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{uri}");
        }

        assert!(gateway.registry().is_empty());
        assert_eq!(store.carts.faults().calls(), 0);
    }

    #[tokio::test]
    async fn test_delete_is_204_and_lookup_then_404() {
        let store = InMemoryServices::new();
        let (router, _) = app(&store, BreakerConfig::default());
        router
            .clone()
            .oneshot(post_json("/FoodController/saveFood", json!({ "foodId": "f1", "businessId": "b1" })))
            .await
            .unwrap();

        let found = router.clone().oneshot(get("/FoodController/getFoodById?foodId=f1")).await.unwrap();
        assert_eq!(found.status(), StatusCode::OK);

        let removed = router.clone().oneshot(delete("/FoodController/removeFood?foodId=f1")).await.unwrap();
        assert_eq!(removed.status(), StatusCode::NO_CONTENT);

        let again = router.clone().oneshot(delete("/FoodController/removeFood?foodId=f1")).await.unwrap();
        assert_eq!(again.status(), StatusCode::NO_CONTENT);

        let gone = router.oneshot(get("/FoodController/getFoodById?foodId=f1")).await.unwrap();
        assert_eq!(gone.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_cart_flow() {
        let store = InMemoryServices::new();
        let (router, _) = app(&store, BreakerConfig::default());
        let line = json!({ "cartId": "c1", "foodId": "f1", "businessId": "b1", "userId": "u1", "quantity": 9 });

        let saved = router.clone().oneshot(post_json("/CartController/saveCart", line)).await.unwrap();
        assert_eq!(body_json(saved).await["quantity"], 1);

        let missing = router
            .clone()
            .oneshot(post_json(
                "/CartController/updateCart",
                json!({ "cartId": "c9", "foodId": "f1", "businessId": "b1", "userId": "u1", "quantity": 2 }),
            ))
            .await
            .unwrap();
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);

        let removed = router
            .clone()
            .oneshot(
                Request::post("/CartController/removeCart?userId=u1&businessId=b1")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(body_json(removed).await, json!(1));

        let cleared = router.oneshot(delete("/CartController/clearCartByUser?userId=u1")).await.unwrap();
        assert_eq!(cleared.status(), StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn test_order_breaker_opens_after_threshold() {
        let store = InMemoryServices::new();
        let (router, _) = app(
            &store,
            BreakerConfig {
                failure_threshold: 3,
                ..BreakerConfig::default()
            },
        );
        store.orders.faults().set_down(true);

        for _ in 0..3 {
            let response = router.clone().oneshot(get("/OrderController/listOrderByUser?userId=u1")).await.unwrap();
            assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        }
        let response = router.oneshot(get("/OrderController/listOrderByUser?userId=u1")).await.unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(store.orders.faults().calls(), 3);
    }

    #[tokio::test]
    async fn test_slow_dependency_is_503_within_request_timeout() {
        let store = InMemoryServices::new();
        let mut config = GatewayConfig::default();
        config.timeouts.request_secs = 1;
        let gateway = Gateway::new(
            Arc::new(BreakerRegistry::new(BreakerConfig::default())),
            TokenSigner::new(SECRET, None).unwrap(),
            Services::in_memory(&store),
            Duration::from_millis(200),
        );
        let router = GatewayServer::build_router(&config, gateway.clone());
        store.orders.faults().set_latency(Duration::from_millis(2000));

        let response = router.oneshot(get("/OrderController/listOrderByUser?userId=u1")).await.unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let snapshot = gateway.registry().get("order").snapshot();
        assert_eq!(snapshot.consecutive_failures, 1);
        assert_eq!(snapshot.window_failures, 1);
    }

    #[tokio::test]
    async fn test_request_id_is_echoed() {
        let store = InMemoryServices::new();
        let (router, _) = app(&store, BreakerConfig::default());

        let generated = router.clone().oneshot(get("/UserController/getAllUsers")).await.unwrap();
        assert!(generated.headers().contains_key("x-request-id"));

        let supplied = router
            .oneshot(
                Request::get("/UserController/getAllUsers")
                    .header("x-request-id", "abc-123")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(supplied.headers()["x-request-id"], "abc-123");
    }
}
