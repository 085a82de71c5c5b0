//! Order routes.

use axum::extract::{Query, State};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use chrono::NaiveDateTime;
use serde::Deserialize;

use crate::gateway::{Domain, Gateway, GatewayError};
use crate::model::Order;

const DEPENDENCY: &str = "order";

type Reply<T> = Result<Domain<T>, GatewayError>;

pub fn routes() -> Router<Gateway> {
    Router::new()
        .route("/OrderController/listOrderByUser", get(list_by_user))
        .route("/OrderController/listOrderByOrderId", get(list_by_order_id))
        .route("/OrderController/listOrderByBusiness", get(list_by_business))
        .route("/OrderController/listOrderByDriver", get(list_by_driver))
        .route("/OrderController/listOrderByState", get(list_by_state))
        .route("/OrderController/listOrderByDateBetween", get(list_between))
        .route("/OrderController/saveOrder", post(save))
        .route("/OrderController/removeOrder", delete(remove))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserQuery {
    user_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OrderQuery {
    order_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BusinessQuery {
    business_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DriverQuery {
    driver_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StateQuery {
    order_state: i32,
}

/// Inclusive range of local date-times, e.g. `2024-05-01T00:00:00`.
#[derive(Debug, Deserialize)]
struct RangeQuery {
    start: NaiveDateTime,
    end: NaiveDateTime,
}

async fn list_by_user(State(gateway): State<Gateway>, Query(q): Query<UserQuery>) -> Reply<Vec<Order>> {
    let domain = gateway
        .guard(DEPENDENCY, move |s| async move { s.orders.list_by_user(&q.user_id).await.map(Domain::Found) })
        .await?;
    Ok(domain)
}

async fn list_by_order_id(State(gateway): State<Gateway>, Query(q): Query<OrderQuery>) -> Reply<Vec<Order>> {
    let domain = gateway
        .guard(DEPENDENCY, move |s| async move {
            s.orders.list_by_order_id(&q.order_id).await.map(Domain::Found)
        })
        .await?;
    Ok(domain)
}

async fn list_by_business(State(gateway): State<Gateway>, Query(q): Query<BusinessQuery>) -> Reply<Vec<Order>> {
    let domain = gateway
        .guard(DEPENDENCY, move |s| async move {
            s.orders.list_by_business(&q.business_id).await.map(Domain::Found)
        })
        .await?;
    Ok(domain)
}

async fn list_by_driver(State(gateway): State<Gateway>, Query(q): Query<DriverQuery>) -> Reply<Vec<Order>> {
    let domain = gateway
        .guard(DEPENDENCY, move |s| async move { s.orders.list_by_driver(&q.driver_id).await.map(Domain::Found) })
        .await?;
    Ok(domain)
}

async fn list_by_state(State(gateway): State<Gateway>, Query(q): Query<StateQuery>) -> Reply<Vec<Order>> {
    let domain = gateway
        .guard(DEPENDENCY, move |s| async move { s.orders.list_by_state(q.order_state).await.map(Domain::Found) })
        .await?;
    Ok(domain)
}

async fn list_between(State(gateway): State<Gateway>, Query(q): Query<RangeQuery>) -> Reply<Vec<Order>> {
    let domain = gateway
        .guard(DEPENDENCY, move |s| async move { s.orders.list_between(q.start, q.end).await.map(Domain::Found) })
        .await?;
    Ok(domain)
}

async fn save(State(gateway): State<Gateway>, Json(order): Json<Order>) -> Reply<Order> {
    let domain = gateway
        .guard(DEPENDENCY, move |s| async move { s.orders.save(order).await.map(Domain::Found) })
        .await?;
    Ok(domain)
}

async fn remove(State(gateway): State<Gateway>, Query(q): Query<OrderQuery>) -> Reply<()> {
    let domain = gateway
        .guard(DEPENDENCY, move |s| async move { s.orders.remove(&q.order_id).await.map(|_| Domain::Deleted) })
        .await?;
    Ok(domain)
}
