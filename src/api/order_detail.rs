//! Order line-item routes.

use axum::extract::{Query, State};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde::Deserialize;

use crate::gateway::{Domain, Gateway, GatewayError};
use crate::model::OrderDetailet;

const DEPENDENCY: &str = "order_detailet";

type Reply<T> = Result<Domain<T>, GatewayError>;

pub fn routes() -> Router<Gateway> {
    Router::new()
        .route("/OrderDetailetController/listDetailetByOrder", get(list_by_order))
        .route("/OrderDetailetController/saveDetailet", post(save))
        .route("/OrderDetailetController/removeDetailet", delete(remove))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OrderQuery {
    order_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DetailetQuery {
    od_id: String,
}

async fn list_by_order(State(gateway): State<Gateway>, Query(q): Query<OrderQuery>) -> Reply<Vec<OrderDetailet>> {
    let domain = gateway
        .guard(DEPENDENCY, move |s| async move {
            s.order_detailets.list_by_order(&q.order_id).await.map(Domain::Found)
        })
        .await?;
    Ok(domain)
}

async fn save(State(gateway): State<Gateway>, Json(detailet): Json<OrderDetailet>) -> Reply<OrderDetailet> {
    let domain = gateway
        .guard(DEPENDENCY, move |s| async move { s.order_detailets.save(detailet).await.map(Domain::Found) })
        .await?;
    Ok(domain)
}

async fn remove(State(gateway): State<Gateway>, Query(q): Query<DetailetQuery>) -> Reply<()> {
    let domain = gateway
        .guard(DEPENDENCY, move |s| async move {
            s.order_detailets.remove(&q.od_id).await.map(|_| Domain::Deleted)
        })
        .await?;
    Ok(domain)
}
