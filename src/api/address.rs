//! Delivery address routes.

use axum::extract::{Query, State};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde::Deserialize;

use crate::gateway::{Domain, Gateway, GatewayError};
use crate::model::DeliveryAddress;

const DEPENDENCY: &str = "delivery_address";

type Reply<T> = Result<Domain<T>, GatewayError>;

pub fn routes() -> Router<Gateway> {
    Router::new()
        .route("/DeliveryAddressController/listAddressByUser", get(list_by_user))
        .route("/DeliveryAddressController/getAddressBydaId", get(find))
        .route("/DeliveryAddressController/saveAddress", post(save))
        .route("/DeliveryAddressController/removeAddress", delete(remove))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserQuery {
    user_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AddressQuery {
    da_id: String,
}

async fn list_by_user(State(gateway): State<Gateway>, Query(q): Query<UserQuery>) -> Reply<Vec<DeliveryAddress>> {
    let domain = gateway
        .guard(DEPENDENCY, move |s| async move {
            s.addresses.list_by_user(&q.user_id).await.map(Domain::Found)
        })
        .await?;
    Ok(domain)
}

async fn find(State(gateway): State<Gateway>, Query(q): Query<AddressQuery>) -> Reply<DeliveryAddress> {
    let domain = gateway
        .guard(DEPENDENCY, move |s| async move {
            s.addresses.find_by_id(&q.da_id).await.map(Domain::from_option)
        })
        .await?;
    Ok(domain)
}

async fn save(State(gateway): State<Gateway>, Json(address): Json<DeliveryAddress>) -> Reply<DeliveryAddress> {
    let domain = gateway
        .guard(DEPENDENCY, move |s| async move { s.addresses.save(address).await.map(Domain::Found) })
        .await?;
    Ok(domain)
}

async fn remove(State(gateway): State<Gateway>, Query(q): Query<AddressQuery>) -> Reply<()> {
    let domain = gateway
        .guard(DEPENDENCY, move |s| async move {
            s.addresses.remove(&q.da_id).await.map(|_| Domain::Deleted)
        })
        .await?;
    Ok(domain)
}
