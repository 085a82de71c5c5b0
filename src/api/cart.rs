//! Cart routes.

use axum::extract::{Query, State};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde::Deserialize;

use crate::gateway::{Domain, Gateway, GatewayError};
use crate::model::Cart;

const DEPENDENCY: &str = "cart";

type Reply<T> = Result<Domain<T>, GatewayError>;

pub fn routes() -> Router<Gateway> {
    Router::new()
        .route("/CartController/listCartByUser", get(list_by_user))
        .route("/CartController/listCartByUserAndBusiness", get(list_by_user_and_business))
        .route("/CartController/saveCart", post(save))
        .route("/CartController/updateCart", post(update))
        .route("/CartController/removeCart", post(remove))
        .route("/CartController/clearCartByUser", delete(clear_by_user))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserQuery {
    user_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserBusinessQuery {
    user_id: String,
    business_id: String,
}

async fn list_by_user(State(gateway): State<Gateway>, Query(q): Query<UserQuery>) -> Reply<Vec<Cart>> {
    let domain = gateway
        .guard(DEPENDENCY, move |s| async move { s.carts.list_by_user(&q.user_id).await.map(Domain::Found) })
        .await?;
    Ok(domain)
}

async fn list_by_user_and_business(
    State(gateway): State<Gateway>,
    Query(q): Query<UserBusinessQuery>,
) -> Reply<Vec<Cart>> {
    let domain = gateway
        .guard(DEPENDENCY, move |s| async move {
            s.carts
                .list_by_user_and_business(&q.user_id, &q.business_id)
                .await
                .map(Domain::Found)
        })
        .await?;
    Ok(domain)
}

/// A new line always starts at quantity 1.
async fn save(State(gateway): State<Gateway>, Json(mut cart): Json<Cart>) -> Reply<Cart> {
    cart.quantity = 1;
    let domain = gateway
        .guard(DEPENDENCY, move |s| async move { s.carts.save(cart).await.map(Domain::Found) })
        .await?;
    Ok(domain)
}

async fn update(State(gateway): State<Gateway>, Json(cart): Json<Cart>) -> Reply<Cart> {
    let domain = gateway
        .guard(DEPENDENCY, move |s| async move { s.carts.update(cart).await.map(Domain::from_option) })
        .await?;
    Ok(domain)
}

/// Answers with the number of lines removed.
async fn remove(State(gateway): State<Gateway>, Query(q): Query<UserBusinessQuery>) -> Reply<u64> {
    let domain = gateway
        .guard(DEPENDENCY, move |s| async move {
            s.carts.remove(&q.user_id, &q.business_id).await.map(Domain::Found)
        })
        .await?;
    Ok(domain)
}

async fn clear_by_user(State(gateway): State<Gateway>, Query(q): Query<UserQuery>) -> Reply<()> {
    let domain = gateway
        .guard(DEPENDENCY, move |s| async move {
            s.carts.clear_by_user(&q.user_id).await.map(|()| Domain::Deleted)
        })
        .await?;
    Ok(domain)
}
