//! Routes for the login-capable kinds: admin, business, delivery driver, user.

use axum::extract::{Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;

use crate::api::{required, Params};
use crate::gateway::{Domain, Gateway, GatewayError, Login};
use crate::model::{Admin, Business, DeliveryDriver, User};
use crate::service::Principal;

type Reply<T> = Result<Domain<T>, GatewayError>;

pub fn admin_routes() -> Router<Gateway> {
    Router::new()
        .route("/AdminController/getAdminByIdByPass", get(login::<Admin>))
        .route("/AdminController/getAdminExistsById", get(exists::<Admin>))
        .route("/AdminController/saveAdmin", post(save::<Admin>))
}

pub fn business_routes() -> Router<Gateway> {
    Router::new()
        .route("/BusinessController/getBusinessByIdByPass", get(login::<Business>))
        .route("/BusinessController/getBusinessExistsById", get(find::<Business>))
        .route("/BusinessController/listBusinessByOrderTypeId", post(list_by_order_type))
        .route("/BusinessController/getAllBusinesses", get(list_all::<Business>))
        .route("/BusinessController/saveBusiness", post(save::<Business>))
}

pub fn driver_routes() -> Router<Gateway> {
    Router::new()
        .route("/DeliveryDriverController/getDriverByIdByPass", get(login::<DeliveryDriver>))
        .route("/DeliveryDriverController/getDriverExistsById", get(exists::<DeliveryDriver>))
        .route("/DeliveryDriverController/getAllDeliveryDriver", get(list_all::<DeliveryDriver>))
        .route("/DeliveryDriverController/saveDriver", post(save::<DeliveryDriver>))
}

pub fn user_routes() -> Router<Gateway> {
    Router::new()
        .route("/UserController/getUserByIdByPass", get(login::<User>))
        .route("/UserController/getUserById", get(exists::<User>))
        .route("/UserController/getAllUsers", get(list_all::<User>))
        .route("/UserController/saveUser", post(save::<User>))
}

async fn login<P: Principal>(State(gateway): State<Gateway>, Query(params): Query<Params>) -> Reply<Login<P>> {
    let id = required(&params, P::ID_PARAM)?;
    let password = required(&params, "password")?;
    gateway.login::<P>(id, password).await
}

async fn exists<P: Principal>(State(gateway): State<Gateway>, Query(params): Query<Params>) -> Reply<bool> {
    let id = required(&params, P::ID_PARAM)?;
    let domain = gateway
        .guard(P::DEPENDENCY, move |s| async move {
            P::service(&s).exists(&id).await.map(Domain::Found)
        })
        .await?;
    Ok(domain)
}

/// Existence check that answers with the entity itself, 404 on a miss.
async fn find<P: Principal>(State(gateway): State<Gateway>, Query(params): Query<Params>) -> Reply<P> {
    let id = required(&params, P::ID_PARAM)?;
    let domain = gateway
        .guard(P::DEPENDENCY, move |s| async move {
            P::service(&s).find_by_id(&id).await.map(Domain::from_option)
        })
        .await?;
    Ok(domain)
}

async fn list_all<P: Principal>(State(gateway): State<Gateway>) -> Reply<Vec<P>> {
    let domain = gateway
        .guard(P::DEPENDENCY, |s| async move { P::service(&s).list_all().await.map(Domain::Found) })
        .await?;
    Ok(domain)
}

async fn save<P: Principal>(State(gateway): State<Gateway>, Json(principal): Json<P>) -> Reply<P> {
    let domain = gateway
        .guard(P::DEPENDENCY, move |s| async move {
            P::service(&s).save(principal).await.map(Domain::Found)
        })
        .await?;
    Ok(domain)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OrderTypeQuery {
    order_type_id: i32,
}

async fn list_by_order_type(
    State(gateway): State<Gateway>,
    Query(query): Query<OrderTypeQuery>,
) -> Reply<Vec<Business>> {
    let domain = gateway
        .guard(Business::DEPENDENCY, move |s| async move {
            s.business_directory
                .list_by_order_type(query.order_type_id)
                .await
                .map(Domain::Found)
        })
        .await?;
    Ok(domain)
}
