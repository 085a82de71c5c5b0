//! Catalog routes.

use axum::extract::{Query, State};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde::Deserialize;

use crate::gateway::{Domain, Gateway, GatewayError};
use crate::model::Food;

const DEPENDENCY: &str = "food";

type Reply<T> = Result<Domain<T>, GatewayError>;

pub fn routes() -> Router<Gateway> {
    Router::new()
        .route("/FoodController/listFoodByBusiness", get(list_by_business))
        .route("/FoodController/getFoodById", get(find))
        .route("/FoodController/saveFood", post(save))
        .route("/FoodController/removeFood", delete(remove))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BusinessQuery {
    business_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FoodQuery {
    food_id: String,
}

async fn list_by_business(State(gateway): State<Gateway>, Query(q): Query<BusinessQuery>) -> Reply<Vec<Food>> {
    let domain = gateway
        .guard(DEPENDENCY, move |s| async move {
            s.foods.list_by_business(&q.business_id).await.map(Domain::Found)
        })
        .await?;
    Ok(domain)
}

async fn find(State(gateway): State<Gateway>, Query(q): Query<FoodQuery>) -> Reply<Food> {
    let domain = gateway
        .guard(DEPENDENCY, move |s| async move { s.foods.find_by_id(&q.food_id).await.map(Domain::from_option) })
        .await?;
    Ok(domain)
}

async fn save(State(gateway): State<Gateway>, Json(food): Json<Food>) -> Reply<Food> {
    let domain = gateway
        .guard(DEPENDENCY, move |s| async move { s.foods.save(food).await.map(Domain::Found) })
        .await?;
    Ok(domain)
}

async fn remove(State(gateway): State<Gateway>, Query(q): Query<FoodQuery>) -> Reply<()> {
    let domain = gateway
        .guard(DEPENDENCY, move |s| async move { s.foods.remove(&q.food_id).await.map(|_| Domain::Deleted) })
        .await?;
    Ok(domain)
}
