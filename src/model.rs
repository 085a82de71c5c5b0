//! Entity records exchanged with the service layer.
//!
//! Field sets are what the gateway and the in-memory service need; the
//! persistence layer behind the service traits owns the full shapes.
//! JSON uses camelCase to match existing clients.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Admin {
    pub admin_id: String,
    pub password: String,
    #[serde(default)]
    pub admin_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Business {
    pub business_id: String,
    pub password: String,
    #[serde(default)]
    pub business_name: Option<String>,
    #[serde(default)]
    pub business_address: Option<String>,
    #[serde(default)]
    pub order_type_id: Option<i32>,
    #[serde(default)]
    pub star_price: Option<f64>,
    #[serde(default)]
    pub delivery_price: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryDriver {
    pub delivery_driver_id: String,
    pub password: String,
    #[serde(default)]
    pub driver_name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub user_id: String,
    pub password: String,
    #[serde(default)]
    pub user_name: Option<String>,
    #[serde(default)]
    pub user_sex: Option<i32>,
}

/// One line of a user's cart at one business.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    pub cart_id: String,
    pub food_id: String,
    pub business_id: String,
    pub user_id: String,
    #[serde(default)]
    pub quantity: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryAddress {
    pub da_id: String,
    pub user_id: String,
    #[serde(default)]
    pub contact_name: Option<String>,
    #[serde(default)]
    pub contact_tel: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Food {
    pub food_id: String,
    pub business_id: String,
    #[serde(default)]
    pub food_name: Option<String>,
    #[serde(default)]
    pub food_price: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub order_id: String,
    pub user_id: String,
    pub business_id: String,
    #[serde(default)]
    pub driver_id: Option<String>,
    pub order_date: NaiveDateTime,
    #[serde(default)]
    pub order_total: Option<f64>,
    #[serde(default)]
    pub da_id: Option<String>,
    #[serde(default)]
    pub order_state: i32,
}

/// A line item of an order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDetailet {
    pub od_id: String,
    pub order_id: String,
    pub food_id: String,
    #[serde(default)]
    pub quantity: i32,
}
