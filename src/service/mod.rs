//! Service layer contract.
//!
//! # Data Flow
//! ```text
//! Gateway dispatcher (inside a guarded call)
//!     → one of the traits below (value | absence | Duplicate | infra error)
//!     → memory.rs in this crate, or any deployment-specific implementation
//! ```
//!
//! # Design Decisions
//! - Absence is `Ok(None)`, never an error
//! - `ServiceError::Duplicate` is the only domain error; everything else is
//!   an infrastructure failure and counts against the breaker
//! - Traits are object safe so the gateway holds `Arc<dyn ...>` handles

pub mod memory;
pub mod principal;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use thiserror::Error;

use crate::model::{
    Admin, Business, Cart, DeliveryAddress, DeliveryDriver, Food, Order, OrderDetailet, User,
};

pub use memory::{FaultInjector, InMemoryServices};
pub use principal::Principal;

/// Failures a service call can report.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ServiceError {
    /// Primary-key collision on write.
    #[error("duplicate key '{0}'")]
    Duplicate(String),

    /// Dependency unreachable.
    #[error("service unavailable: {0}")]
    Unavailable(String),

    /// The call did not finish before its deadline.
    #[error("timed out after {0:?}")]
    Timeout(Duration),

    /// Unexpected fault inside the dependency.
    #[error("internal error: {0}")]
    Internal(String),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Login-capable entity store.
#[async_trait]
pub trait PrincipalService<P: Principal>: Send + Sync {
    /// Principal whose id and password both match.
    async fn find_by_credential(&self, id: &str, password: &str) -> ServiceResult<Option<P>>;

    async fn find_by_id(&self, id: &str) -> ServiceResult<Option<P>>;

    async fn exists(&self, id: &str) -> ServiceResult<bool>;

    async fn list_all(&self) -> ServiceResult<Vec<P>>;

    /// Insert a new principal; `Duplicate` if the id is taken.
    async fn save(&self, principal: P) -> ServiceResult<P>;
}

#[async_trait]
pub trait BusinessDirectory: Send + Sync {
    async fn list_by_order_type(&self, order_type_id: i32) -> ServiceResult<Vec<Business>>;
}

#[async_trait]
pub trait CartService: Send + Sync {
    async fn list_by_user(&self, user_id: &str) -> ServiceResult<Vec<Cart>>;

    async fn list_by_user_and_business(&self, user_id: &str, business_id: &str) -> ServiceResult<Vec<Cart>>;

    async fn save(&self, cart: Cart) -> ServiceResult<Cart>;

    /// Replace an existing line; `None` if it does not exist.
    async fn update(&self, cart: Cart) -> ServiceResult<Option<Cart>>;

    /// Remove a user's lines at one business, returning how many went.
    async fn remove(&self, user_id: &str, business_id: &str) -> ServiceResult<u64>;

    async fn clear_by_user(&self, user_id: &str) -> ServiceResult<()>;
}

#[async_trait]
pub trait AddressService: Send + Sync {
    async fn list_by_user(&self, user_id: &str) -> ServiceResult<Vec<DeliveryAddress>>;

    async fn find_by_id(&self, da_id: &str) -> ServiceResult<Option<DeliveryAddress>>;

    async fn save(&self, address: DeliveryAddress) -> ServiceResult<DeliveryAddress>;

    async fn remove(&self, da_id: &str) -> ServiceResult<bool>;
}

#[async_trait]
pub trait FoodService: Send + Sync {
    async fn list_by_business(&self, business_id: &str) -> ServiceResult<Vec<Food>>;

    async fn find_by_id(&self, food_id: &str) -> ServiceResult<Option<Food>>;

    async fn save(&self, food: Food) -> ServiceResult<Food>;

    async fn remove(&self, food_id: &str) -> ServiceResult<bool>;
}

#[async_trait]
pub trait OrderService: Send + Sync {
    async fn list_by_user(&self, user_id: &str) -> ServiceResult<Vec<Order>>;

    async fn list_by_order_id(&self, order_id: &str) -> ServiceResult<Vec<Order>>;

    async fn list_by_business(&self, business_id: &str) -> ServiceResult<Vec<Order>>;

    async fn list_by_driver(&self, driver_id: &str) -> ServiceResult<Vec<Order>>;

    async fn list_by_state(&self, order_state: i32) -> ServiceResult<Vec<Order>>;

    /// Orders dated within `[start, end]`.
    async fn list_between(&self, start: NaiveDateTime, end: NaiveDateTime) -> ServiceResult<Vec<Order>>;

    async fn save(&self, order: Order) -> ServiceResult<Order>;

    async fn remove(&self, order_id: &str) -> ServiceResult<bool>;
}

#[async_trait]
pub trait OrderDetailetService: Send + Sync {
    async fn list_by_order(&self, order_id: &str) -> ServiceResult<Vec<OrderDetailet>>;

    async fn save(&self, detailet: OrderDetailet) -> ServiceResult<OrderDetailet>;

    async fn remove(&self, od_id: &str) -> ServiceResult<bool>;
}

/// Handles to every service the gateway fronts.
#[derive(Clone)]
pub struct Services {
    pub admins: Arc<dyn PrincipalService<Admin>>,
    pub businesses: Arc<dyn PrincipalService<Business>>,
    pub business_directory: Arc<dyn BusinessDirectory>,
    pub drivers: Arc<dyn PrincipalService<DeliveryDriver>>,
    pub users: Arc<dyn PrincipalService<User>>,
    pub carts: Arc<dyn CartService>,
    pub addresses: Arc<dyn AddressService>,
    pub foods: Arc<dyn FoodService>,
    pub orders: Arc<dyn OrderService>,
    pub order_detailets: Arc<dyn OrderDetailetService>,
}

impl Services {
    /// Wire every handle to one in-memory store.
    pub fn in_memory(store: &InMemoryServices) -> Self {
        Self {
            admins: store.admins.clone(),
            businesses: store.businesses.clone(),
            business_directory: store.businesses.clone(),
            drivers: store.drivers.clone(),
            users: store.users.clone(),
            carts: store.carts.clone(),
            addresses: store.addresses.clone(),
            foods: store.foods.clone(),
            orders: store.orders.clone(),
            order_detailets: store.order_detailets.clone(),
        }
    }
}
