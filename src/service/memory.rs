//! In-process service layer.
//!
//! # Responsibilities
//! - Implement every service trait over concurrent maps
//! - Detect primary-key collisions on insert (`ServiceError::Duplicate`)
//! - Reproduce infrastructure failure on demand (`FaultInjector`)
//!
//! # Design Decisions
//! - One table per entity, each with its own fault injector, so an outage
//!   can be confined to a single dependency
//! - Keys compare exactly (case-sensitive)
//! - List results are ordered by key

use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use crate::model::{
    Admin, Business, Cart, DeliveryAddress, DeliveryDriver, Food, Order, OrderDetailet, User,
};
use crate::service::{
    AddressService, BusinessDirectory, CartService, FoodService, OrderDetailetService, OrderService,
    Principal, PrincipalService, ServiceError, ServiceResult,
};

/// Switchable failure source for one table.
#[derive(Debug, Default)]
pub struct FaultInjector {
    down: AtomicBool,
    fail_next: AtomicU32,
    latency_ms: AtomicU64,
    calls: AtomicU64,
}

impl FaultInjector {
    /// Fail every call until switched back.
    pub fn set_down(&self, down: bool) {
        self.down.store(down, Ordering::SeqCst);
    }

    /// Fail the next `n` calls.
    pub fn fail_next(&self, n: u32) {
        self.fail_next.store(n, Ordering::SeqCst);
    }

    /// Delay every call.
    pub fn set_latency(&self, latency: Duration) {
        let ms = u64::try_from(latency.as_millis()).unwrap_or(u64::MAX);
        self.latency_ms.store(ms, Ordering::SeqCst);
    }

    /// Calls that reached this table, failed or not.
    pub fn calls(&self) -> u64 {
        self.calls.load(Ordering::SeqCst)
    }

    async fn enter(&self) -> ServiceResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let latency = self.latency_ms.load(Ordering::SeqCst);
        if latency > 0 {
            tokio::time::sleep(Duration::from_millis(latency)).await;
        }

        if self.down.load(Ordering::SeqCst) {
            return Err(ServiceError::Unavailable("dependency is down".into()));
        }

        let injected = self
            .fail_next
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if injected {
            return Err(ServiceError::Unavailable("injected failure".into()));
        }

        Ok(())
    }
}

/// Primary key of a stored row.
pub trait Keyed {
    fn key(&self) -> &str;
}

macro_rules! keyed {
    ($($ty:ty => $field:ident),* $(,)?) => {
        $(impl Keyed for $ty {
            fn key(&self) -> &str {
                &self.$field
            }
        })*
    };
}

keyed! {
    Admin => admin_id,
    Business => business_id,
    DeliveryDriver => delivery_driver_id,
    User => user_id,
    Cart => cart_id,
    DeliveryAddress => da_id,
    Food => food_id,
    Order => order_id,
    OrderDetailet => od_id,
}

/// A keyed table guarded by a fault injector.
#[derive(Debug)]
pub struct MemoryTable<T> {
    rows: DashMap<String, T>,
    faults: FaultInjector,
}

impl<T> Default for MemoryTable<T> {
    fn default() -> Self {
        Self {
            rows: DashMap::new(),
            faults: FaultInjector::default(),
        }
    }
}

impl<T: Keyed + Clone> MemoryTable<T> {
    pub fn faults(&self) -> &FaultInjector {
        &self.faults
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn insert_new(&self, row: T) -> ServiceResult<T> {
        match self.rows.entry(row.key().to_string()) {
            Entry::Occupied(occupied) => Err(ServiceError::Duplicate(occupied.key().clone())),
            Entry::Vacant(vacant) => {
                vacant.insert(row.clone());
                Ok(row)
            }
        }
    }

    fn replace(&self, row: T) -> Option<T> {
        let mut existing = self.rows.get_mut(row.key())?;
        *existing = row.clone();
        Some(row)
    }

    fn get(&self, key: &str) -> Option<T> {
        self.rows.get(key).map(|r| r.value().clone())
    }

    fn filter(&self, pred: impl Fn(&T) -> bool) -> Vec<T> {
        let mut rows: Vec<T> = self
            .rows
            .iter()
            .filter(|r| pred(r.value()))
            .map(|r| r.value().clone())
            .collect();
        rows.sort_by(|a, b| a.key().cmp(b.key()));
        rows
    }

    fn remove(&self, key: &str) -> bool {
        self.rows.remove(key).is_some()
    }

    fn remove_where(&self, pred: impl Fn(&T) -> bool) -> u64 {
        let mut removed = 0;
        self.rows.retain(|_, row| {
            let drop = pred(row);
            if drop {
                removed += 1;
            }
            !drop
        });
        removed
    }
}

#[async_trait]
impl<P: Principal + Keyed> PrincipalService<P> for MemoryTable<P> {
    async fn find_by_credential(&self, id: &str, password: &str) -> ServiceResult<Option<P>> {
        self.faults.enter().await?;
        Ok(self.get(id).filter(|p| p.password() == password))
    }

    async fn find_by_id(&self, id: &str) -> ServiceResult<Option<P>> {
        self.faults.enter().await?;
        Ok(self.get(id))
    }

    async fn exists(&self, id: &str) -> ServiceResult<bool> {
        self.faults.enter().await?;
        Ok(self.rows.contains_key(id))
    }

    async fn list_all(&self) -> ServiceResult<Vec<P>> {
        self.faults.enter().await?;
        Ok(self.filter(|_| true))
    }

    async fn save(&self, principal: P) -> ServiceResult<P> {
        self.faults.enter().await?;
        self.insert_new(principal)
    }
}

#[async_trait]
impl BusinessDirectory for MemoryTable<Business> {
    async fn list_by_order_type(&self, order_type_id: i32) -> ServiceResult<Vec<Business>> {
        self.faults.enter().await?;
        Ok(self.filter(|b| b.order_type_id == Some(order_type_id)))
    }
}

#[async_trait]
impl CartService for MemoryTable<Cart> {
    async fn list_by_user(&self, user_id: &str) -> ServiceResult<Vec<Cart>> {
        self.faults.enter().await?;
        Ok(self.filter(|c| c.user_id == user_id))
    }

    async fn list_by_user_and_business(&self, user_id: &str, business_id: &str) -> ServiceResult<Vec<Cart>> {
        self.faults.enter().await?;
        Ok(self.filter(|c| c.user_id == user_id && c.business_id == business_id))
    }

    async fn save(&self, cart: Cart) -> ServiceResult<Cart> {
        self.faults.enter().await?;
        self.insert_new(cart)
    }

    async fn update(&self, cart: Cart) -> ServiceResult<Option<Cart>> {
        self.faults.enter().await?;
        Ok(self.replace(cart))
    }

    async fn remove(&self, user_id: &str, business_id: &str) -> ServiceResult<u64> {
        self.faults.enter().await?;
        Ok(self.remove_where(|c| c.user_id == user_id && c.business_id == business_id))
    }

    async fn clear_by_user(&self, user_id: &str) -> ServiceResult<()> {
        self.faults.enter().await?;
        self.remove_where(|c| c.user_id == user_id);
        Ok(())
    }
}

#[async_trait]
impl AddressService for MemoryTable<DeliveryAddress> {
    async fn list_by_user(&self, user_id: &str) -> ServiceResult<Vec<DeliveryAddress>> {
        self.faults.enter().await?;
        Ok(self.filter(|a| a.user_id == user_id))
    }

    async fn find_by_id(&self, da_id: &str) -> ServiceResult<Option<DeliveryAddress>> {
        self.faults.enter().await?;
        Ok(self.get(da_id))
    }

    async fn save(&self, address: DeliveryAddress) -> ServiceResult<DeliveryAddress> {
        self.faults.enter().await?;
        self.insert_new(address)
    }

    async fn remove(&self, da_id: &str) -> ServiceResult<bool> {
        self.faults.enter().await?;
        Ok(MemoryTable::remove(self, da_id))
    }
}

#[async_trait]
impl FoodService for MemoryTable<Food> {
    async fn list_by_business(&self, business_id: &str) -> ServiceResult<Vec<Food>> {
        self.faults.enter().await?;
        Ok(self.filter(|f| f.business_id == business_id))
    }

    async fn find_by_id(&self, food_id: &str) -> ServiceResult<Option<Food>> {
        self.faults.enter().await?;
        Ok(self.get(food_id))
    }

    async fn save(&self, food: Food) -> ServiceResult<Food> {
        self.faults.enter().await?;
        self.insert_new(food)
    }

    async fn remove(&self, food_id: &str) -> ServiceResult<bool> {
        self.faults.enter().await?;
        Ok(MemoryTable::remove(self, food_id))
    }
}

#[async_trait]
impl OrderService for MemoryTable<Order> {
    async fn list_by_user(&self, user_id: &str) -> ServiceResult<Vec<Order>> {
        self.faults.enter().await?;
        Ok(self.filter(|o| o.user_id == user_id))
    }

    async fn list_by_order_id(&self, order_id: &str) -> ServiceResult<Vec<Order>> {
        self.faults.enter().await?;
        Ok(self.filter(|o| o.order_id == order_id))
    }

    async fn list_by_business(&self, business_id: &str) -> ServiceResult<Vec<Order>> {
        self.faults.enter().await?;
        Ok(self.filter(|o| o.business_id == business_id))
    }

    async fn list_by_driver(&self, driver_id: &str) -> ServiceResult<Vec<Order>> {
        self.faults.enter().await?;
        Ok(self.filter(|o| o.driver_id.as_deref() == Some(driver_id)))
    }

    async fn list_by_state(&self, order_state: i32) -> ServiceResult<Vec<Order>> {
        self.faults.enter().await?;
        Ok(self.filter(|o| o.order_state == order_state))
    }

    async fn list_between(&self, start: NaiveDateTime, end: NaiveDateTime) -> ServiceResult<Vec<Order>> {
        self.faults.enter().await?;
        Ok(self.filter(|o| o.order_date >= start && o.order_date <= end))
    }

    async fn save(&self, order: Order) -> ServiceResult<Order> {
        self.faults.enter().await?;
        self.insert_new(order)
    }

    async fn remove(&self, order_id: &str) -> ServiceResult<bool> {
        self.faults.enter().await?;
        Ok(MemoryTable::remove(self, order_id))
    }
}

#[async_trait]
impl OrderDetailetService for MemoryTable<OrderDetailet> {
    async fn list_by_order(&self, order_id: &str) -> ServiceResult<Vec<OrderDetailet>> {
        self.faults.enter().await?;
        Ok(self.filter(|d| d.order_id == order_id))
    }

    async fn save(&self, detailet: OrderDetailet) -> ServiceResult<OrderDetailet> {
        self.faults.enter().await?;
        self.insert_new(detailet)
    }

    async fn remove(&self, od_id: &str) -> ServiceResult<bool> {
        self.faults.enter().await?;
        Ok(MemoryTable::remove(self, od_id))
    }
}

/// Every table the gateway needs, in memory.
#[derive(Debug, Default, Clone)]
pub struct InMemoryServices {
    pub admins: Arc<MemoryTable<Admin>>,
    pub businesses: Arc<MemoryTable<Business>>,
    pub drivers: Arc<MemoryTable<DeliveryDriver>>,
    pub users: Arc<MemoryTable<User>>,
    pub carts: Arc<MemoryTable<Cart>>,
    pub addresses: Arc<MemoryTable<DeliveryAddress>>,
    pub foods: Arc<MemoryTable<Food>>,
    pub orders: Arc<MemoryTable<Order>>,
    pub order_detailets: Arc<MemoryTable<OrderDetailet>>,
}

impl InMemoryServices {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: &str, password: &str) -> User {
        User {
            user_id: id.into(),
            password: password.into(),
            user_name: None,
            user_sex: None,
        }
    }

    fn cart(id: &str, user_id: &str, business_id: &str) -> Cart {
        Cart {
            cart_id: id.into(),
            food_id: "f1".into(),
            business_id: business_id.into(),
            user_id: user_id.into(),
            quantity: 1,
        }
    }

    #[tokio::test]
    async fn test_principal_duplicate_and_credentials() {
        let users = MemoryTable::<User>::default();

        users.save(user("u1", "pw")).await.unwrap();
        assert_eq!(
            users.save(user("u1", "other")).await,
            Err(ServiceError::Duplicate("u1".into()))
        );
        // Keys are case-sensitive.
        users.save(user("U1", "pw")).await.unwrap();

        assert!(users.find_by_credential("u1", "pw").await.unwrap().is_some());
        assert!(users.find_by_credential("u1", "nope").await.unwrap().is_none());
        assert!(users.find_by_credential("ghost", "pw").await.unwrap().is_none());
        assert!(users.exists("u1").await.unwrap());
        assert_eq!(users.list_all().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_fault_injection() {
        let users = MemoryTable::<User>::default();

        users.faults().fail_next(2);
        assert!(matches!(users.exists("u1").await, Err(ServiceError::Unavailable(_))));
        assert!(matches!(users.exists("u1").await, Err(ServiceError::Unavailable(_))));
        assert_eq!(users.exists("u1").await, Ok(false));

        users.faults().set_down(true);
        assert!(users.list_all().await.is_err());
        users.faults().set_down(false);
        assert!(users.list_all().await.is_ok());

        assert_eq!(users.faults().calls(), 5);
    }

    #[tokio::test]
    async fn test_cart_remove_and_clear() {
        let carts = MemoryTable::<Cart>::default();
        carts.save(cart("c1", "u1", "b1")).await.unwrap();
        carts.save(cart("c2", "u1", "b1")).await.unwrap();
        carts.save(cart("c3", "u1", "b2")).await.unwrap();
        carts.save(cart("c4", "u2", "b1")).await.unwrap();

        assert_eq!(CartService::remove(&carts, "u1", "b1").await.unwrap(), 2);
        assert_eq!(carts.list_by_user("u1").await.unwrap().len(), 1);

        carts.clear_by_user("u1").await.unwrap();
        assert!(carts.list_by_user("u1").await.unwrap().is_empty());
        assert_eq!(carts.len(), 1);
    }

    #[tokio::test]
    async fn test_cart_update_missing_is_none() {
        let carts = MemoryTable::<Cart>::default();
        assert_eq!(carts.update(cart("c1", "u1", "b1")).await.unwrap(), None);

        carts.save(cart("c1", "u1", "b1")).await.unwrap();
        let mut changed = cart("c1", "u1", "b1");
        changed.quantity = 4;
        assert_eq!(carts.update(changed.clone()).await.unwrap(), Some(changed));
    }

    #[tokio::test]
    async fn test_orders_between_inclusive() {
        let orders = MemoryTable::<Order>::default();
        let at = |s: &str| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S").unwrap();
        for (id, date) in [("o1", "2024-01-01T00:00:00"), ("o2", "2024-01-02T00:00:00"), ("o3", "2024-01-03T00:00:00")] {
            orders
                .save(Order {
                    order_id: id.into(),
                    user_id: "u1".into(),
                    business_id: "b1".into(),
                    driver_id: None,
                    order_date: at(date),
                    order_total: None,
                    da_id: None,
                    order_state: 0,
                })
                .await
                .unwrap();
        }

        let ids: Vec<_> = orders
            .list_between(at("2024-01-01T00:00:00"), at("2024-01-02T00:00:00"))
            .await
            .unwrap()
            .into_iter()
            .map(|o| o.order_id)
            .collect();
        assert_eq!(ids, vec!["o1", "o2"]);
    }
}
