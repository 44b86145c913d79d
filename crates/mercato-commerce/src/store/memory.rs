//! In-memory backend for tests and local development.

use crate::catalog::{Product, QuantityDiscountRule};
use crate::coupon::{Coupon, CouponCode};
use crate::ids::{OrderId, ProductId, UserId};
use crate::order::Order;
use crate::store::backend::{
    CatalogStore, ConsumptionRecord, CouponStore, OrderStore, RuleStore,
};
use crate::unix_now;
use mercato_store::StoreError;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>, StoreError> {
    mutex
        .lock()
        .map_err(|_| StoreError::Unavailable("poisoned lock".to_string()))
}

/// In-memory implementation of every backend trait.
///
/// Consumption records live in their own map keyed by `(code, user)`, same
/// as the hosted store, so the conditional-write semantics tests rely on
/// match production.
#[derive(Default)]
pub struct MemoryStore {
    products: Mutex<Vec<Product>>,
    rules: Mutex<Vec<QuantityDiscountRule>>,
    coupons: Mutex<HashMap<String, Coupon>>,
    consumptions: Mutex<HashMap<(String, String), ConsumptionRecord>>,
    orders: Mutex<HashMap<OrderId, Order>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a product.
    pub fn insert_product(&self, product: Product) -> Result<(), StoreError> {
        lock(&self.products)?.push(product);
        Ok(())
    }

    /// Seed a discount rule.
    pub fn insert_rule(&self, rule: QuantityDiscountRule) -> Result<(), StoreError> {
        lock(&self.rules)?.push(rule);
        Ok(())
    }

    /// Seed a coupon, keyed by its normalized code.
    pub fn insert_coupon(&self, coupon: Coupon) -> Result<(), StoreError> {
        lock(&self.coupons)?.insert(coupon.code.as_str().to_string(), coupon);
        Ok(())
    }

    /// Number of persisted orders.
    pub fn order_count(&self) -> Result<usize, StoreError> {
        Ok(lock(&self.orders)?.len())
    }
}

impl CatalogStore for MemoryStore {
    fn products(&self) -> Result<Vec<Product>, StoreError> {
        Ok(lock(&self.products)?.clone())
    }

    fn product(&self, id: &ProductId) -> Result<Option<Product>, StoreError> {
        Ok(lock(&self.products)?.iter().find(|p| &p.id == id).cloned())
    }
}

impl RuleStore for MemoryStore {
    fn rules(&self) -> Result<Vec<QuantityDiscountRule>, StoreError> {
        Ok(lock(&self.rules)?.clone())
    }
}

impl CouponStore for MemoryStore {
    fn coupon(&self, code: &CouponCode) -> Result<Option<Coupon>, StoreError> {
        Ok(lock(&self.coupons)?.get(code.as_str()).cloned())
    }

    fn consume(&self, code: &CouponCode, user: &UserId) -> Result<(), StoreError> {
        let key = (code.as_str().to_string(), user.as_str().to_string());
        let mut consumptions = lock(&self.consumptions)?;
        if consumptions.contains_key(&key) {
            return Err(StoreError::Conflict(format!("{}:{}", code, user)));
        }
        consumptions.insert(
            key,
            ConsumptionRecord {
                code: code.clone(),
                user: user.clone(),
                consumed_at: unix_now(),
            },
        );
        drop(consumptions);

        // Keep the coupon document's own usage list in step.
        if let Some(coupon) = lock(&self.coupons)?.get_mut(code.as_str()) {
            coupon.record_use(user.clone());
        }
        Ok(())
    }

    fn unconsume(&self, code: &CouponCode, user: &UserId) -> Result<(), StoreError> {
        let key = (code.as_str().to_string(), user.as_str().to_string());
        lock(&self.consumptions)?.remove(&key);

        if let Some(coupon) = lock(&self.coupons)?.get_mut(code.as_str()) {
            coupon.release_use(user);
        }
        Ok(())
    }
}

impl OrderStore for MemoryStore {
    fn create(&self, order: &Order) -> Result<OrderId, StoreError> {
        lock(&self.orders)?.insert(order.id.clone(), order.clone());
        Ok(order.id.clone())
    }

    fn order(&self, id: &OrderId) -> Result<Option<Order>, StoreError> {
        Ok(lock(&self.orders)?.get(id).cloned())
    }

    fn update(&self, order: &Order) -> Result<(), StoreError> {
        let mut orders = lock(&self.orders)?;
        if !orders.contains_key(&order.id) {
            return Err(StoreError::NotFound(order.id.to_string()));
        }
        orders.insert(order.id.clone(), order.clone());
        Ok(())
    }
}
