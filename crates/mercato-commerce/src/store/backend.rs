//! Backend traits over the external document store.

use crate::catalog::{Product, QuantityDiscountRule};
use crate::coupon::{Coupon, CouponCode};
use crate::ids::{OrderId, ProductId, UserId};
use crate::order::Order;
use mercato_store::StoreError;
use serde::{Deserialize, Serialize};

/// A persisted marker that a user has consumed a single-use coupon.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConsumptionRecord {
    /// The coupon code.
    pub code: CouponCode,
    /// The consuming user.
    pub user: UserId,
    /// Unix timestamp of consumption.
    pub consumed_at: i64,
}

/// Read access to the product catalog.
pub trait CatalogStore {
    /// Fetch the full product list.
    fn products(&self) -> Result<Vec<Product>, StoreError>;

    /// Fetch a single product by id.
    fn product(&self, id: &ProductId) -> Result<Option<Product>, StoreError>;
}

/// Read access to quantity-tier discount rules.
pub trait RuleStore {
    /// Fetch all rules.
    fn rules(&self) -> Result<Vec<QuantityDiscountRule>, StoreError>;
}

/// Coupon lookup and consumption.
pub trait CouponStore {
    /// Fetch a coupon by normalized code.
    fn coupon(&self, code: &CouponCode) -> Result<Option<Coupon>, StoreError>;

    /// Write the consumption record for `(code, user)`.
    ///
    /// Must be an atomic create-if-absent: when the record already exists
    /// the write fails with [`StoreError::Conflict`] and nothing changes.
    /// This closes the validate/consume race between concurrent sessions.
    fn consume(&self, code: &CouponCode, user: &UserId) -> Result<(), StoreError>;

    /// Delete the consumption record for `(code, user)`.
    ///
    /// Compensation for a checkout that consumed the coupon but then
    /// failed to persist its order; deleting a missing record is not an
    /// error.
    fn unconsume(&self, code: &CouponCode, user: &UserId) -> Result<(), StoreError>;
}

/// Order persistence.
pub trait OrderStore {
    /// Persist a new order document, returning its id.
    fn create(&self, order: &Order) -> Result<OrderId, StoreError>;

    /// Fetch an order by id.
    fn order(&self, id: &OrderId) -> Result<Option<Order>, StoreError>;

    /// Overwrite an existing order after an explicit admin edit.
    fn update(&self, order: &Order) -> Result<(), StoreError>;
}
