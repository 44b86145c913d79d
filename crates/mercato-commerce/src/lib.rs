//! Storefront domain types and pricing logic for Mercato.
//!
//! This crate is the single home for the pricing rules the storefront and
//! the admin console share:
//!
//! - **Catalog**: products and quantity-tier discount rules
//! - **Coupons**: code normalization, validation, one-time-use enforcement
//! - **Cart**: line items that re-price from their captured base price
//! - **Pricing**: the unit pricer and order total calculator every call
//!   site delegates to
//! - **Orders**: immutable snapshots with a fulfillment state machine
//! - **Store**: injected backend traits plus an in-memory backend
//!
//! # Example
//!
//! ```rust
//! use mercato_commerce::prelude::*;
//!
//! let product = Product::new("p-1", "Espresso Beans", Money::new(10_000, Currency::USD), "coffee");
//! let table = DiscountTable::new(vec![QuantityDiscountRule::new(
//!     product.id.clone(),
//!     5,
//!     10.0,
//! )]);
//!
//! let mut cart = Cart::new("session-1");
//! cart.add_item(&product, 5, &table).unwrap();
//!
//! let totals = CartTotals::for_cart(&cart).unwrap();
//! assert_eq!(totals.grand_total, Money::new(45_000, Currency::USD));
//! ```

pub mod cart;
pub mod catalog;
pub mod coupon;
pub mod error;
pub mod ids;
pub mod money;
pub mod order;
pub mod store;

pub use error::CommerceError;
pub use ids::*;
pub use money::{Currency, Money};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::CommerceError;
    pub use crate::ids::*;
    pub use crate::money::{Currency, Money};

    // Catalog
    pub use crate::catalog::{DiscountTable, Product, QuantityDiscountRule};

    // Coupons
    pub use crate::coupon::{Coupon, CouponCode, CouponRejection};

    // Cart
    pub use crate::cart::{
        AppliedCoupon, Cart, CartTotals, LineItem, LineTotals, MAX_QUANTITY_PER_LINE,
    };

    // Orders
    pub use crate::order::{FulfillmentStatus, Order, OrderLineItem, PaymentMethod};

    // Store
    pub use crate::store::{
        CatalogStore, CouponStore, MemoryStore, OrderStore, RuleStore,
    };
}

/// Current Unix timestamp in seconds.
pub(crate) fn unix_now() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}
