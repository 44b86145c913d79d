//! Order snapshots and fulfillment.
//!
//! An order copies titles, quantities, and unit prices out of the cart at
//! creation time. It holds no live product references, so later catalog or
//! rule changes never retroactively alter a historical order. Totals are
//! fixed at creation; the only way to change them is the explicit admin
//! [`Order::reprice`] edit, which re-derives and overwrites them.

use crate::cart::{order_total, stacked_percent, Cart};
use crate::coupon::CouponCode;
use crate::error::CommerceError;
use crate::ids::{OrderId, ProductId, UserId};
use crate::money::{Currency, Money};
use crate::unix_now;
use serde::{Deserialize, Serialize};

/// How the customer pays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum PaymentMethod {
    /// Card via the external payment redirect.
    #[default]
    Card,
    /// Cash on delivery.
    Cash,
    /// Manual bank transfer.
    Transfer,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Card => "card",
            PaymentMethod::Cash => "cash",
            PaymentMethod::Transfer => "transfer",
        }
    }
}

/// Fulfillment status. Moves strictly forward, one step at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum FulfillmentStatus {
    /// Order placed, not yet prepared.
    #[default]
    Pending,
    /// Order prepared and awaiting delivery.
    Prepared,
    /// Order delivered.
    Delivered,
}

impl FulfillmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FulfillmentStatus::Pending => "pending",
            FulfillmentStatus::Prepared => "prepared",
            FulfillmentStatus::Delivered => "delivered",
        }
    }

    /// The next status in the pipeline, if any.
    pub fn next(&self) -> Option<FulfillmentStatus> {
        match self {
            FulfillmentStatus::Pending => Some(FulfillmentStatus::Prepared),
            FulfillmentStatus::Prepared => Some(FulfillmentStatus::Delivered),
            FulfillmentStatus::Delivered => None,
        }
    }

    /// Check if this is the terminal status.
    pub fn is_terminal(&self) -> bool {
        matches!(self, FulfillmentStatus::Delivered)
    }
}

/// A line item snapshot inside an order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderLineItem {
    /// Product reference, for reporting only.
    pub product_id: ProductId,
    /// Title at order time.
    pub title: String,
    /// Quantity ordered.
    pub quantity: i64,
    /// Effective unit price at order time.
    pub unit_price: Money,
    /// `unit_price x quantity`.
    pub line_total: Money,
}

/// A placed order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Order {
    /// Unique order identifier.
    pub id: OrderId,
    /// Human-readable order number.
    pub order_number: String,
    /// Customer, if authenticated.
    pub user_id: Option<UserId>,
    /// Line item snapshots.
    pub line_items: Vec<OrderLineItem>,
    /// Sum of line totals before the coupon.
    pub subtotal: Money,
    /// Coupon code applied at checkout, if any.
    pub coupon_code: Option<CouponCode>,
    /// Total discount percentage applied to the subtotal.
    pub discount_percent: f64,
    /// Final payable total: `subtotal` reduced once by `discount_percent`.
    pub grand_total: Money,
    /// Order currency.
    pub currency: Currency,
    /// Payment method.
    pub payment_method: PaymentMethod,
    /// Fulfillment status.
    pub fulfillment: FulfillmentStatus,
    /// Unix timestamp of creation.
    pub created_at: i64,
    /// Unix timestamp of last update.
    pub updated_at: i64,
}

impl Order {
    /// Build an order snapshot from a cart.
    ///
    /// The grand total is derived through the shared order total
    /// calculator at this moment and is never silently recomputed after.
    pub fn from_cart(cart: &Cart, payment_method: PaymentMethod) -> Result<Self, CommerceError> {
        if cart.is_empty() {
            return Err(CommerceError::EmptyCart);
        }

        let totals = cart.totals()?;
        let line_items = totals
            .line_items
            .iter()
            .map(|line| {
                let title = cart
                    .get_item(&line.product_id)
                    .map(|i| i.title.clone())
                    .unwrap_or_default();
                OrderLineItem {
                    product_id: line.product_id.clone(),
                    title,
                    quantity: line.quantity,
                    unit_price: line.unit_price,
                    line_total: line.line_total,
                }
            })
            .collect();

        let now = unix_now();
        Ok(Self {
            id: OrderId::generate(),
            order_number: Self::generate_order_number(),
            user_id: cart.user_id.clone(),
            line_items,
            subtotal: totals.subtotal,
            coupon_code: cart.coupon.as_ref().map(|c| c.code.clone()),
            discount_percent: totals.discount_percent,
            grand_total: totals.grand_total,
            currency: cart.currency,
            payment_method,
            fulfillment: FulfillmentStatus::Pending,
            created_at: now,
            updated_at: now,
        })
    }

    /// Generate a human-readable order number.
    pub fn generate_order_number() -> String {
        use std::sync::atomic::{AtomicU64, Ordering};
        static SEQ: AtomicU64 = AtomicU64::new(0);
        let seq = SEQ.fetch_add(1, Ordering::Relaxed);
        format!("ORD-{}-{}", unix_now(), seq)
    }

    /// Total item count.
    pub fn item_count(&self) -> i64 {
        self.line_items.iter().map(|i| i.quantity).sum()
    }

    /// Advance fulfillment to the given status.
    ///
    /// Only the immediate next step is allowed: pending to prepared,
    /// prepared to delivered.
    pub fn advance_fulfillment(&mut self, to: FulfillmentStatus) -> Result<(), CommerceError> {
        if self.fulfillment.next() != Some(to) {
            return Err(CommerceError::InvalidStatusTransition {
                from: self.fulfillment.as_str().to_string(),
                to: to.as_str().to_string(),
            });
        }
        self.fulfillment = to;
        self.updated_at = unix_now();
        Ok(())
    }

    /// Explicit admin edit: re-derive totals from a new set of discounts.
    ///
    /// Percentages are summed and applied as a single reduction over the
    /// preserved subtotal, the one pricing rule every surface shares.
    pub fn reprice(&mut self, discount_percents: &[f64]) {
        self.discount_percent = stacked_percent(discount_percents.iter().copied());
        self.grand_total = order_total(self.subtotal, self.discount_percent);
        self.updated_at = unix_now();
    }
}
