//! Cart aggregate and line items.

use crate::cart::{effective_unit_price, CartTotals};
use crate::catalog::{DiscountTable, Product};
use crate::coupon::CouponCode;
use crate::error::CommerceError;
use crate::ids::{CartId, ProductId, UserId};
use crate::money::{Currency, Money};
use crate::unix_now;
use serde::{Deserialize, Serialize};

/// Maximum quantity allowed per line item.
pub const MAX_QUANTITY_PER_LINE: i64 = 9999;

/// A line item in the cart.
///
/// `base_unit_price` is captured when the product is first added and is
/// preserved across every re-pricing, so tier lookups always start from the
/// true base price and repeated adds can never compound a discount.
/// `unit_price` is derived, never set directly.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LineItem {
    /// Product on this line; lines are unique by product.
    pub product_id: ProductId,
    /// Product title, copied for display.
    pub title: String,
    /// Product image reference, copied for display.
    pub image: Option<String>,
    /// Quantity. At least 1.
    pub quantity: i64,
    /// Unit price captured at add time. Re-pricing always starts here.
    pub base_unit_price: Money,
    /// Effective unit price after tier discounts. Always <= base.
    pub unit_price: Money,
}

impl LineItem {
    fn new(product: &Product, quantity: i64, table: &DiscountTable) -> Self {
        Self {
            product_id: product.id.clone(),
            title: product.title.clone(),
            image: product.image.clone(),
            quantity,
            base_unit_price: product.price,
            unit_price: effective_unit_price(product.price, quantity, &product.id, table),
        }
    }

    fn reprice(&mut self, table: &DiscountTable) {
        self.unit_price =
            effective_unit_price(self.base_unit_price, self.quantity, &self.product_id, table);
    }

    /// `unit_price x quantity`.
    pub fn line_total(&self) -> Result<Money, CommerceError> {
        self.unit_price
            .try_multiply(self.quantity)
            .ok_or(CommerceError::Overflow)
    }
}

/// A coupon applied to a cart: the normalized code plus the validated
/// discount percent, copied at apply time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppliedCoupon {
    /// Normalized coupon code.
    pub code: CouponCode,
    /// Validated discount percentage.
    pub percent: f64,
}

/// A shopping cart.
///
/// Line items are unique by product id and keep their insertion order,
/// which is the display order. At most one coupon is applied at a time.
/// Mutations validate first and only then mutate, so a rejected operation
/// leaves the cart exactly as it was.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Cart {
    /// Unique cart identifier.
    pub id: CartId,
    /// Session the cart belongs to.
    pub session_id: String,
    /// User identity, once known.
    pub user_id: Option<UserId>,
    /// Ordered line items, unique by product id.
    pub items: Vec<LineItem>,
    /// The applied coupon, if any.
    pub coupon: Option<AppliedCoupon>,
    /// Cart currency, adopted from the first item added.
    pub currency: Currency,
    /// Unix timestamp of creation.
    pub created_at: i64,
    /// Unix timestamp of last update.
    pub updated_at: i64,
}

impl Cart {
    /// Create an empty cart for a session.
    pub fn new(session_id: impl Into<String>) -> Self {
        let now = unix_now();
        Self {
            id: CartId::generate(),
            session_id: session_id.into(),
            user_id: None,
            items: Vec::new(),
            coupon: None,
            currency: Currency::default(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Create a cart for an authenticated user.
    pub fn for_user(user_id: UserId, session_id: impl Into<String>) -> Self {
        let mut cart = Self::new(session_id);
        cart.user_id = Some(user_id);
        cart
    }

    /// Add `quantity` units of a product.
    ///
    /// If the product is already in the cart, the quantities are summed and
    /// the line is re-priced from its captured base price. Otherwise a new
    /// line is appended and priced fresh.
    pub fn add_item(
        &mut self,
        product: &Product,
        quantity: i64,
        table: &DiscountTable,
    ) -> Result<(), CommerceError> {
        if quantity < 1 {
            return Err(CommerceError::InvalidQuantity(quantity));
        }
        if self.items.is_empty() {
            self.currency = product.price.currency;
        } else if product.price.currency != self.currency {
            return Err(CommerceError::CurrencyMismatch {
                expected: self.currency.code().to_string(),
                got: product.price.currency.code().to_string(),
            });
        }

        if let Some(existing) = self.items.iter_mut().find(|i| i.product_id == product.id) {
            let new_quantity = existing
                .quantity
                .checked_add(quantity)
                .ok_or(CommerceError::Overflow)?;
            if new_quantity > MAX_QUANTITY_PER_LINE {
                return Err(CommerceError::QuantityExceedsLimit(
                    new_quantity,
                    MAX_QUANTITY_PER_LINE,
                ));
            }
            existing.quantity = new_quantity;
            existing.reprice(table);
        } else {
            if quantity > MAX_QUANTITY_PER_LINE {
                return Err(CommerceError::QuantityExceedsLimit(
                    quantity,
                    MAX_QUANTITY_PER_LINE,
                ));
            }
            self.items.push(LineItem::new(product, quantity, table));
        }

        self.updated_at = unix_now();
        Ok(())
    }

    /// Set the quantity of a line item and re-price it.
    ///
    /// Quantities below 1 are rejected, not clamped; a surprising silent
    /// clamp would change totals without the user asking for it. Returns
    /// `Ok(false)` when the product is not in the cart.
    pub fn update_quantity(
        &mut self,
        product_id: &ProductId,
        quantity: i64,
        table: &DiscountTable,
    ) -> Result<bool, CommerceError> {
        if quantity < 1 {
            return Err(CommerceError::InvalidQuantity(quantity));
        }
        if quantity > MAX_QUANTITY_PER_LINE {
            return Err(CommerceError::QuantityExceedsLimit(
                quantity,
                MAX_QUANTITY_PER_LINE,
            ));
        }

        match self.items.iter_mut().find(|i| &i.product_id == product_id) {
            Some(item) => {
                item.quantity = quantity;
                item.reprice(table);
                self.updated_at = unix_now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Remove a line item.
    ///
    /// Removing the last line also clears the applied coupon, so a stale
    /// discount cannot silently reappear when new items are added.
    pub fn remove_item(&mut self, product_id: &ProductId) -> bool {
        let before = self.items.len();
        self.items.retain(|i| &i.product_id != product_id);
        let removed = self.items.len() < before;
        if removed {
            if self.items.is_empty() {
                self.coupon = None;
            }
            self.updated_at = unix_now();
        }
        removed
    }

    /// Empty the cart: all line items and the coupon.
    pub fn clear(&mut self) {
        self.items.clear();
        self.coupon = None;
        self.updated_at = unix_now();
    }

    /// Apply a coupon, replacing any previously applied one.
    ///
    /// Line pricing is unaffected; the coupon only enters the final total.
    pub fn apply_coupon(&mut self, coupon: AppliedCoupon) {
        self.coupon = Some(coupon);
        self.updated_at = unix_now();
    }

    /// Remove the applied coupon, if any.
    pub fn clear_coupon(&mut self) {
        if self.coupon.take().is_some() {
            self.updated_at = unix_now();
        }
    }

    /// Total item count (sum of quantities).
    pub fn item_count(&self) -> i64 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// Number of distinct products.
    pub fn unique_item_count(&self) -> usize {
        self.items.len()
    }

    /// Check if the cart has no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Get a line item by product id.
    pub fn get_item(&self, product_id: &ProductId) -> Option<&LineItem> {
        self.items.iter().find(|i| &i.product_id == product_id)
    }

    /// The most recently added `n` line items, in display order.
    ///
    /// Lines are unique by product id, so this is the "recently added"
    /// strip the UI shows without any inline filtering.
    pub fn recent_items(&self, n: usize) -> &[LineItem] {
        let start = self.items.len().saturating_sub(n);
        &self.items[start..]
    }

    /// Subtotal before any coupon.
    pub fn subtotal(&self) -> Result<Money, CommerceError> {
        let mut subtotal = Money::zero(self.currency);
        for item in &self.items {
            let line = item.line_total()?;
            subtotal = subtotal.try_add(&line).ok_or(CommerceError::Overflow)?;
        }
        Ok(subtotal)
    }

    /// Full pricing breakdown including the coupon.
    pub fn totals(&self) -> Result<CartTotals, CommerceError> {
        CartTotals::for_cart(self)
    }

    /// Attach a user identity (e.g. after login).
    pub fn set_user(&mut self, user_id: UserId) {
        self.user_id = Some(user_id);
        self.updated_at = unix_now();
    }
}
