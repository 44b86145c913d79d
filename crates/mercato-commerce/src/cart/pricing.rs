//! Pricing calculators.
//!
//! Every surface that prices anything (storefront checkout, admin manual
//! order entry, order editing, invoice generation) delegates here. The
//! rounding and stacking rules live in exactly one place so the surfaces
//! cannot drift apart.

use crate::cart::Cart;
use crate::catalog::DiscountTable;
use crate::error::CommerceError;
use crate::ids::ProductId;
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// The effective unit price for a quantity of a product.
///
/// Applies the best qualifying tier discount to the captured base price,
/// rounding half-up once at the unit level. Line totals are then plain
/// `unit_price x quantity`, so the displayed unit price and the displayed
/// line total always agree.
pub fn effective_unit_price(
    base: Money,
    quantity: i64,
    product_id: &ProductId,
    table: &DiscountTable,
) -> Money {
    base.percent_off(table.applicable_percent(product_id, quantity))
}

/// The final payable total for a subtotal with a percentage discount.
///
/// One multiplicative reduction, rounded half-up to the cent. Used
/// identically for a cart-level coupon, an admin manual discount, and
/// stacked discounts (sum the percentages first, see [`stacked_percent`]).
pub fn order_total(subtotal: Money, discount_percent: f64) -> Money {
    subtotal.percent_off(discount_percent)
}

/// Combine several percentage discounts into one.
///
/// Percentages are summed and capped at 100, then applied once through
/// [`order_total`]. Stacking is additive, never compounded
/// multiplicatively.
pub fn stacked_percent(percents: impl IntoIterator<Item = f64>) -> f64 {
    percents
        .into_iter()
        .map(|p| p.clamp(0.0, 100.0))
        .sum::<f64>()
        .min(100.0)
}

/// Pricing breakdown for one cart line.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LineTotals {
    /// Product on the line.
    pub product_id: ProductId,
    /// Quantity.
    pub quantity: i64,
    /// Effective unit price after tier discounts.
    pub unit_price: Money,
    /// `unit_price x quantity`.
    pub line_total: Money,
}

/// Complete pricing breakdown for a cart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartTotals {
    /// Sum of line totals, before any coupon.
    pub subtotal: Money,
    /// Coupon discount percentage applied to the subtotal (0 if none).
    pub discount_percent: f64,
    /// `subtotal - grand_total`, so the breakdown is internally exact.
    pub discount_total: Money,
    /// Final payable total.
    pub grand_total: Money,
    /// Per-line breakdown in display order.
    pub line_items: Vec<LineTotals>,
}

impl CartTotals {
    /// Derive the totals for a cart.
    pub fn for_cart(cart: &Cart) -> Result<Self, CommerceError> {
        let mut line_items = Vec::with_capacity(cart.items.len());
        for item in &cart.items {
            line_items.push(LineTotals {
                product_id: item.product_id.clone(),
                quantity: item.quantity,
                unit_price: item.unit_price,
                line_total: item.line_total()?,
            });
        }

        let subtotal = Money::try_sum(line_items.iter().map(|l| &l.line_total), cart.currency)
            .ok_or(CommerceError::Overflow)?;
        let discount_percent = cart.coupon.as_ref().map(|c| c.percent).unwrap_or(0.0);
        let grand_total = order_total(subtotal, discount_percent);
        let discount_total = subtotal
            .try_subtract(&grand_total)
            .ok_or(CommerceError::Overflow)?;

        Ok(Self {
            subtotal,
            discount_percent,
            discount_total,
            grand_total,
            line_items,
        })
    }

    /// Check if any discount is applied.
    pub fn has_discount(&self) -> bool {
        self.discount_total.is_positive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::QuantityDiscountRule;
    use crate::money::Currency;

    #[test]
    fn test_effective_unit_price_no_rule() {
        let base = Money::new(5000, Currency::USD);
        let price = effective_unit_price(base, 3, &ProductId::new("p-1"), &DiscountTable::empty());
        assert_eq!(price, base);
    }

    #[test]
    fn test_effective_unit_price_highest_tier() {
        let product = ProductId::new("p-1");
        let table = DiscountTable::new(vec![
            QuantityDiscountRule::new(product.clone(), 5, 5.0),
            QuantityDiscountRule::new(product.clone(), 10, 15.0),
        ]);
        // $50.00 at qty 12 takes the 15% tier, not the 5% one.
        let price = effective_unit_price(Money::new(5000, Currency::USD), 12, &product, &table);
        assert_eq!(price.amount_cents, 4250);
    }

    #[test]
    fn test_order_total_rounds_half_up() {
        let total = order_total(Money::new(20_000, Currency::USD), 15.0);
        assert_eq!(total.amount_cents, 17_000);
    }

    #[test]
    fn test_order_total_half_cent_rounds_price_up() {
        // $12.50 at 15% is $10.625 exact; the half-up rounding applies to
        // the final price, giving $10.63 rather than $10.62.
        let total = order_total(Money::new(1_250, Currency::USD), 15.0);
        assert_eq!(total.amount_cents, 1_063);
    }

    #[test]
    fn test_order_total_zero_discount() {
        let subtotal = Money::new(9_999, Currency::USD);
        assert_eq!(order_total(subtotal, 0.0), subtotal);
    }

    #[test]
    fn test_stacked_percent_is_additive() {
        assert_eq!(stacked_percent(vec![10.0, 15.0]), 25.0);
        // Summed then applied once; 10% + 15% off $100 is $75, not
        // $100 * 0.9 * 0.85 = $76.50.
        let total = order_total(
            Money::new(10_000, Currency::USD),
            stacked_percent(vec![10.0, 15.0]),
        );
        assert_eq!(total.amount_cents, 7_500);
    }

    #[test]
    fn test_stacked_percent_caps_at_hundred() {
        assert_eq!(stacked_percent(vec![60.0, 70.0]), 100.0);
        assert_eq!(stacked_percent(std::iter::empty()), 0.0);
    }
}
