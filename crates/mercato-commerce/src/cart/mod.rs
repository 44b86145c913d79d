//! Shopping cart module.
//!
//! The cart aggregate plus the consolidated pricing calculators that
//! checkout, admin order entry, order editing, and invoicing all delegate
//! to.

mod cart;
mod pricing;

pub use cart::{AppliedCoupon, Cart, LineItem, MAX_QUANTITY_PER_LINE};
pub use pricing::{
    effective_unit_price, order_total, stacked_percent, CartTotals, LineTotals,
};
