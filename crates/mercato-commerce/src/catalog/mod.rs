//! Product catalog module.
//!
//! Products and the quantity-tier discount rules an admin maintains for
//! them. Read-only from the pricing core's point of view.

mod product;
mod tiers;

pub use product::Product;
pub use tiers::{DiscountTable, QuantityDiscountRule};
