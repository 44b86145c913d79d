//! Product types.

use crate::ids::ProductId;
use crate::money::Money;
use crate::unix_now;
use serde::{Deserialize, Serialize};

/// A product in the catalog.
///
/// Prices on a `Product` are the current base prices; carts and orders copy
/// what they need at add time, so a later catalog edit never rewrites a
/// historical order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    /// Unique product identifier.
    pub id: ProductId,
    /// Display title.
    pub title: String,
    /// Base unit price. Never negative.
    pub price: Money,
    /// Category slug for browsing/filtering.
    pub category: String,
    /// Units currently in stock.
    pub stock: i64,
    /// Primary image reference (object storage key or URL).
    pub image: Option<String>,
    /// Unix timestamp of creation.
    pub created_at: i64,
    /// Unix timestamp of last update.
    pub updated_at: i64,
}

impl Product {
    /// Create a product with the given identity, title, price, and category.
    pub fn new(
        id: impl Into<ProductId>,
        title: impl Into<String>,
        price: Money,
        category: impl Into<String>,
    ) -> Self {
        let now = unix_now();
        Self {
            id: id.into(),
            title: title.into(),
            price,
            category: category.into(),
            stock: 0,
            image: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Set the stock count.
    pub fn with_stock(mut self, stock: i64) -> Self {
        self.stock = stock;
        self
    }

    /// Set the primary image reference.
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    /// Check whether the requested quantity is available.
    pub fn has_stock(&self, quantity: i64) -> bool {
        quantity <= self.stock
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Currency;

    #[test]
    fn test_product_builder() {
        let p = Product::new("p-1", "Mug", Money::new(1200, Currency::USD), "kitchen")
            .with_stock(10)
            .with_image("img/mug.png");
        assert_eq!(p.stock, 10);
        assert!(p.has_stock(10));
        assert!(!p.has_stock(11));
    }
}
