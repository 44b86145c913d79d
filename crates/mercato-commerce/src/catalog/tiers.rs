//! Quantity-tier discount rules.

use crate::ids::{ProductId, RuleId};
use crate::unix_now;
use serde::{Deserialize, Serialize};

/// A quantity-tier discount rule: buy at least `min_quantity` of a product,
/// get `percent` off its unit price.
///
/// Rules are created and deleted by admins, never edited in place. Several
/// rules may exist per product at different thresholds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QuantityDiscountRule {
    /// Unique rule identifier.
    pub id: RuleId,
    /// Product the rule applies to.
    pub product_id: ProductId,
    /// Minimum quantity that unlocks the discount. At least 1.
    pub min_quantity: i64,
    /// Discount percentage, 0 to 100.
    pub percent: f64,
    /// Unix timestamp of creation.
    pub created_at: i64,
}

impl QuantityDiscountRule {
    /// Create a rule. `min_quantity` is raised to 1 if below it.
    pub fn new(product_id: ProductId, min_quantity: i64, percent: f64) -> Self {
        Self {
            id: RuleId::generate(),
            product_id,
            min_quantity: min_quantity.max(1),
            percent,
            created_at: unix_now(),
        }
    }
}

/// The in-memory rule set the pricing core evaluates against.
///
/// Fetched from the backing store once and consumed synchronously; lookup
/// is a pure function of the table's contents.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DiscountTable {
    rules: Vec<QuantityDiscountRule>,
}

impl DiscountTable {
    /// Build a table from a set of rules.
    pub fn new(rules: Vec<QuantityDiscountRule>) -> Self {
        Self { rules }
    }

    /// An empty table: every lookup returns 0.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Add a rule.
    pub fn insert(&mut self, rule: QuantityDiscountRule) {
        self.rules.push(rule);
    }

    /// Remove a rule by id. Returns whether a rule was removed.
    pub fn remove(&mut self, id: &RuleId) -> bool {
        let before = self.rules.len();
        self.rules.retain(|r| &r.id != id);
        self.rules.len() < before
    }

    /// All rules for a product, in insertion order.
    pub fn rules_for<'a>(
        &'a self,
        product_id: &'a ProductId,
    ) -> impl Iterator<Item = &'a QuantityDiscountRule> + 'a {
        self.rules.iter().filter(move |r| &r.product_id == product_id)
    }

    /// The discount percentage applicable to `quantity` units of a product.
    ///
    /// Highest qualifying tier wins: among rules with
    /// `min_quantity <= quantity`, the one with the largest `min_quantity`
    /// applies; ties break toward the larger percent so the result is
    /// deterministic. Returns 0.0 when no rule qualifies.
    pub fn applicable_percent(&self, product_id: &ProductId, quantity: i64) -> f64 {
        self.rules_for(product_id)
            .filter(|r| r.min_quantity <= quantity)
            .max_by(|a, b| {
                a.min_quantity
                    .cmp(&b.min_quantity)
                    .then(a.percent.total_cmp(&b.percent))
            })
            .map(|r| r.percent.clamp(0.0, 100.0))
            .unwrap_or(0.0)
    }
}
