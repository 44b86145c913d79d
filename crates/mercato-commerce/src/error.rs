//! Commerce error types.
//!
//! Business-rule rejections (a bad coupon, an invalid quantity) are expected
//! outcomes the UI renders as messages; only infrastructure failures carry a
//! backend error inside them. Every operation that returns one of these must
//! leave the cart or order it was called on unchanged.

use thiserror::Error;

/// Errors that can occur in storefront operations.
#[derive(Error, Debug)]
pub enum CommerceError {
    /// Product not found in the catalog.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// No coupon exists for the given code.
    #[error("Coupon not found: {0}")]
    CouponNotFound(String),

    /// Coupon exists but has been deactivated.
    #[error("Coupon is inactive: {0}")]
    CouponInactive(String),

    /// Single-use coupon already consumed by this user.
    #[error("Coupon {code} already used by {user}")]
    CouponAlreadyUsed { code: String, user: String },

    /// Quantity below 1 on add or update.
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(i64),

    /// Quantity above the per-line cap.
    #[error("Quantity {0} exceeds maximum allowed ({1})")]
    QuantityExceedsLimit(i64, i64),

    /// Order cannot be placed from an empty cart.
    #[error("Cart is empty")]
    EmptyCart,

    /// Fulfillment status can only move forward one step at a time.
    #[error("Invalid fulfillment transition from {from} to {to}")]
    InvalidStatusTransition { from: String, to: String },

    /// Mixed currencies in one cart or order.
    #[error("Currency mismatch: expected {expected}, got {got}")]
    CurrencyMismatch { expected: String, got: String },

    /// Arithmetic overflow in a money calculation.
    #[error("Arithmetic overflow in money calculation")]
    Overflow,

    /// The backing store could not be reached.
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<mercato_store::StoreError> for CommerceError {
    fn from(e: mercato_store::StoreError) -> Self {
        match e {
            mercato_store::StoreError::Serialization(e) => {
                CommerceError::Serialization(e.to_string())
            }
            other => CommerceError::StoreUnavailable(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for CommerceError {
    fn from(e: serde_json::Error) -> Self {
        CommerceError::Serialization(e.to_string())
    }
}
