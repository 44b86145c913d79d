//! Checkout-facing operations over the backend traits.
//!
//! These are the call sites where the pure pricing core meets the external
//! store: coupon validation (a dry run), coupon application to a cart, and
//! order placement (the one moment a coupon is consumed).

use crate::cart::{AppliedCoupon, Cart};
use crate::catalog::DiscountTable;
use crate::coupon::CouponCode;
use crate::error::CommerceError;
use crate::ids::OrderId;
use crate::order::{Order, PaymentMethod};
use crate::store::backend::{CouponStore, OrderStore, RuleStore};
use mercato_store::StoreError;

/// Fetch all discount rules into an in-memory table.
pub fn load_discount_table<R: RuleStore>(rules: &R) -> Result<DiscountTable, CommerceError> {
    let rules = rules.rules()?;
    tracing::debug!(count = rules.len(), "loaded discount rules");
    Ok(DiscountTable::new(rules))
}

/// Validate a coupon for a user without consuming it.
///
/// Returns the discount percent on success. Checks short-circuit in order:
/// lookup, active flag, single-use consumption. May be called any number of
/// times; nothing is written.
pub fn validate_coupon<C: CouponStore>(
    coupons: &C,
    code: &CouponCode,
    user: Option<&crate::ids::UserId>,
) -> Result<f64, CommerceError> {
    let coupon = coupons
        .coupon(code)?
        .ok_or_else(|| CommerceError::CouponNotFound(code.to_string()))?;
    coupon
        .validate_for(user)
        .map_err(|rejection| rejection.into_error(code, user))
}

/// Validate a coupon against the cart's user and apply it to the cart.
///
/// On any failure the cart keeps its previous coupon state.
pub fn apply_coupon_to_cart<C: CouponStore>(
    coupons: &C,
    cart: &mut Cart,
    code: &CouponCode,
) -> Result<f64, CommerceError> {
    let percent = validate_coupon(coupons, code, cart.user_id.as_ref())?;
    cart.apply_coupon(AppliedCoupon {
        code: code.clone(),
        percent,
    });
    tracing::debug!(code = %code, percent, "coupon applied to cart");
    Ok(percent)
}

/// Place an order from the cart.
///
/// Re-validates the applied coupon, snapshots the cart into an [`Order`],
/// writes the coupon consumption record (single-use coupons only, and only
/// here, never during validation), persists the order, and clears the cart.
/// Any failure leaves the cart untouched. If the order write fails after the
/// coupon was consumed, the consumption record is released again so the
/// failed checkout does not burn the coupon.
pub fn place_order<C: CouponStore, O: OrderStore>(
    coupons: &C,
    orders: &O,
    cart: &mut Cart,
    payment_method: PaymentMethod,
) -> Result<OrderId, CommerceError> {
    if cart.is_empty() {
        return Err(CommerceError::EmptyCart);
    }

    let order = Order::from_cart(cart, payment_method)?;
    let mut consumed = None;

    if let Some(applied) = cart.coupon.clone() {
        let coupon = coupons
            .coupon(&applied.code)?
            .ok_or_else(|| CommerceError::CouponNotFound(applied.code.to_string()))?;
        coupon
            .validate_for(cart.user_id.as_ref())
            .map_err(|rejection| rejection.into_error(&applied.code, cart.user_id.as_ref()))?;

        if coupon.single_use {
            if let Some(user) = cart.user_id.clone() {
                match coupons.consume(&applied.code, &user) {
                    Ok(()) => consumed = Some((applied.code.clone(), user)),
                    Err(StoreError::Conflict(_)) => {
                        // A concurrent order won the conditional write.
                        tracing::warn!(code = %applied.code, user = %user, "coupon consumption conflict");
                        return Err(CommerceError::CouponAlreadyUsed {
                            code: applied.code.to_string(),
                            user: user.to_string(),
                        });
                    }
                    Err(e) => return Err(e.into()),
                }
            }
        }
    }

    let order_id = match orders.create(&order) {
        Ok(id) => id,
        Err(e) => {
            // Release the consumption so the failed checkout does not burn
            // the coupon with no order behind it.
            if let Some((code, user)) = consumed {
                if let Err(release) = coupons.unconsume(&code, &user) {
                    tracing::warn!(
                        code = %code,
                        user = %user,
                        error = %release,
                        "failed to release coupon after order write failure"
                    );
                }
            }
            return Err(e.into());
        }
    };
    tracing::info!(
        order = %order_id,
        number = %order.order_number,
        total = %order.grand_total,
        "order placed"
    );

    cart.clear();
    Ok(order_id)
}
