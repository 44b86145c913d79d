//! Coupon codes and validation.
//!
//! A coupon is keyed by its normalized code; normalization (trim plus
//! uppercase) happens at construction so comparison is case-insensitive
//! everywhere by construction rather than by convention.
//!
//! Validation is a dry run: it never marks the coupon consumed. The
//! consumption record is written separately, only at the point an order is
//! durably created, see [`crate::store`].

use crate::error::CommerceError;
use crate::ids::UserId;
use crate::unix_now;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A normalized coupon code.
///
/// Construction trims whitespace and uppercases, so `" promo10 "` and
/// `"PROMO10"` are the same code. Deserialization normalizes too.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String")]
pub struct CouponCode(String);

impl CouponCode {
    /// Create a normalized code from raw user input.
    pub fn new(raw: impl AsRef<str>) -> Self {
        Self(raw.as_ref().trim().to_uppercase())
    }

    /// Get the normalized code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CouponCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for CouponCode {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for CouponCode {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Why a coupon was rejected during validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CouponRejection {
    /// The coupon has been deactivated by an admin.
    Inactive,
    /// Single-use coupon already consumed by this user.
    AlreadyUsed,
}

impl CouponRejection {
    /// Attach the coupon and user context to produce a commerce error.
    pub fn into_error(self, code: &CouponCode, user: Option<&UserId>) -> CommerceError {
        match self {
            CouponRejection::Inactive => CommerceError::CouponInactive(code.to_string()),
            CouponRejection::AlreadyUsed => CommerceError::CouponAlreadyUsed {
                code: code.to_string(),
                user: user.map(|u| u.to_string()).unwrap_or_default(),
            },
        }
    }
}

/// A coupon granting a percentage discount on the order total.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Coupon {
    /// Normalized code; the coupon's identity.
    pub code: CouponCode,
    /// Discount percentage, 0 to 100.
    pub percent: f64,
    /// Inactive coupons never apply, regardless of anything else.
    pub active: bool,
    /// Restrict to one use per user identity.
    pub single_use: bool,
    /// Users who have consumed this coupon.
    pub used_by: Vec<UserId>,
    /// Unix timestamp of creation.
    pub created_at: i64,
    /// Unix timestamp of last update.
    pub updated_at: i64,
}

impl Coupon {
    /// Create an active, multi-use coupon.
    pub fn new(code: impl Into<CouponCode>, percent: f64) -> Self {
        let now = unix_now();
        Self {
            code: code.into(),
            percent,
            active: true,
            single_use: false,
            used_by: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Restrict the coupon to one use per user.
    pub fn single_use(mut self) -> Self {
        self.single_use = true;
        self
    }

    /// Toggle the active flag.
    pub fn set_active(&mut self, active: bool) {
        self.active = active;
        self.updated_at = unix_now();
    }

    /// Check whether this user has already consumed the coupon.
    pub fn consumed_by(&self, user: &UserId) -> bool {
        self.used_by.contains(user)
    }

    /// Validate the coupon for a user, returning the discount percent.
    ///
    /// Checks short-circuit in order: inactive first, then single-use
    /// consumption (only when a user identity is known). Validation is
    /// pure; consuming the coupon is a separate store write.
    pub fn validate_for(&self, user: Option<&UserId>) -> Result<f64, CouponRejection> {
        if !self.active {
            return Err(CouponRejection::Inactive);
        }
        if self.single_use {
            if let Some(user) = user {
                if self.consumed_by(user) {
                    return Err(CouponRejection::AlreadyUsed);
                }
            }
        }
        Ok(self.percent)
    }

    /// Record a consumption on the coupon document itself.
    ///
    /// The authoritative guard against double use is the store's
    /// conditional write; this keeps the document's own record in step.
    pub fn record_use(&mut self, user: UserId) {
        if !self.used_by.contains(&user) {
            self.used_by.push(user);
        }
        self.updated_at = unix_now();
    }

    /// Undo [`Self::record_use`] for a checkout that did not complete.
    pub fn release_use(&mut self, user: &UserId) {
        self.used_by.retain(|u| u != user);
        self.updated_at = unix_now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_normalization() {
        assert_eq!(CouponCode::new("  promo10 "), CouponCode::new("PROMO10"));
        assert_eq!(CouponCode::new("save5").as_str(), "SAVE5");
    }

    #[test]
    fn test_valid_coupon() {
        let coupon = Coupon::new("PROMO10", 10.0);
        assert_eq!(coupon.validate_for(None), Ok(10.0));
    }

    #[test]
    fn test_inactive_rejected() {
        let mut coupon = Coupon::new("PROMO10", 10.0);
        coupon.set_active(false);
        assert_eq!(coupon.validate_for(None), Err(CouponRejection::Inactive));
    }

    #[test]
    fn test_single_use_rejected_after_consumption() {
        let user = UserId::new("u-1");
        let mut coupon = Coupon::new("ONCE", 20.0).single_use();

        assert_eq!(coupon.validate_for(Some(&user)), Ok(20.0));
        coupon.record_use(user.clone());

        // Still active, but burned for this user.
        assert!(coupon.active);
        assert_eq!(
            coupon.validate_for(Some(&user)),
            Err(CouponRejection::AlreadyUsed)
        );

        // Other users are unaffected.
        let other = UserId::new("u-2");
        assert_eq!(coupon.validate_for(Some(&other)), Ok(20.0));
    }

    #[test]
    fn test_multi_use_never_burns() {
        let user = UserId::new("u-1");
        let mut coupon = Coupon::new("ALWAYS", 5.0);
        coupon.record_use(user.clone());
        assert_eq!(coupon.validate_for(Some(&user)), Ok(5.0));
    }

    #[test]
    fn test_inactive_checked_before_consumption() {
        let user = UserId::new("u-1");
        let mut coupon = Coupon::new("ONCE", 20.0).single_use();
        coupon.record_use(user.clone());
        coupon.set_active(false);
        assert_eq!(
            coupon.validate_for(Some(&user)),
            Err(CouponRejection::Inactive)
        );
    }
}
