//! Money type for monetary values.
//!
//! Amounts are stored in cents (the smallest currency unit) as `i64`, which
//! avoids floating-point drift in price math. Percentage discounts are
//! computed in integer basis points with half-up rounding, applied exactly
//! once per reduction, so a displayed unit price times quantity is always
//! the displayed line total.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Supported currencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Currency {
    #[default]
    USD,
    EUR,
    GBP,
    MXN,
}

impl Currency {
    /// Currency code (e.g. "USD").
    pub fn code(&self) -> &'static str {
        match self {
            Currency::USD => "USD",
            Currency::EUR => "EUR",
            Currency::GBP => "GBP",
            Currency::MXN => "MXN",
        }
    }

    /// Currency symbol (e.g. "$").
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::USD => "$",
            Currency::EUR => "\u{20ac}",
            Currency::GBP => "\u{00a3}",
            Currency::MXN => "MX$",
        }
    }

    /// Parse a currency code, case-insensitively.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.to_uppercase().as_str() {
            "USD" => Some(Currency::USD),
            "EUR" => Some(Currency::EUR),
            "GBP" => Some(Currency::GBP),
            "MXN" => Some(Currency::MXN),
            _ => None,
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A monetary value with currency, in cents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Money {
    /// Amount in cents.
    pub amount_cents: i64,
    /// The currency.
    pub currency: Currency,
}

impl Money {
    /// Create a Money value from cents.
    pub fn new(amount_cents: i64, currency: Currency) -> Self {
        Self {
            amount_cents,
            currency,
        }
    }

    /// Create a Money value from a decimal amount.
    ///
    /// ```
    /// use mercato_commerce::money::{Currency, Money};
    /// let price = Money::from_decimal(49.99, Currency::USD);
    /// assert_eq!(price.amount_cents, 4999);
    /// ```
    pub fn from_decimal(amount: f64, currency: Currency) -> Self {
        Self::new((amount * 100.0).round() as i64, currency)
    }

    /// Zero in the given currency.
    pub fn zero(currency: Currency) -> Self {
        Self::new(0, currency)
    }

    /// Check if this is zero.
    pub fn is_zero(&self) -> bool {
        self.amount_cents == 0
    }

    /// Check if this is strictly positive.
    pub fn is_positive(&self) -> bool {
        self.amount_cents > 0
    }

    /// Convert to a decimal value. Display/reporting only.
    pub fn to_decimal(&self) -> f64 {
        self.amount_cents as f64 / 100.0
    }

    /// Format with symbol (e.g. "$49.99").
    pub fn display(&self) -> String {
        format!("{}{:.2}", self.currency.symbol(), self.to_decimal())
    }

    /// Try to add, returning `None` on currency mismatch or overflow.
    pub fn try_add(&self, other: &Money) -> Option<Money> {
        if self.currency != other.currency {
            return None;
        }
        let amount = self.amount_cents.checked_add(other.amount_cents)?;
        Some(Money::new(amount, self.currency))
    }

    /// Try to subtract, returning `None` on currency mismatch or overflow.
    pub fn try_subtract(&self, other: &Money) -> Option<Money> {
        if self.currency != other.currency {
            return None;
        }
        let amount = self.amount_cents.checked_sub(other.amount_cents)?;
        Some(Money::new(amount, self.currency))
    }

    /// Try to multiply by a quantity, returning `None` on overflow.
    pub fn try_multiply(&self, factor: i64) -> Option<Money> {
        let amount = self.amount_cents.checked_mul(factor)?;
        Some(Money::new(amount, self.currency))
    }

    /// Sum an iterator of Money values, `None` on mismatch or overflow.
    pub fn try_sum<'a>(
        mut iter: impl Iterator<Item = &'a Money>,
        currency: Currency,
    ) -> Option<Money> {
        iter.try_fold(Money::zero(currency), |acc, m| acc.try_add(m))
    }

    /// Apply a percentage reduction: `self * (1 - percent/100)`, rounded
    /// half-up to the cent.
    ///
    /// Half-up rounding is applied to the reduced price itself, not to the
    /// discount amount, so a half-cent boundary rounds the price up:
    /// $1.05 at 10% off is $0.95, not $0.94. Percent is clamped to
    /// 0..=100. Integer basis-point arithmetic keeps half-cent cases
    /// deterministic. One multiplicative reduction with one rounding;
    /// callers that stack discounts must sum percentages first and call
    /// this once.
    ///
    /// ```
    /// use mercato_commerce::money::{Currency, Money};
    /// let subtotal = Money::new(20_000, Currency::USD); // $200.00
    /// assert_eq!(subtotal.percent_off(15.0).amount_cents, 17_000);
    /// ```
    pub fn percent_off(&self, percent: f64) -> Money {
        let bps = (percent * 100.0).round() as i64;
        let remaining = (10_000 - bps.clamp(0, 10_000)) as i128;
        let cents = (self.amount_cents as i128 * remaining + 5_000) / 10_000;
        Money::new(cents as i64, self.currency)
    }

    /// The discount amount for a percentage of this value:
    /// `self - self.percent_off(percent)`.
    ///
    /// Derived from the rounded price so that price plus discount always
    /// reconstructs the original amount exactly.
    pub fn percentage(&self, percent: f64) -> Money {
        Money::new(
            self.amount_cents - self.percent_off(percent).amount_cents,
            self.currency,
        )
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}
