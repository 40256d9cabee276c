//! Money type for monetary values.
//!
//! Amounts are stored in the smallest unit of the currency (cents for USD)
//! to avoid floating-point precision issues. All arithmetic used on the
//! checkout path is checked; an overflow surfaces as an error instead of
//! wrapping silently into a committed order.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Supported currencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Currency {
    #[default]
    USD,
    EUR,
    GBP,
    JPY,
}

impl Currency {
    /// Get the ISO currency code (e.g., "USD").
    pub fn code(&self) -> &'static str {
        match self {
            Currency::USD => "USD",
            Currency::EUR => "EUR",
            Currency::GBP => "GBP",
            Currency::JPY => "JPY",
        }
    }

    /// Get the display symbol (e.g., "$").
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::USD => "$",
            Currency::EUR => "\u{20ac}",
            Currency::GBP => "\u{00a3}",
            Currency::JPY => "\u{00a5}",
        }
    }

    /// Number of decimal places for this currency.
    pub fn decimal_places(&self) -> u32 {
        match self {
            Currency::JPY => 0,
            _ => 2,
        }
    }

    /// Parse a currency code string.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.to_uppercase().as_str() {
            "USD" => Some(Currency::USD),
            "EUR" => Some(Currency::EUR),
            "GBP" => Some(Currency::GBP),
            "JPY" => Some(Currency::JPY),
            _ => None,
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A monetary value with currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Money {
    /// Amount in smallest currency unit (e.g., cents).
    pub amount_cents: i64,
    /// The currency.
    pub currency: Currency,
}

impl Money {
    /// Create a Money value from an amount in the smallest unit.
    pub fn new(amount_cents: i64, currency: Currency) -> Self {
        Self {
            amount_cents,
            currency,
        }
    }

    /// Create a Money value from a decimal amount.
    ///
    /// ```
    /// use checkout_core::money::{Currency, Money};
    /// let price = Money::from_decimal(10.00, Currency::USD);
    /// assert_eq!(price.amount_cents, 1000);
    /// ```
    pub fn from_decimal(amount: f64, currency: Currency) -> Self {
        let multiplier = 10_i64.pow(currency.decimal_places());
        Self::new((amount * multiplier as f64).round() as i64, currency)
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

    /// Add another value. Returns `None` on currency mismatch or overflow.
    pub fn checked_add(&self, other: &Money) -> Option<Money> {
        if self.currency != other.currency {
            return None;
        }
        self.amount_cents
            .checked_add(other.amount_cents)
            .map(|cents| Money::new(cents, self.currency))
    }

    /// Multiply by a quantity. Returns `None` on overflow.
    pub fn checked_mul(&self, factor: i64) -> Option<Money> {
        self.amount_cents
            .checked_mul(factor)
            .map(|cents| Money::new(cents, self.currency))
    }

    /// Sum an iterator of values in a single currency.
    ///
    /// Returns `None` if any value is in a different currency or the sum
    /// overflows. An empty iterator sums to zero.
    pub fn try_sum<'a>(
        iter: impl Iterator<Item = &'a Money>,
        currency: Currency,
    ) -> Option<Money> {
        let mut total = Money::zero(currency);
        for value in iter {
            total = total.checked_add(value)?;
        }
        Some(total)
    }

    /// Convert to a decimal value (display only, never for arithmetic).
    pub fn to_decimal(&self) -> f64 {
        let divisor = 10_i64.pow(self.currency.decimal_places());
        self.amount_cents as f64 / divisor as f64
    }

    /// Format as a display string (e.g., "$49.99").
    pub fn display(&self) -> String {
        let places = self.currency.decimal_places() as usize;
        format!("{}{:.places$}", self.currency.symbol(), self.to_decimal())
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_decimal() {
        let m = Money::from_decimal(49.99, Currency::USD);
        assert_eq!(m.amount_cents, 4999);

        // JPY has no decimal places
        let m = Money::from_decimal(100.0, Currency::JPY);
        assert_eq!(m.amount_cents, 100);
    }

    #[test]
    fn test_sign_checks() {
        assert!(Money::zero(Currency::USD).is_zero());
        assert!(!Money::zero(Currency::USD).is_positive());
        assert!(Money::new(1, Currency::USD).is_positive());
        assert!(!Money::new(-500, Currency::USD).is_positive());
    }

    #[test]
    fn test_checked_add() {
        let a = Money::new(1000, Currency::USD);
        let b = Money::new(500, Currency::USD);
        assert_eq!(a.checked_add(&b).unwrap().amount_cents, 1500);
    }

    #[test]
    fn test_checked_add_currency_mismatch() {
        let usd = Money::new(1000, Currency::USD);
        let eur = Money::new(1000, Currency::EUR);
        assert!(usd.checked_add(&eur).is_none());
    }

    #[test]
    fn test_checked_add_overflow() {
        let a = Money::new(i64::MAX, Currency::USD);
        let b = Money::new(1, Currency::USD);
        assert!(a.checked_add(&b).is_none());
    }

    #[test]
    fn test_checked_mul() {
        let m = Money::new(1000, Currency::USD);
        assert_eq!(m.checked_mul(3).unwrap().amount_cents, 3000);
        assert!(Money::new(i64::MAX, Currency::USD).checked_mul(2).is_none());
    }

    #[test]
    fn test_try_sum() {
        let values = [
            Money::new(2000, Currency::USD),
            Money::new(500, Currency::USD),
        ];
        let total = Money::try_sum(values.iter(), Currency::USD).unwrap();
        assert_eq!(total.amount_cents, 2500);
    }

    #[test]
    fn test_try_sum_empty_is_zero() {
        let total = Money::try_sum([].iter(), Currency::USD).unwrap();
        assert!(total.is_zero());
    }

    #[test]
    fn test_try_sum_mixed_currency() {
        let values = [
            Money::new(2000, Currency::USD),
            Money::new(500, Currency::GBP),
        ];
        assert!(Money::try_sum(values.iter(), Currency::USD).is_none());
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::new(4999, Currency::USD).display(), "$49.99");
        assert_eq!(Money::new(100, Currency::JPY).display(), "\u{00a5}100");
    }

    #[test]
    fn test_currency_from_code() {
        assert_eq!(Currency::from_code("usd"), Some(Currency::USD));
        assert_eq!(Currency::from_code("XXX"), None);
    }
}
