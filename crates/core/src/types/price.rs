//! Type-safe price representation using decimal arithmetic.
//!
//! Amounts are kept as [`Decimal`] so cart totals are exact; rounding to
//! two places only happens for display.

use core::fmt;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Errors raised when an amount cannot be used as a price.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The amount is below zero.
    #[error("price cannot be negative (got {0})")]
    Negative(Decimal),
    /// The amount is NaN, infinite, or outside the decimal range.
    #[error("price is not a representable number")]
    NotRepresentable,
}

/// A price with currency information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in the currency's standard unit (soles, not céntimos).
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency_code: CurrencyCode,
}

impl Price {
    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal, currency_code: CurrencyCode) -> Self {
        Self {
            amount,
            currency_code,
        }
    }

    /// A price in the store currency.
    #[must_use]
    pub fn soles(amount: Decimal) -> Self {
        Self::new(amount, CurrencyCode::PEN)
    }

    /// The amount rounded to two decimal places, midpoint away from zero.
    #[must_use]
    pub fn rounded(&self) -> Decimal {
        self.amount
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    }

    /// Amount in céntimos, rounded like [`Price::rounded`].
    ///
    /// # Errors
    ///
    /// Returns `PriceError::NotRepresentable` if the amount overflows an `i64`.
    pub fn to_cents(&self) -> Result<i64, PriceError> {
        self.rounded()
            .checked_mul(Decimal::ONE_HUNDRED)
            .and_then(|cents| i64::try_from(cents).ok())
            .ok_or(PriceError::NotRepresentable)
    }

    /// Format for display, e.g. `S/. 230.00`.
    #[must_use]
    pub fn display(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:.2}", self.currency_code.symbol(), self.rounded())
    }
}

/// ISO 4217 currency codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    /// Peruvian sol, the store currency.
    #[default]
    PEN,
}

impl CurrencyCode {
    /// Display prefix used on the site.
    #[must_use]
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::PEN => "S/.",
        }
    }
}

/// Check that an amount is usable as a price.
///
/// # Errors
///
/// Returns `PriceError::Negative` for amounts below zero.
pub fn validate_amount(amount: Decimal) -> Result<Decimal, PriceError> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(PriceError::Negative(amount));
    }
    Ok(amount)
}

/// Serde adapter writing a [`Decimal`] amount as a plain JSON number.
///
/// The persisted cart format stores prices as numbers (`150`, `79.9`), not
/// strings, so line items use `#[serde(with = "price::as_number")]`.
pub mod as_number {
    use rust_decimal::Decimal;
    use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
    use serde::{Deserialize, Deserializer, Serializer, de, ser};

    use super::{PriceError, validate_amount};

    /// Serialize the amount as an `f64`.
    ///
    /// # Errors
    ///
    /// Fails if the amount has no `f64` representation.
    pub fn serialize<S: Serializer>(amount: &Decimal, serializer: S) -> Result<S::Ok, S::Error> {
        let value = amount
            .to_f64()
            .ok_or_else(|| ser::Error::custom(PriceError::NotRepresentable))?;
        serializer.serialize_f64(value)
    }

    /// Deserialize a non-negative number into a [`Decimal`].
    ///
    /// # Errors
    ///
    /// Fails on non-numbers, non-finite values, and negative amounts.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Decimal, D::Error> {
        let value = f64::deserialize(deserializer)?;
        let amount = Decimal::from_f64(value)
            .ok_or_else(|| de::Error::custom(PriceError::NotRepresentable))?;
        validate_amount(amount).map_err(de::Error::custom)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn test_display_uses_sol_prefix_and_two_places() {
        let price = Price::soles(Decimal::from(230));
        assert_eq!(price.display(), "S/. 230.00");
    }

    #[test]
    fn test_display_rounds_midpoint_away_from_zero() {
        let price = Price::soles(Decimal::from_str("10.005").unwrap());
        assert_eq!(price.to_string(), "S/. 10.01");

        let price = Price::soles(Decimal::from_str("10.004").unwrap());
        assert_eq!(price.to_string(), "S/. 10.00");
    }

    #[test]
    fn test_to_cents() {
        let price = Price::soles(Decimal::from_str("79.905").unwrap());
        assert_eq!(price.to_cents().unwrap(), 7_991);
    }

    #[test]
    fn test_to_cents_out_of_range() {
        assert!(matches!(
            Price::soles(Decimal::MAX).to_cents(),
            Err(PriceError::NotRepresentable)
        ));
    }

    #[test]
    fn test_validate_amount() {
        assert!(validate_amount(Decimal::ZERO).is_ok());
        assert!(validate_amount(Decimal::from(80)).is_ok());
        assert!(matches!(
            validate_amount(Decimal::from(-1)),
            Err(PriceError::Negative(_))
        ));
    }

    #[test]
    fn test_currency_symbols() {
        assert_eq!(CurrencyCode::default(), CurrencyCode::PEN);
        assert_eq!(CurrencyCode::PEN.symbol(), "S/.");
    }
}
