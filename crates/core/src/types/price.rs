//! Type-safe price representation using decimal arithmetic.
//!
//! Prices arrive from the backend either as JSON numbers (`129.5`) or as
//! strings (`"129.50"`). Both are accepted; anything else is rejected by the
//! strict [`Deserialize`] impl and mapped to `None` by [`lenient_option`].
//! Prices are always serialized back as JSON numbers, which is what the
//! write endpoints expect.

use core::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A monetary amount in the marketplace currency.
///
/// Displays with exactly two decimal places (`"19.90"`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Price(Decimal);

impl Price {
    /// Zero.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a price from a decimal amount.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Create a price from an amount in minor units (satang, cents).
    #[must_use]
    pub fn from_minor(minor: i64) -> Self {
        Self(Decimal::new(minor, 2))
    }

    /// Parse a user-entered or backend-provided amount.
    ///
    /// Surrounding whitespace and thousands separators are ignored. Returns
    /// `None` for empty or non-numeric input.
    #[must_use]
    pub fn parse(input: &str) -> Option<Self> {
        let cleaned: String = input.trim().chars().filter(|c| *c != ',').collect();
        if cleaned.is_empty() {
            return None;
        }
        Decimal::from_str(&cleaned).ok().map(Self)
    }

    /// The underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Multiply by a quantity (line totals). Saturates instead of overflowing.
    #[must_use]
    pub fn times(self, quantity: u32) -> Self {
        Self(
            self.0
                .checked_mul(Decimal::from(quantity))
                .unwrap_or_else(|| saturated(self.0)),
        )
    }

    /// Add two prices, saturating at the decimal range.
    #[must_use]
    pub fn saturating_add(self, rhs: Self) -> Self {
        Self(self.0.checked_add(rhs.0).unwrap_or_else(|| saturated(self.0)))
    }

    /// Whether the amount is strictly negative.
    #[must_use]
    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rounded = self
            .0
            .round_dp_with_strategy(2, rust_decimal::RoundingStrategy::MidpointAwayFromZero);
        write!(f, "{rounded:.2}")
    }
}

impl From<Decimal> for Price {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

impl From<i64> for Price {
    fn from(whole: i64) -> Self {
        Self(Decimal::from(whole))
    }
}

impl core::iter::Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Self::saturating_add)
    }
}

impl core::ops::Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        self.saturating_add(rhs)
    }
}

// Overflow only happens away from zero, so the sign of the left operand
// picks the bound.
fn saturated(lhs: Decimal) -> Decimal {
    if lhs.is_sign_negative() {
        Decimal::MIN
    } else {
        Decimal::MAX
    }
}

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        // Backend write endpoints take plain numbers.
        serializer.serialize_f64(self.0.to_f64().unwrap_or_default())
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        price_from_value(&value)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid price: {value}")))
    }
}

fn price_from_value(value: &serde_json::Value) -> Option<Price> {
    match value {
        serde_json::Value::Number(n) => Price::parse(&n.to_string()),
        serde_json::Value::String(s) => Price::parse(s),
        _ => None,
    }
}

/// Deserialize an optional price, mapping malformed values to `None`.
///
/// Use with `#[serde(default, deserialize_with = "lenient_option")]` on
/// document fields so a bad price never fails the whole document.
///
/// # Errors
///
/// Only fails if the underlying deserializer cannot produce any JSON value.
pub fn lenient_option<'de, D>(deserializer: D) -> Result<Option<Price>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(price_from_value))
}

/// Deserialize a price, mapping malformed or missing values to zero.
///
/// # Errors
///
/// Only fails if the underlying deserializer cannot produce any JSON value.
pub fn lenient<'de, D>(deserializer: D) -> Result<Price, D::Error>
where
    D: Deserializer<'de>,
{
    lenient_option(deserializer).map(Option::unwrap_or_default)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_display_two_decimals() {
        assert_eq!(Price::from(10).to_string(), "10.00");
        assert_eq!(Price::parse("19.9").unwrap().to_string(), "19.90");
        assert_eq!(Price::parse("0.125").unwrap().to_string(), "0.13");
        assert_eq!(Price::from_minor(4550).to_string(), "45.50");
    }

    #[test]
    fn test_parse_ignores_separators_and_whitespace() {
        assert_eq!(Price::parse(" 1,250.5 ").unwrap(), Price::parse("1250.5").unwrap());
        assert!(Price::parse("").is_none());
        assert!(Price::parse("   ").is_none());
        assert!(Price::parse("free").is_none());
    }

    #[test]
    fn test_deserialize_number_and_string() {
        let from_number: Price = serde_json::from_str("129.5").unwrap();
        let from_string: Price = serde_json::from_str("\"129.50\"").unwrap();
        assert_eq!(from_number, from_string);
        assert!(serde_json::from_str::<Price>("true").is_err());
    }

    #[test]
    fn test_serialize_as_number() {
        let json = serde_json::to_value(Price::parse("59.25").unwrap()).unwrap();
        assert_eq!(json, serde_json::json!(59.25));
    }

    #[test]
    fn test_lenient_option_degrades_to_none() {
        #[derive(Deserialize)]
        struct Doc {
            #[serde(default, deserialize_with = "lenient_option")]
            price: Option<Price>,
        }

        let doc: Doc = serde_json::from_str(r#"{"price": "n/a"}"#).unwrap();
        assert!(doc.price.is_none());
        let doc: Doc = serde_json::from_str(r#"{"price": null}"#).unwrap();
        assert!(doc.price.is_none());
        let doc: Doc = serde_json::from_str("{}").unwrap();
        assert!(doc.price.is_none());
        let doc: Doc = serde_json::from_str(r#"{"price": 12}"#).unwrap();
        assert_eq!(doc.price, Some(Price::from(12)));
    }

    #[test]
    fn test_sum_and_times() {
        let total: Price = [Price::from(2), Price::parse("3.5").unwrap()]
            .into_iter()
            .sum();
        assert_eq!(total.to_string(), "5.50");
        assert_eq!(Price::parse("2.25").unwrap().times(3).to_string(), "6.75");
    }

    #[test]
    fn test_arithmetic_saturates_instead_of_panicking() {
        let huge = Price::parse("79228162514264337593543950335").unwrap();
        assert_eq!(huge.times(2), Price::new(Decimal::MAX));
        assert_eq!(huge + huge, Price::new(Decimal::MAX));
        let total: Price = [huge, huge, Price::from(1)].into_iter().sum();
        assert_eq!(total, Price::new(Decimal::MAX));

        let negative = Price::new(Decimal::MIN);
        assert_eq!(negative.times(3), Price::new(Decimal::MIN));
    }
}
