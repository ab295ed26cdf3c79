//! Fixed-point monetary amounts.
//!
//! Every balance and movement amount in the system is a `NUMERIC(20, 8)`
//! value: 20 significant digits, 8 of them fractional. All arithmetic goes
//! through this module and is exact; amounts never pass through binary
//! floats.
//!
//! At the API boundary amounts travel as JSON strings in strict decimal
//! format. JSON numbers are rejected because they bypass format validation.

use std::fmt;
use std::ops::Neg;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Fractional digits carried by every amount.
pub const FRACTIONAL_DIGITS: u32 = 8;

/// Digits allowed left of the decimal point (20 total minus 8 fractional).
const INTEGRAL_DIGITS: u32 = 12;

fn integral_limit() -> Decimal {
    Decimal::from(10_i64.pow(INTEGRAL_DIGITS))
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MoneyError {
    #[error("invalid decimal value: {0}")]
    Invalid(String),
    #[error("more than {} fractional digits", FRACTIONAL_DIGITS)]
    TooPrecise,
    #[error("amount exceeds 20 significant digits")]
    Overflow,
}

/// Exact fixed-point amount.
///
/// Construction normalizes to scale 8, so `Display` and serde produce the
/// canonical `"123.45600000"` shape. Addition and subtraction are checked
/// against the 20-digit envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, sqlx::Type)]
#[sqlx(transparent)]
pub struct Money(Decimal);

impl Money {
    pub const ZERO: Money = Money(Decimal::ZERO);

    /// Validate and normalize a raw decimal into the 20.8 envelope.
    pub fn try_from_decimal(value: Decimal) -> Result<Self, MoneyError> {
        if value.scale() > FRACTIONAL_DIGITS {
            return Err(MoneyError::TooPrecise);
        }
        let mut normalized = value;
        normalized.rescale(FRACTIONAL_DIGITS);
        if normalized.abs() >= integral_limit() {
            return Err(MoneyError::Overflow);
        }
        Ok(Money(normalized))
    }

    pub fn from_i64(value: i64) -> Result<Self, MoneyError> {
        Self::try_from_decimal(Decimal::from(value))
    }

    pub fn checked_add(self, other: Money) -> Result<Money, MoneyError> {
        let sum = self.0.checked_add(other.0).ok_or(MoneyError::Overflow)?;
        Self::try_from_decimal(sum)
    }

    pub fn checked_sub(self, other: Money) -> Result<Money, MoneyError> {
        let diff = self.0.checked_sub(other.0).ok_or(MoneyError::Overflow)?;
        Self::try_from_decimal(diff)
    }

    pub fn is_negative(self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    pub fn is_zero(self) -> bool {
        self.0.is_zero()
    }

    pub fn is_positive(self) -> bool {
        !self.0.is_zero() && !self.0.is_sign_negative()
    }

    pub fn abs(self) -> Money {
        Money(self.0.abs())
    }

    /// The inner decimal, for callers that need raw `Decimal` interop.
    pub fn inner(self) -> Decimal {
        self.0
    }
}

impl Neg for Money {
    type Output = Money;

    fn neg(self) -> Money {
        Money(-self.0)
    }
}

impl FromStr for Money {
    type Err = MoneyError;

    /// Strict decimal parse.
    ///
    /// Rejects `.5` and `5.` forms, a leading `+`, scientific notation, and
    /// anything `rust_decimal` cannot represent exactly (NaN, Infinity,
    /// non-numeric input). A leading `-` is accepted; sign rules are
    /// business validation, not format validation.
    fn from_str(s: &str) -> Result<Self, MoneyError> {
        if s.is_empty() {
            return Err(MoneyError::Invalid("empty string".to_string()));
        }
        if s.starts_with('+') {
            return Err(MoneyError::Invalid("+ prefix not allowed".to_string()));
        }
        if s.contains(['e', 'E']) {
            return Err(MoneyError::Invalid(
                "scientific notation not allowed".to_string(),
            ));
        }
        let digits = s.strip_prefix('-').unwrap_or(s);
        if digits.starts_with('.') {
            return Err(MoneyError::Invalid("use 0.5 not .5".to_string()));
        }
        if digits.ends_with('.') {
            return Err(MoneyError::Invalid("use 5.0 not 5.".to_string()));
        }
        let value = Decimal::from_str(s).map_err(|e| MoneyError::Invalid(e.to_string()))?;
        Self::try_from_decimal(value)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut canonical = self.0;
        canonical.rescale(FRACTIONAL_DIGITS);
        write!(f, "{}", canonical)
    }
}

impl Serialize for Money {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use serde::de::Error;

        // Only accept JSON strings for strict format control.
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn money(s: &str) -> Money {
        s.parse().expect("valid money literal")
    }

    #[test]
    fn test_parse_canonical_form() {
        let m = money("100.5");
        assert_eq!(m.to_string(), "100.50000000");
    }

    #[test]
    fn test_parse_preserves_eight_fractional_digits() {
        let m = money("0.00000001");
        assert_eq!(m.to_string(), "0.00000001");
        assert!(m.is_positive());
    }

    #[test]
    fn test_parse_rejects_nine_fractional_digits() {
        let result = "0.000000001".parse::<Money>();
        assert_eq!(result.unwrap_err(), MoneyError::TooPrecise);
    }

    #[test]
    fn test_parse_rejects_dot_prefix_and_suffix() {
        assert!(".5".parse::<Money>().is_err());
        assert!("5.".parse::<Money>().is_err());
        assert!("-.5".parse::<Money>().is_err());
    }

    #[test]
    fn test_parse_rejects_scientific_notation() {
        assert!("1.5e8".parse::<Money>().is_err());
        assert!("1E2".parse::<Money>().is_err());
    }

    #[test]
    fn test_parse_rejects_nan_and_infinity() {
        assert!("NaN".parse::<Money>().is_err());
        assert!("Infinity".parse::<Money>().is_err());
        assert!("-Infinity".parse::<Money>().is_err());
    }

    #[test]
    fn test_parse_rejects_empty_and_plus_prefix() {
        assert!("".parse::<Money>().is_err());
        assert!("+1".parse::<Money>().is_err());
    }

    #[test]
    fn test_twenty_digit_envelope() {
        // 12 integral digits is the boundary.
        assert!("999999999999.99999999".parse::<Money>().is_ok());
        assert_eq!(
            "1000000000000".parse::<Money>().unwrap_err(),
            MoneyError::Overflow
        );
    }

    #[test]
    fn test_checked_add_overflow() {
        let a = money("999999999999.00000000");
        let b = money("1");
        assert_eq!(a.checked_add(b).unwrap_err(), MoneyError::Overflow);
    }

    #[test]
    fn test_checked_sub_goes_negative() {
        let a = money("1");
        let b = money("2.5");
        let diff = a.checked_sub(b).unwrap();
        assert!(diff.is_negative());
        assert_eq!(diff.to_string(), "-1.50000000");
    }

    #[test]
    fn test_neg_and_abs() {
        let m = money("10.25");
        assert_eq!((-m).to_string(), "-10.25000000");
        assert_eq!((-m).abs(), m);
    }

    #[test]
    fn test_comparison_across_scales() {
        assert_eq!(money("100"), money("100.00000000"));
        assert!(money("0.00000001") > Money::ZERO);
        assert!(money("-1") < Money::ZERO);
    }

    #[test]
    fn test_zero_displays_canonically() {
        assert_eq!(Money::ZERO.to_string(), "0.00000000");
        assert!(Money::ZERO.is_zero());
        assert!(!Money::ZERO.is_negative());
    }

    #[test]
    fn test_serde_round_trip_as_string() {
        let m = money("42.00000001");
        let json = serde_json::to_string(&m).unwrap();
        assert_eq!(json, r#""42.00000001""#);
        let back: Money = serde_json::from_str(&json).unwrap();
        assert_eq!(back, m);
    }

    #[test]
    fn test_serde_rejects_json_number() {
        let result: Result<Money, _> = serde_json::from_str("1.5");
        assert!(result.is_err());
    }
}
