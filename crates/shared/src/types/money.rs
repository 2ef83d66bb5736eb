//! Money helpers with decimal precision.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! All amounts are `rust_decimal::Decimal`; derived tax and totals are
//! rounded to two decimal places and every "is balanced / is zero" check in
//! the ledger uses the same absolute tolerance.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Absolute tolerance for balance and zero checks (0.01).
pub const BALANCE_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Rounds a derived money amount to two decimal places, half away from zero.
#[must_use]
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Returns true if `amount` is within the balance tolerance of zero.
#[must_use]
pub fn is_effectively_zero(amount: Decimal) -> bool {
    amount.abs() < BALANCE_TOLERANCE
}

/// Returns true if two amounts differ by less than the balance tolerance.
#[must_use]
pub fn amounts_match(a: Decimal, b: Decimal) -> bool {
    is_effectively_zero(a - b)
}

/// ISO 4217 currency code (three uppercase ASCII letters).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CurrencyCode(String);

impl CurrencyCode {
    /// Currency used when an account, customer or supplier does not specify one.
    pub const DEFAULT: &'static str = "MUR";

    /// Returns the code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parses `code` or falls back to [`CurrencyCode::DEFAULT`] when absent.
    ///
    /// # Errors
    ///
    /// Returns an error if a code is given but is not three ASCII letters.
    pub fn or_default(code: Option<&str>) -> Result<Self, String> {
        code.map_or_else(|| Ok(Self::default()), str::parse)
    }
}

impl Default for CurrencyCode {
    fn default() -> Self {
        Self(Self::DEFAULT.to_string())
    }
}

impl std::fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for CurrencyCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.len() == 3 && trimmed.chars().all(|c| c.is_ascii_alphabetic()) {
            Ok(Self(trimmed.to_ascii_uppercase()))
        } else {
            Err(format!("Unknown currency: {s}"))
        }
    }
}

impl TryFrom<String> for CurrencyCode {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CurrencyCode> for String {
    fn from(value: CurrencyCode) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[test]
    fn test_tolerance_value() {
        assert_eq!(BALANCE_TOLERANCE, dec!(0.01));
    }

    #[rstest]
    #[case(dec!(10.005), dec!(10.01))]
    #[case(dec!(10.004), dec!(10.00))]
    #[case(dec!(-10.005), dec!(-10.01))]
    #[case(dec!(15), dec!(15))]
    fn test_round_money(#[case] input: Decimal, #[case] expected: Decimal) {
        assert_eq!(round_money(input), expected);
    }

    #[rstest]
    #[case(dec!(0), true)]
    #[case(dec!(0.009), true)]
    #[case(dec!(-0.009), true)]
    #[case(dec!(0.01), false)]
    #[case(dec!(-50), false)]
    fn test_is_effectively_zero(#[case] amount: Decimal, #[case] expected: bool) {
        assert_eq!(is_effectively_zero(amount), expected);
    }

    #[test]
    fn test_amounts_match() {
        assert!(amounts_match(dec!(100.00), dec!(100.005)));
        assert!(!amounts_match(dec!(100), dec!(90)));
    }

    #[test]
    fn test_currency_parsing() {
        assert_eq!("usd".parse::<CurrencyCode>().unwrap().as_str(), "USD");
        assert!("US".parse::<CurrencyCode>().is_err());
        assert!("U$D".parse::<CurrencyCode>().is_err());
        assert_eq!(CurrencyCode::default().as_str(), "MUR");
        assert_eq!(CurrencyCode::or_default(None).unwrap().as_str(), "MUR");
        assert_eq!(CurrencyCode::or_default(Some("eur")).unwrap().to_string(), "EUR");
    }
}
