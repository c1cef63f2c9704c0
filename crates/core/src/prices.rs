//! Prices

use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use rusty_money::{Findable, Money, iso::Currency};
use thiserror::Error;

/// Errors converting between decimal amounts and minor units.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PriceError {
    /// The ISO code does not name a known currency.
    #[error("unknown currency {0:?}")]
    UnknownCurrency(String),

    /// The amount does not fit in minor units.
    #[error("amount {0} overflows minor units")]
    Overflow(Decimal),
}

/// Look up an ISO currency by its alphabetic code, case-insensitively.
///
/// # Errors
///
/// Returns [`PriceError::UnknownCurrency`] when no currency matches.
pub fn currency(code: &str) -> Result<&'static Currency, PriceError> {
    Currency::find(&code.trim().to_ascii_uppercase())
        .ok_or_else(|| PriceError::UnknownCurrency(code.to_string()))
}

/// Rounds an amount to the currency's minor unit, half away from zero.
///
/// The result always carries the currency's scale, so `20` in USD becomes `20.00`.
pub fn round_to_currency(amount: Decimal, currency: &Currency) -> Decimal {
    let mut rounded =
        amount.round_dp_with_strategy(currency.exponent, RoundingStrategy::MidpointAwayFromZero);

    rounded.rescale(currency.exponent);

    rounded
}

/// Converts a decimal amount into money held in minor units (pence/cents).
///
/// # Errors
///
/// Returns [`PriceError::Overflow`] if the scaled amount does not fit in an `i64`.
pub fn to_money(amount: Decimal, currency: &Currency) -> Result<Money<'_, Currency>, PriceError> {
    let rounded = round_to_currency(amount, currency);

    let minor = rounded
        .checked_mul(Decimal::from(10_i64.pow(currency.exponent)))
        .and_then(|value| value.to_i64())
        .ok_or(PriceError::Overflow(amount))?;

    Ok(Money::from_minor(minor, currency))
}

#[cfg(test)]
mod tests {
    use rusty_money::iso;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn finds_currency_case_insensitively() -> TestResult {
        assert_eq!(currency("usd")?, iso::USD);
        assert_eq!(currency(" GBP ")?, iso::GBP);

        Ok(())
    }

    #[test]
    fn unknown_currency_errors() {
        assert_eq!(
            currency("XXY"),
            Err(PriceError::UnknownCurrency("XXY".to_string()))
        );
    }

    #[test]
    fn converts_to_minor_units() -> TestResult {
        let money = to_money(Decimal::new(15_005, 3), iso::USD)?;

        assert_eq!(money.to_minor_units(), 15_01);

        Ok(())
    }

    #[test]
    fn zero_exponent_currencies_keep_whole_units() -> TestResult {
        let money = to_money(Decimal::new(1_234_5, 1), iso::JPY)?;

        assert_eq!(money.to_minor_units(), 1_235);

        Ok(())
    }

    #[test]
    fn rounding_pads_to_currency_scale() {
        assert_eq!(
            round_to_currency(Decimal::new(20, 0), iso::USD).to_string(),
            "20.00"
        );
    }

    #[test]
    fn rounds_half_away_from_zero() {
        assert_eq!(
            round_to_currency(Decimal::new(2_345, 3), iso::EUR),
            Decimal::new(2_35, 2)
        );
        assert_eq!(
            round_to_currency(Decimal::new(-2_345, 3), iso::EUR),
            Decimal::new(-2_35, 2)
        );
    }
}
