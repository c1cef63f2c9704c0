//! Discounts

use std::str::FromStr;

use rust_decimal::Decimal;
use thiserror::Error;

use crate::promo_codes::{PromoCode, PromoCodeKind};

/// Label used when nothing was discounted.
pub const NO_DISCOUNT_LABEL: &str = "No Discount";

/// Label used for custom discounts supplied without a name.
pub const CUSTOM_DISCOUNT_LABEL: &str = "Custom Discount";

/// Errors specific to discount calculations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DiscountError {
    /// The custom discount amount is not a non-negative decimal.
    #[error("invalid discount amount {0:?}")]
    InvalidAmount(String),
}

/// A manually entered amount with an optional label, used for both custom
/// discounts and custom shipping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomAmount {
    /// Amount as entered; parsed when applied.
    pub price: String,

    /// Customer-facing label
    pub name: Option<String>,
}

impl CustomAmount {
    /// Creates a custom amount.
    pub fn new(price: impl Into<String>, name: Option<String>) -> Self {
        Self {
            price: price.into(),
            name,
        }
    }

    /// Parse the entered amount.
    ///
    /// Returns `None` for anything that is not a non-negative decimal.
    pub fn amount(&self) -> Option<Decimal> {
        Decimal::from_str(self.price.trim())
            .ok()
            .filter(|amount| *amount >= Decimal::ZERO)
    }

    /// The label, or `fallback` when none was supplied.
    pub fn label_or(&self, fallback: &str) -> String {
        self.name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or(fallback)
            .to_string()
    }
}

/// Computed discount.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Discount {
    /// Amount taken off the subtotal, between zero and the subtotal.
    pub amount: Decimal,

    /// Customer-facing label
    pub label: String,
}

impl Discount {
    /// No discount.
    pub fn none() -> Self {
        Self {
            amount: Decimal::ZERO,
            label: NO_DISCOUNT_LABEL.to_string(),
        }
    }

    /// Discount as a percentage of `subtotal`, zero for an empty subtotal.
    pub fn percentage_of(&self, subtotal: Decimal) -> Decimal {
        if subtotal <= Decimal::ZERO {
            return Decimal::ZERO;
        }

        (self.amount / subtotal * Decimal::ONE_HUNDRED).normalize()
    }
}

/// Computes the order discount from a promo code or a custom amount.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiscountCalculator;

impl DiscountCalculator {
    /// Creates a discount calculator.
    pub fn new() -> Self {
        Self
    }

    /// Compute the discount for `subtotal`.
    ///
    /// A promo code takes precedence over a custom discount. Either is capped at
    /// the subtotal.
    ///
    /// # Errors
    ///
    /// Returns [`DiscountError::InvalidAmount`] when the custom discount is used
    /// and its amount cannot be parsed.
    pub fn compute(
        &self,
        subtotal: Decimal,
        custom: Option<&CustomAmount>,
        promo_code: Option<&PromoCode>,
    ) -> Result<Discount, DiscountError> {
        if let Some(promo_code) = promo_code {
            return Ok(Self::promo_discount(subtotal, promo_code));
        }

        let Some(custom) = custom else {
            return Ok(Discount::none());
        };

        let amount = custom
            .amount()
            .ok_or_else(|| DiscountError::InvalidAmount(custom.price.clone()))?;

        Ok(Discount {
            amount: cap(amount, subtotal),
            label: custom.label_or(CUSTOM_DISCOUNT_LABEL),
        })
    }

    fn promo_discount(subtotal: Decimal, promo_code: &PromoCode) -> Discount {
        let (amount, label) = match promo_code.kind {
            PromoCodeKind::FixedAmount => {
                (promo_code.value, format!("Promo Code {}", promo_code.code))
            }
            PromoCodeKind::Percentage => (
                subtotal * promo_code.value / Decimal::ONE_HUNDRED,
                format!(
                    "Promo Code {} ({}%)",
                    promo_code.code,
                    promo_code.value.normalize()
                ),
            ),
        };

        Discount {
            amount: cap(amount, subtotal),
            label,
        }
    }
}

/// Clamp a discount into `0..=subtotal`.
fn cap(amount: Decimal, subtotal: Decimal) -> Decimal {
    amount.min(subtotal).max(Decimal::ZERO)
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;
    use uuid::Uuid;

    use super::*;

    fn promo(kind: PromoCodeKind, value: Decimal) -> PromoCode {
        PromoCode::new(Uuid::nil(), "save", kind, value)
    }

    #[test]
    fn no_inputs_means_no_discount() -> TestResult {
        let discount = DiscountCalculator::new().compute(Decimal::TEN, None, None)?;

        assert_eq!(discount, Discount::none());

        Ok(())
    }

    #[test]
    fn fixed_promo_code_takes_its_value() -> TestResult {
        let code = promo(PromoCodeKind::FixedAmount, Decimal::new(5, 0));

        let discount = DiscountCalculator::new().compute(Decimal::new(20, 0), None, Some(&code))?;

        assert_eq!(discount.amount, Decimal::new(5, 0));
        assert_eq!(discount.label, "Promo Code SAVE");

        Ok(())
    }

    #[test]
    fn percentage_promo_code_takes_share_of_subtotal() -> TestResult {
        let code = promo(PromoCodeKind::Percentage, Decimal::new(1000, 2));

        let discount =
            DiscountCalculator::new().compute(Decimal::new(45_50, 2), None, Some(&code))?;

        assert_eq!(discount.amount, Decimal::new(4_55, 2));
        assert_eq!(discount.label, "Promo Code SAVE (10%)");

        Ok(())
    }

    #[test]
    fn promo_code_wins_over_custom_discount() -> TestResult {
        let code = promo(PromoCodeKind::FixedAmount, Decimal::ONE);
        let custom = CustomAmount::new("3.00", Some("Staff".to_string()));

        let discount =
            DiscountCalculator::new().compute(Decimal::TEN, Some(&custom), Some(&code))?;

        assert_eq!(discount.amount, Decimal::ONE);

        Ok(())
    }

    #[test]
    fn discounts_are_capped_at_subtotal() -> TestResult {
        let calculator = DiscountCalculator::new();
        let code = promo(PromoCodeKind::FixedAmount, Decimal::new(50, 0));
        let custom = CustomAmount::new("99.99", None);

        let promo_discount = calculator.compute(Decimal::TEN, None, Some(&code))?;
        let custom_discount = calculator.compute(Decimal::TEN, Some(&custom), None)?;

        assert_eq!(promo_discount.amount, Decimal::TEN);
        assert_eq!(custom_discount.amount, Decimal::TEN);
        assert_eq!(custom_discount.label, CUSTOM_DISCOUNT_LABEL);

        Ok(())
    }

    #[test]
    fn custom_discount_uses_given_label() -> TestResult {
        let custom = CustomAmount::new(" 2.50 ", Some("Loyalty".to_string()));

        let discount = DiscountCalculator::new().compute(Decimal::TEN, Some(&custom), None)?;

        assert_eq!(discount.amount, Decimal::new(2_50, 2));
        assert_eq!(discount.label, "Loyalty");

        Ok(())
    }

    #[test]
    fn invalid_custom_discount_is_an_error() {
        let calculator = DiscountCalculator::new();

        for price in ["abc", "", "-1.00"] {
            let custom = CustomAmount::new(price, None);

            assert_eq!(
                calculator.compute(Decimal::TEN, Some(&custom), None),
                Err(DiscountError::InvalidAmount(price.to_string()))
            );
        }
    }

    #[test]
    fn discount_never_exceeds_subtotal_or_goes_negative() -> TestResult {
        let calculator = DiscountCalculator::new();

        for subtotal in [Decimal::ZERO, Decimal::new(1, 2), Decimal::new(123_45, 2)] {
            for value in [Decimal::ZERO, Decimal::new(5, 0), Decimal::ONE_HUNDRED] {
                for kind in [PromoCodeKind::FixedAmount, PromoCodeKind::Percentage] {
                    let code = promo(kind, value);
                    let discount = calculator.compute(subtotal, None, Some(&code))?;

                    assert!(discount.amount <= subtotal, "{kind} {value} on {subtotal}");
                    assert!(discount.amount >= Decimal::ZERO, "{kind} {value} on {subtotal}");
                }
            }
        }

        Ok(())
    }

    #[test]
    fn percentage_of_subtotal() {
        let discount = Discount {
            amount: Decimal::new(5, 0),
            label: String::new(),
        };

        assert_eq!(discount.percentage_of(Decimal::new(20, 0)), Decimal::new(25, 0));
        assert_eq!(discount.percentage_of(Decimal::ZERO), Decimal::ZERO);
    }
}
