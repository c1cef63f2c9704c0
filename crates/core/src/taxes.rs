//! Taxes

use std::collections::BTreeMap;

use rust_decimal::{Decimal, RoundingStrategy};
use smallvec::SmallVec;
use uuid::Uuid;

use crate::{items::LineItem, shipping::Destination};

/// Label for classes without an applicable rate.
pub const NO_TAX_LABEL: &str = "No Tax";

/// Decimal places taxes are rounded to.
const TAX_DECIMAL_PLACES: u32 = 2;

/// A percentage rate for one tax class, scoped to a state or a whole country.
#[derive(Debug, Clone, PartialEq)]
pub struct TaxRate {
    /// Identifier
    pub uuid: Uuid,

    /// Tax class the rate applies to.
    pub tax_class: Uuid,

    /// Name of the tax class.
    pub tax_class_name: String,

    /// Country code
    pub country: String,

    /// State or region; `None` for a country-wide rate.
    pub state: Option<String>,

    /// Percentage, e.g. `8.25`.
    pub rate: Decimal,

    /// Inactive rates are ignored.
    pub active: bool,
}

impl TaxRate {
    fn in_country(&self, destination: &Destination) -> bool {
        destination
            .country()
            .is_some_and(|country| country.eq_ignore_ascii_case(self.country.trim()))
    }

    fn in_state(&self, destination: &Destination) -> bool {
        match (self.state.as_deref(), destination.region()) {
            (Some(state), Some(region)) => state.trim().eq_ignore_ascii_case(region),
            _ => false,
        }
    }
}

/// Tax for one class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaxLine {
    /// Tax class, `None` for products without one.
    pub tax_class: Option<Uuid>,

    /// Customer-facing label
    pub label: String,

    /// Percentage applied.
    pub rate: Decimal,

    /// Class subtotal after its share of the discount.
    pub taxable_amount: Decimal,

    /// Rounded tax for the class.
    pub amount: Decimal,
}

/// Tax for a whole cart.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaxSummary {
    /// Sum of the rounded class taxes.
    pub total: Decimal,

    /// Per-class taxes, ordered by class.
    pub breakdown: SmallVec<[TaxLine; 4]>,
}

/// Computes taxes per tax class.
#[derive(Debug, Clone, Copy, Default)]
pub struct TaxCalculator;

impl TaxCalculator {
    /// Creates a tax calculator.
    pub fn new() -> Self {
        Self
    }

    /// Find the rate for `tax_class` at `destination`.
    ///
    /// An active state rate wins over an active country-wide rate. State rates
    /// match on the state alone, so a destination without a country still gets one.
    pub fn rate_for<'r>(
        &self,
        tax_class: Option<Uuid>,
        destination: &Destination,
        rates: &'r [TaxRate],
    ) -> Option<&'r TaxRate> {
        let tax_class = tax_class?;

        let mut candidates = rates
            .iter()
            .filter(|rate| rate.active && rate.tax_class == tax_class);

        let state = candidates.clone().find(|rate| rate.in_state(destination));

        state.or_else(|| {
            candidates.find(|rate| rate.state.is_none() && rate.in_country(destination))
        })
    }

    /// Percentage for `tax_class` at `destination`, zero when no rate applies.
    pub fn percentage_for(
        &self,
        tax_class: Option<Uuid>,
        destination: &Destination,
        rates: &[TaxRate],
    ) -> Decimal {
        self.rate_for(tax_class, destination, rates)
            .map_or(Decimal::ZERO, |rate| rate.rate)
    }

    /// Compute the tax for `items` after `discount` has been taken off.
    ///
    /// The discount is spread over tax classes in proportion to their subtotals.
    /// Each class tax is rounded before summing.
    pub fn compute(
        &self,
        items: &[LineItem],
        discount: Decimal,
        destination: &Destination,
        rates: &[TaxRate],
    ) -> TaxSummary {
        let mut classes: BTreeMap<Option<Uuid>, Decimal> = BTreeMap::new();

        for item in items {
            *classes.entry(item.tax_class()).or_default() += item.subtotal();
        }

        let subtotal: Decimal = classes.values().copied().sum();

        let breakdown: SmallVec<[TaxLine; 4]> = classes
            .into_iter()
            .map(|(tax_class, class_subtotal)| {
                let taxable_amount = if subtotal > Decimal::ZERO {
                    class_subtotal - class_subtotal / subtotal * discount
                } else {
                    class_subtotal
                };

                let rate = self.rate_for(tax_class, destination, rates);
                let percentage = rate.map_or(Decimal::ZERO, |rate| rate.rate);

                let mut amount = (taxable_amount * percentage / Decimal::ONE_HUNDRED)
                    .round_dp_with_strategy(
                        TAX_DECIMAL_PLACES,
                        RoundingStrategy::MidpointAwayFromZero,
                    );

                amount.rescale(TAX_DECIMAL_PLACES);

                TaxLine {
                    tax_class,
                    label: rate.map_or_else(
                        || NO_TAX_LABEL.to_string(),
                        |rate| rate.tax_class_name.clone(),
                    ),
                    rate: percentage,
                    taxable_amount,
                    amount,
                }
            })
            .collect();

        TaxSummary {
            total: breakdown.iter().map(|line| line.amount).sum(),
            breakdown,
        }
    }
}
