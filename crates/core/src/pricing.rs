//! Pricing
//!
//! Runs a cart through promo code validation, discount, shipping and tax to
//! produce a [`Quote`].

use jiff::Timestamp;
use rust_decimal::Decimal;
use rusty_money::iso::Currency;
use thiserror::Error;
use uuid::Uuid;

use crate::{
    discounts::{CustomAmount, Discount, DiscountCalculator, DiscountError},
    items::{self, LineItem},
    prices::round_to_currency,
    promo_codes::{CustomerStanding, PromoCode, PromoCodeError, PromoCodeValidator},
    shipping::{Destination, ShippingCalculator, ShippingError, ShippingFee, ShippingRate},
    taxes::{TaxCalculator, TaxRate, TaxSummary},
};

/// Errors that stop a quote from being produced.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum QuoteError {
    /// The cart has no lines.
    #[error("cart is empty")]
    EmptyCart,

    /// A line has a zero quantity.
    #[error("quantity of variant {0} must be at least one")]
    InvalidQuantity(Uuid),

    /// The promo code cannot be applied.
    #[error(transparent)]
    PromoCode(#[from] PromoCodeError),

    /// Discount error
    #[error(transparent)]
    Discount(#[from] DiscountError),

    /// Shipping error
    #[error(transparent)]
    Shipping(#[from] ShippingError),
}

/// A promo code together with the redemption data needed to validate it.
#[derive(Debug, Clone, Copy)]
pub struct PromoCodeApplication<'a> {
    /// The code being applied.
    pub promo_code: &'a PromoCode,

    /// Redemptions across all customers.
    pub total_redemptions: u64,

    /// Standing of the ordering customer, if known.
    pub customer: Option<&'a CustomerStanding>,
}

/// Everything a quote is computed from.
#[derive(Debug, Clone)]
pub struct QuoteInput<'a> {
    /// Cart lines
    pub items: &'a [LineItem],

    /// Store currency every amount is in.
    pub currency: &'static Currency,

    /// Currency the customer sees; defaults to the store currency.
    pub customer_currency: Option<&'static Currency>,

    /// Where the cart ships to; also decides tax.
    pub destination: Destination,

    /// Selected shipping method.
    pub shipping_method: Option<Uuid>,

    /// Candidate shipping rates for the method.
    pub shipping_rates: &'a [ShippingRate],

    /// Candidate tax rates.
    pub tax_rates: &'a [TaxRate],

    /// Promo code to validate and apply.
    pub promo_code: Option<PromoCodeApplication<'a>>,

    /// Manually entered discount.
    pub custom_discount: Option<&'a CustomAmount>,

    /// Manually entered shipping fee.
    pub custom_shipping: Option<&'a CustomAmount>,

    /// Time promo codes are validated at.
    pub now: Timestamp,
}

/// A priced cart line.
#[derive(Debug, Clone, PartialEq)]
pub struct QuoteLine {
    /// The cart line.
    pub item: LineItem,

    /// Tax percentage in effect for the line.
    pub tax_rate: Decimal,
}

/// The priced breakdown of a cart.
#[derive(Debug, Clone, PartialEq)]
pub struct Quote {
    /// Store currency
    pub currency: &'static Currency,

    /// Customer-facing currency
    pub customer_currency: &'static Currency,

    /// Priced lines in cart order.
    pub lines: Vec<QuoteLine>,

    /// Sum of line subtotals.
    pub subtotal: Decimal,

    /// Number of units.
    pub item_count: u64,

    /// Total weight in kilograms.
    pub total_weight: Decimal,

    /// Applied promo code.
    pub promo_code: Option<Uuid>,

    /// Discount
    pub discount: Discount,

    /// Discount as a percentage of the subtotal.
    pub discount_percentage: Decimal,

    /// Shipping
    pub shipping: ShippingFee,

    /// Taxes
    pub taxes: TaxSummary,

    /// Subtotal less discount plus shipping and tax.
    pub total: Decimal,
}

impl Quote {
    /// Total rounded to the customer currency.
    pub fn customer_total(&self) -> Decimal {
        round_to_currency(self.total, self.customer_currency)
    }
}

/// The order-pricing pipeline, one calculator per stage.
#[derive(Debug, Clone, Copy, Default)]
pub struct Pricing {
    /// Promo code stage
    pub promo_codes: PromoCodeValidator,

    /// Discount stage
    pub discounts: DiscountCalculator,

    /// Shipping stage
    pub shipping: ShippingCalculator,

    /// Tax stage
    pub taxes: TaxCalculator,
}

impl Pricing {
    /// Price a cart.
    ///
    /// # Errors
    ///
    /// Returns a [`QuoteError`] for the first stage that fails.
    pub fn quote(&self, input: &QuoteInput<'_>) -> Result<Quote, QuoteError> {
        if input.items.is_empty() {
            return Err(QuoteError::EmptyCart);
        }

        if let Some(item) = input.items.iter().find(|item| item.quantity() == 0) {
            return Err(QuoteError::InvalidQuantity(item.variant()));
        }

        let promo_code = match input.promo_code {
            Some(application) => {
                self.promo_codes.check(
                    application.promo_code,
                    application.total_redemptions,
                    application.customer,
                    input.now,
                )?;

                Some(application.promo_code)
            }
            None => None,
        };

        let subtotal = items::subtotal(input.items);
        let total_weight = items::total_weight_kg(input.items);

        let discount = self
            .discounts
            .compute(subtotal, input.custom_discount, promo_code)?;

        let shipping = self.shipping.fee(
            input.shipping_rates,
            input.shipping_method,
            &input.destination,
            total_weight,
            input.custom_shipping,
            input.currency,
        )?;

        let taxes = self.taxes.compute(
            input.items,
            discount.amount,
            &input.destination,
            input.tax_rates,
        );

        let lines = input
            .items
            .iter()
            .map(|item| QuoteLine {
                tax_rate: self.taxes.percentage_for(
                    item.tax_class(),
                    &input.destination,
                    input.tax_rates,
                ),
                item: item.clone(),
            })
            .collect();

        let total = subtotal - discount.amount + shipping.amount + taxes.total;

        Ok(Quote {
            currency: input.currency,
            customer_currency: input.customer_currency.unwrap_or(input.currency),
            lines,
            subtotal,
            item_count: items::item_count(input.items),
            total_weight,
            promo_code: promo_code.map(|promo_code| promo_code.uuid),
            discount_percentage: discount.percentage_of(subtotal),
            discount,
            shipping,
            taxes,
            total,
        })
    }
}
