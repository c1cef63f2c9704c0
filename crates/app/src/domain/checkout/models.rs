//! Checkout Models

use rust_decimal::Decimal;
use storefront::{pricing::Quote, prices::round_to_currency};
use uuid::Uuid;

use crate::domain::checkout::records::{AddressUuid, OrderUuid};

/// Tax charged for one tax class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaxDetail {
    pub tax_class: Option<Uuid>,
    pub name: String,
    pub rate: Decimal,
    pub amount: Decimal,
}

/// Priced cart, with amounts rounded to the store currency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Estimate {
    pub currency: String,
    pub customer_currency: String,
    pub subtotal: Decimal,
    pub total_items: u64,
    pub discount: Decimal,
    pub discount_percentage: Decimal,
    pub discount_name: String,
    pub shipping_fee: Decimal,
    pub shipping_name: String,
    pub estimated_tax: Decimal,
    pub tax_details: Vec<TaxDetail>,
    pub total: Decimal,
    pub customer_total: Decimal,
}

impl From<&Quote> for Estimate {
    fn from(quote: &Quote) -> Self {
        let money = |amount| round_to_currency(amount, quote.currency);

        Self {
            currency: quote.currency.iso_alpha_code.to_string(),
            customer_currency: quote.customer_currency.iso_alpha_code.to_string(),
            subtotal: money(quote.subtotal),
            total_items: quote.item_count,
            discount: money(quote.discount.amount),
            discount_percentage: quote.discount_percentage.round_dp(2),
            discount_name: quote.discount.label.clone(),
            shipping_fee: money(quote.shipping.amount),
            shipping_name: quote.shipping.label.clone(),
            estimated_tax: quote.taxes.total,
            tax_details: quote
                .taxes
                .breakdown
                .iter()
                .map(|line| TaxDetail {
                    tax_class: line.tax_class,
                    name: line.label.clone(),
                    rate: line.rate,
                    amount: line.amount,
                })
                .collect(),
            total: money(quote.total),
            customer_total: quote.customer_total(),
        }
    }
}

/// A stored order and the estimate it was placed with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacedOrder {
    pub order: OrderUuid,
    pub shipping_address: Option<AddressUuid>,
    pub billing_address: Option<AddressUuid>,
    pub estimate: Estimate,
}
