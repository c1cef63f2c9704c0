//! Checkout Data

use storefront::{addresses::Address, discounts::CustomAmount};
use uuid::Uuid;

/// A cart line as requested, identified by variant alias.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLine {
    pub alias: String,
    pub quantity: u32,
}

/// Everything needed to price a cart or place an order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutRequest {
    pub lines: Vec<CartLine>,
    pub shipping_method: Option<Uuid>,
    pub shipping_address: Option<Address>,
    pub billing_address: Option<Address>,
    pub currency: String,
    pub customer_currency: Option<String>,
    pub customer: Option<Uuid>,
    pub promo_code: Option<String>,
    pub custom_discount: Option<CustomAmount>,
    pub custom_shipping: Option<CustomAmount>,
}

impl CheckoutRequest {
    /// Distinct variant aliases, in first-seen order.
    pub fn aliases(&self) -> Vec<String> {
        let mut aliases: Vec<String> = Vec::with_capacity(self.lines.len());

        for line in &self.lines {
            if !aliases.contains(&line.alias) {
                aliases.push(line.alias.clone());
            }
        }

        aliases
    }
}
