//! Test helpers.

use std::sync::Arc;

use rust_decimal::Decimal;
use salvo::{affix_state::inject, prelude::*};
use storefront_app::{
    context::AppContext,
    domain::checkout::{
        MockCheckoutService,
        models::{Estimate, TaxDetail},
    },
};
use uuid::Uuid;

use crate::state::State;

pub(crate) fn state_with_checkout(checkout: MockCheckoutService) -> Arc<State> {
    State::from_app_context(AppContext {
        checkout: Arc::new(checkout),
    })
}

pub(crate) fn orders_service(checkout: MockCheckoutService, route: Router) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(state_with_checkout(checkout)))
            .push(route),
    )
}

/// Two $10 items, $5 off, $5 shipping and 10% tax on the discounted subtotal.
pub(crate) fn make_estimate() -> Estimate {
    Estimate {
        currency: "USD".to_string(),
        customer_currency: "USD".to_string(),
        subtotal: Decimal::new(20_00, 2),
        total_items: 2,
        discount: Decimal::new(5_00, 2),
        discount_percentage: Decimal::new(25, 0),
        discount_name: "Promo Code FIVE".to_string(),
        shipping_fee: Decimal::new(5_00, 2),
        shipping_name: "Standard Shipping".to_string(),
        estimated_tax: Decimal::new(1_50, 2),
        tax_details: vec![TaxDetail {
            tax_class: Some(Uuid::nil()),
            name: "Apparel".to_string(),
            rate: Decimal::new(10, 0),
            amount: Decimal::new(1_50, 2),
        }],
        total: Decimal::new(21_50, 2),
        customer_total: Decimal::new(21_50, 2),
    }
}
