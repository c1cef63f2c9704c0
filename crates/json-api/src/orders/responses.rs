//! Order Responses

use std::collections::BTreeMap;

use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use storefront_app::domain::checkout::models::{Estimate, PlacedOrder, TaxDetail};
use uuid::Uuid;

/// Estimate Response
///
/// Amounts are decimal strings in the store currency, except `customer_total`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub(crate) struct EstimateResponse {
    pub currency: String,
    pub customer_currency: String,
    pub subtotal: String,
    /// Units across all lines
    pub total_items: u64,
    pub discount: String,
    pub discount_percentage: String,
    pub discount_name: String,
    pub shipping_fee: String,
    pub shipping_name: String,
    pub estimated_tax: String,
    pub tax_details: Vec<TaxDetailResponse>,
    pub total: String,
    /// Total in the customer currency
    pub customer_total: String,
}

impl From<Estimate> for EstimateResponse {
    fn from(estimate: Estimate) -> Self {
        EstimateResponse {
            currency: estimate.currency,
            customer_currency: estimate.customer_currency,
            subtotal: estimate.subtotal.to_string(),
            total_items: estimate.total_items,
            discount: estimate.discount.to_string(),
            discount_percentage: estimate.discount_percentage.to_string(),
            discount_name: estimate.discount_name,
            shipping_fee: estimate.shipping_fee.to_string(),
            shipping_name: estimate.shipping_name,
            estimated_tax: estimate.estimated_tax.to_string(),
            tax_details: estimate
                .tax_details
                .into_iter()
                .map(TaxDetailResponse::from)
                .collect(),
            total: estimate.total.to_string(),
            customer_total: estimate.customer_total.to_string(),
        }
    }
}

/// Tax Detail Response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub(crate) struct TaxDetailResponse {
    /// Tax class, absent for untaxed items
    pub tax_class: Option<Uuid>,
    pub name: String,
    /// Percentage applied
    pub rate: String,
    pub amount: String,
}

impl From<TaxDetail> for TaxDetailResponse {
    fn from(detail: TaxDetail) -> Self {
        TaxDetailResponse {
            tax_class: detail.tax_class,
            name: detail.name,
            rate: detail.rate.to_string(),
            amount: detail.amount.to_string(),
        }
    }
}

/// Order Created Response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub(crate) struct OrderCreatedResponse {
    /// Created order UUID
    pub order_id: Uuid,

    #[serde(flatten)]
    pub estimate: EstimateResponse,
}

impl From<PlacedOrder> for OrderCreatedResponse {
    fn from(placed: PlacedOrder) -> Self {
        OrderCreatedResponse {
            order_id: placed.order.into_uuid(),
            estimate: placed.estimate.into(),
        }
    }
}

/// Errors Response
///
/// One message per offending request field.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub(crate) struct ErrorsResponse {
    pub errors: BTreeMap<String, String>,
}

impl ErrorsResponse {
    pub(crate) fn single(field: &str, message: impl Into<String>) -> Self {
        ErrorsResponse {
            errors: BTreeMap::from([(field.to_string(), message.into())]),
        }
    }
}
