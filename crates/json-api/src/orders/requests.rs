//! Order Requests

use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use storefront::{
    addresses::{Address, AddressKind},
    discounts::CustomAmount,
};
use storefront_app::domain::checkout::data::{CartLine, CheckoutRequest};
use uuid::Uuid;

/// Order Request
///
/// Shared by estimates and order creation.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub(crate) struct OrderRequest {
    /// Variants to buy
    pub lines: Vec<LineRequest>,

    /// Shipping method to price shipping with
    pub shipping_method: Option<Uuid>,

    /// Where the order ships to; also decides tax
    pub shipping_address: Option<AddressRequest>,

    /// Billing address, used for shipping and tax when no shipping address is given
    pub billing_address: Option<AddressRequest>,

    /// Store currency, e.g. `USD`
    pub currency: String,

    /// Currency the customer pays in; defaults to the store currency
    pub customer_currency: Option<String>,

    /// Ordering customer
    pub customer: Option<Uuid>,

    /// Promo code, case-insensitive
    pub promo_code: Option<String>,

    /// Discount used when no promo code is given
    pub custom_discount: Option<CustomAmountRequest>,

    /// Shipping fee used when no rate applies
    pub custom_shipping: Option<CustomAmountRequest>,
}

/// Order Line Request
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub(crate) struct LineRequest {
    /// Variant alias
    pub alias: String,

    /// Units to buy, at least one
    pub quantity: i64,
}

/// Address Type
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub(crate) enum AddressTypeRequest {
    #[default]
    ShippingAndBilling,
    Shipping,
    Billing,
}

impl From<AddressTypeRequest> for AddressKind {
    fn from(kind: AddressTypeRequest) -> Self {
        match kind {
            AddressTypeRequest::ShippingAndBilling => AddressKind::ShippingAndBilling,
            AddressTypeRequest::Shipping => AddressKind::Shipping,
            AddressTypeRequest::Billing => AddressKind::Billing,
        }
    }
}

/// Address Request
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub(crate) struct AddressRequest {
    pub first_name: String,
    pub last_name: String,
    pub phone_number: Option<String>,
    pub email_address: Option<String>,
    #[serde(default)]
    pub address_type: AddressTypeRequest,
    pub street_address: String,
    pub city: String,
    pub state: Option<String>,
    pub postal_code: Option<String>,
    pub country: String,
}

impl From<AddressRequest> for Address {
    fn from(request: AddressRequest) -> Self {
        Address {
            customer: None,
            first_name: request.first_name,
            last_name: request.last_name,
            phone_number: request.phone_number,
            email_address: request.email_address,
            kind: request.address_type.into(),
            street_address: request.street_address,
            city: request.city,
            state: request.state,
            postal_code: request.postal_code,
            country: request.country,
        }
    }
}

/// Custom Amount Request
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub(crate) struct CustomAmountRequest {
    /// Decimal amount as a string, e.g. `"4.99"`
    pub price: String,

    /// Customer-facing label
    pub name: Option<String>,
}

impl From<CustomAmountRequest> for CustomAmount {
    fn from(request: CustomAmountRequest) -> Self {
        CustomAmount::new(request.price, request.name)
    }
}

impl From<OrderRequest> for CheckoutRequest {
    fn from(request: OrderRequest) -> Self {
        CheckoutRequest {
            lines: request
                .lines
                .into_iter()
                .map(|line| CartLine {
                    alias: line.alias,
                    // Negative or oversized quantities are rejected as invalid downstream.
                    quantity: u32::try_from(line.quantity).unwrap_or(0),
                })
                .collect(),
            shipping_method: request.shipping_method,
            shipping_address: request.shipping_address.map(Into::into),
            billing_address: request.billing_address.map(Into::into),
            currency: request.currency,
            customer_currency: request.customer_currency,
            customer: request.customer,
            promo_code: request.promo_code,
            custom_discount: request.custom_discount.map(Into::into),
            custom_shipping: request.custom_shipping.map(Into::into),
        }
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn order_request_parse() -> TestResult {
        let json = r#"
            {
                "lines": [{ "alias": "shirt-m", "quantity": 2 }],
                "shipping_method": "019c8e08-0000-7000-8000-000000000001",
                "shipping_address": {
                    "first_name": "Grace",
                    "last_name": "Hopper",
                    "street_address": "1 Harbor Way",
                    "city": "San Francisco",
                    "state": "CA",
                    "country": "US",
                    "address_type": "SHIPPING"
                },
                "currency": "USD",
                "promo_code": "save5",
                "custom_shipping": { "price": "4.99" }
            }
        "#;

        let request: CheckoutRequest = serde_json::from_str::<OrderRequest>(json)?.into();

        let address = request.shipping_address.ok_or("missing shipping address")?;

        assert_eq!(request.lines.len(), 1);
        assert_eq!(address.kind, AddressKind::Shipping);
        assert_eq!(address.customer, None);
        assert_eq!(request.billing_address, None);
        assert_eq!(request.promo_code.as_deref(), Some("save5"));
        assert_eq!(
            request.custom_shipping,
            Some(CustomAmount::new("4.99", None))
        );

        Ok(())
    }

    #[test]
    fn address_type_defaults_to_shipping_and_billing() -> TestResult {
        let json = r#"
            {
                "first_name": "Ada",
                "last_name": "Lovelace",
                "street_address": "12 St James's Square",
                "city": "London",
                "country": "GB"
            }
        "#;

        let address: Address = serde_json::from_str::<AddressRequest>(json)?.into();

        assert_eq!(address.kind, AddressKind::ShippingAndBilling);

        Ok(())
    }

    #[test]
    fn negative_quantities_become_invalid_quantities() {
        let request = OrderRequest {
            lines: vec![LineRequest {
                alias: "shirt-m".to_string(),
                quantity: -3,
            }],
            shipping_method: None,
            shipping_address: None,
            billing_address: None,
            currency: "USD".to_string(),
            customer_currency: None,
            customer: None,
            promo_code: None,
            custom_discount: None,
            custom_shipping: None,
        };

        let request = CheckoutRequest::from(request);

        assert_eq!(request.lines.first().map(|line| line.quantity), Some(0));
    }
}
