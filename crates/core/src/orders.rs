//! Orders

use std::{fmt, str::FromStr};

use rust_decimal::Decimal;
use rusty_money::iso::Currency;
use thiserror::Error;
use uuid::Uuid;

use crate::{
    addresses::Address,
    pricing::Quote,
    prices::{PriceError, round_to_currency, to_money},
};

/// A stored status string did not match any variant.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown {kind} {value:?}")]
pub struct UnknownStatus {
    /// Which status enum was being parsed.
    pub kind: &'static str,

    /// The value that failed to parse.
    pub value: String,
}

macro_rules! status_enum {
    (
        $(#[$meta:meta])*
        $name:ident ($kind:literal) {
            $( $(#[$variant_meta:meta])* $variant:ident => $text:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $( $(#[$variant_meta])* $variant ),+
        }

        impl $name {
            /// Stored representation
            pub fn as_str(self) -> &'static str {
                match self {
                    $( $name::$variant => $text ),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = UnknownStatus;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $( $text => Ok($name::$variant), )+
                    _ => Err(UnknownStatus {
                        kind: $kind,
                        value: s.to_string(),
                    }),
                }
            }
        }
    };
}

status_enum! {
    /// Fulfilment status of an order.
    OrderStatus ("order status") {
        /// Placed, not yet processed.
        Pending => "PENDING",
        /// Being prepared.
        Processing => "PROCESSING",
        /// Handed to the carrier.
        Shipped => "SHIPPED",
        /// Received by the customer.
        Delivered => "DELIVERED",
        /// Cancelled
        Cancelled => "CANCELLED",
        /// Returned
        Returned => "RETURNED",
    }
}

status_enum! {
    /// How much of the order total has been authorised.
    AuthorizationStatus ("authorization status") {
        /// Nothing authorised.
        None => "NONE",
        /// Part of the total authorised.
        Partial => "PARTIAL",
        /// The full total authorised.
        Full => "FULL",
    }
}

status_enum! {
    /// How much of the order total has been charged.
    ChargeStatus ("charge status") {
        /// Nothing charged yet.
        Due => "DUE",
        /// Part of the total charged.
        Partial => "PARTIAL",
        /// The full total charged.
        Full => "FULL",
        /// More than the total charged.
        Overcharged => "OVERCHARGED",
    }
}

impl OrderStatus {
    /// Statuses whose totals count towards a customer's purchase history.
    pub const FULFILLED: [OrderStatus; 2] = [OrderStatus::Shipped, OrderStatus::Delivered];

    /// Statuses whose lines count as having bought a product.
    pub const PURCHASED: [OrderStatus; 3] = [
        OrderStatus::Pending,
        OrderStatus::Shipped,
        OrderStatus::Delivered,
    ];
}

/// One line of an order ready to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderLineDraft {
    /// Product variant
    pub variant: Uuid,

    /// Quantity
    pub quantity: u32,

    /// Unit price in the store currency.
    pub unit_price: Decimal,

    /// Line total in store currency minor units.
    pub total: i64,

    /// Line total in the customer currency.
    pub customer_total: Decimal,

    /// Tax percentage in effect when the order was placed.
    pub tax_rate: Decimal,
}

/// An order ready to be stored.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderDraft {
    /// Ordering customer
    pub customer: Option<Uuid>,

    /// Shipping address
    pub shipping_address: Option<Address>,

    /// Billing address
    pub billing_address: Option<Address>,

    /// Store currency
    pub currency: &'static Currency,

    /// Total in store currency minor units.
    pub total: i64,

    /// Customer currency
    pub customer_currency: &'static Currency,

    /// Total in the customer currency.
    pub customer_total: Decimal,

    /// Fulfilment status
    pub status: OrderStatus,

    /// Authorisation status
    pub authorization_status: AuthorizationStatus,

    /// Charge status
    pub charge_status: ChargeStatus,

    /// Applied promo code
    pub promo_code: Option<Uuid>,

    /// Lines in cart order.
    pub lines: Vec<OrderLineDraft>,
}

impl OrderDraft {
    /// Build a new pending order from a quote.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::Overflow`] if an amount does not fit in minor units.
    pub fn from_quote(
        quote: &Quote,
        customer: Option<Uuid>,
        shipping_address: Option<Address>,
        billing_address: Option<Address>,
    ) -> Result<Self, PriceError> {
        let lines = quote
            .lines
            .iter()
            .map(|line| {
                let subtotal = line.item.subtotal();

                Ok(OrderLineDraft {
                    variant: line.item.variant(),
                    quantity: line.item.quantity(),
                    unit_price: line.item.unit_price(),
                    total: to_money(subtotal, quote.currency)?.to_minor_units(),
                    customer_total: round_to_currency(subtotal, quote.customer_currency),
                    tax_rate: line.tax_rate,
                })
            })
            .collect::<Result<Vec<_>, PriceError>>()?;

        Ok(Self {
            customer,
            shipping_address,
            billing_address,
            currency: quote.currency,
            total: to_money(quote.total, quote.currency)?.to_minor_units(),
            customer_currency: quote.customer_currency,
            customer_total: quote.customer_total(),
            status: OrderStatus::Pending,
            authorization_status: AuthorizationStatus::None,
            charge_status: ChargeStatus::Due,
            promo_code: quote.promo_code,
            lines,
        })
    }
}
