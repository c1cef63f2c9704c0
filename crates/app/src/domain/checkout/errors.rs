//! Checkout errors.

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use storefront::{
    discounts::DiscountError,
    pricing::QuoteError,
    prices::PriceError,
    promo_codes::PromoCodeError,
    shipping::ShippingError,
};
use thiserror::Error;
use uuid::Uuid;

/// A request the caller has to fix. Each variant belongs to one request field.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("cart has no lines")]
    EmptyCart,

    #[error("quantity for {alias:?} must be at least one")]
    InvalidQuantity { alias: String },

    #[error("quantity for variant {variant} must be at least one")]
    InvalidVariantQuantity { variant: Uuid },

    #[error("variant {alias:?} does not exist")]
    UnknownVariant { alias: String },

    #[error("unknown currency {code:?}")]
    UnknownCurrency { field: &'static str, code: String },

    #[error("variant {alias:?} is priced in {variant}, not {order}")]
    CurrencyMismatch {
        alias: String,
        variant: String,
        order: String,
    },

    #[error("customer {0} does not exist")]
    UnknownCustomer(Uuid),

    #[error("invalid discount amount {0:?}")]
    InvalidDiscountAmount(String),

    #[error("invalid shipping amount {0:?}")]
    InvalidShippingAmount(String),

    #[error("shipping rate is in {rate}, but the order is in {order}")]
    ShippingCurrencyMismatch { rate: String, order: String },

    #[error("we don't ship to this location")]
    UnreachableDestination,

    #[error("promo code {0:?} does not exist")]
    PromoCodeNotFound(String),

    #[error("{0}")]
    PromoCodeIneligible(PromoCodeError),

    #[error("order total is out of range")]
    AmountOutOfRange,
}

impl ValidationError {
    /// The request field the error is reported against.
    pub fn field(&self) -> &'static str {
        match self {
            Self::EmptyCart
            | Self::InvalidQuantity { .. }
            | Self::InvalidVariantQuantity { .. }
            | Self::UnknownVariant { .. } => "lines",
            Self::UnknownCurrency { field, .. } => *field,
            Self::CurrencyMismatch { .. } => "currency",
            Self::UnknownCustomer(_) => "customer",
            Self::InvalidDiscountAmount(_) => "custom_discount",
            Self::InvalidShippingAmount(_) => "custom_shipping",
            Self::ShippingCurrencyMismatch { .. } => "shipping_method",
            Self::UnreachableDestination => "shipping_address",
            Self::PromoCodeNotFound(_) | Self::PromoCodeIneligible(_) => "promo_code",
            Self::AmountOutOfRange => "total",
        }
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    /// A redemption limit was reached while the order was being placed.
    #[error("promo code can no longer be redeemed: {0}")]
    Redemption(PromoCodeError),

    #[error("record already exists")]
    AlreadyExists,

    #[error("record not found")]
    NotFound,

    #[error("related resource not found")]
    InvalidReference,

    #[error("missing required data")]
    MissingRequiredData,

    #[error("invalid data")]
    InvalidData,

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for StoreError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::NotFound;
        }

        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::UniqueViolation) => Self::AlreadyExists,
            Some(ErrorKind::ForeignKeyViolation) => Self::InvalidReference,
            Some(ErrorKind::NotNullViolation) => Self::MissingRequiredData,
            Some(ErrorKind::CheckViolation) => Self::InvalidData,
            _ => Self::Sql(error),
        }
    }
}

#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("no shipping rate available for the provided location")]
    NoShippingRate,

    #[error(transparent)]
    Store(StoreError),
}

impl From<StoreError> for CheckoutError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::Redemption(reason) => {
                Self::Validation(ValidationError::PromoCodeIneligible(reason))
            }
            error => Self::Store(error),
        }
    }
}

impl From<QuoteError> for CheckoutError {
    fn from(error: QuoteError) -> Self {
        let validation = match error {
            QuoteError::EmptyCart => ValidationError::EmptyCart,
            QuoteError::InvalidQuantity(variant) => {
                ValidationError::InvalidVariantQuantity { variant }
            }
            QuoteError::PromoCode(reason) => ValidationError::PromoCodeIneligible(reason),
            QuoteError::Discount(DiscountError::InvalidAmount(amount)) => {
                ValidationError::InvalidDiscountAmount(amount)
            }
            QuoteError::Shipping(ShippingError::NoRateAvailable) => return Self::NoShippingRate,
            QuoteError::Shipping(ShippingError::UnreachableDestination) => {
                ValidationError::UnreachableDestination
            }
            QuoteError::Shipping(ShippingError::InvalidAmount(amount)) => {
                ValidationError::InvalidShippingAmount(amount)
            }
            QuoteError::Shipping(ShippingError::CurrencyMismatch(rate, order)) => {
                ValidationError::ShippingCurrencyMismatch {
                    rate: rate.to_string(),
                    order: order.to_string(),
                }
            }
        };

        Self::Validation(validation)
    }
}

impl From<PriceError> for CheckoutError {
    fn from(error: PriceError) -> Self {
        match error {
            PriceError::UnknownCurrency(code) => Self::Validation(ValidationError::UnknownCurrency {
                field: "currency",
                code,
            }),
            PriceError::Overflow(_) => Self::Validation(ValidationError::AmountOutOfRange),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quote_errors_map_to_request_fields() {
        let cases = [
            (QuoteError::EmptyCart, "lines"),
            (
                QuoteError::Discount(DiscountError::InvalidAmount("x".to_string())),
                "custom_discount",
            ),
            (
                QuoteError::Shipping(ShippingError::InvalidAmount("x".to_string())),
                "custom_shipping",
            ),
            (
                QuoteError::Shipping(ShippingError::UnreachableDestination),
                "shipping_address",
            ),
            (QuoteError::PromoCode(PromoCodeError::Expired), "promo_code"),
        ];

        for (error, field) in cases {
            match CheckoutError::from(error) {
                CheckoutError::Validation(validation) => assert_eq!(validation.field(), field),
                other => panic!("expected a validation error, got {other:?}"),
            }
        }
    }

    #[test]
    fn zero_quantity_from_pricing_names_the_variant() {
        let variant = Uuid::from_u128(7);

        let validation = match CheckoutError::from(QuoteError::InvalidQuantity(variant)) {
            CheckoutError::Validation(validation) => validation,
            other => panic!("expected a validation error, got {other:?}"),
        };

        assert_eq!(validation, ValidationError::InvalidVariantQuantity { variant });
        assert_eq!(validation.field(), "lines");
        assert_eq!(
            validation.to_string(),
            format!("quantity for variant {variant} must be at least one")
        );
    }

    #[test]
    fn missing_shipping_rate_is_not_a_validation_error() {
        let error = CheckoutError::from(QuoteError::Shipping(ShippingError::NoRateAvailable));

        assert!(matches!(error, CheckoutError::NoShippingRate));
    }

    #[test]
    fn redemption_race_is_reported_against_promo_code() {
        let error = CheckoutError::from(StoreError::Redemption(
            PromoCodeError::RedemptionLimitReached,
        ));

        assert!(matches!(
            error,
            CheckoutError::Validation(ValidationError::PromoCodeIneligible(
                PromoCodeError::RedemptionLimitReached
            ))
        ));
    }

    #[test]
    fn row_not_found_is_not_found() {
        assert!(matches!(
            StoreError::from(Error::RowNotFound),
            StoreError::NotFound
        ));
    }
}
