//! Storefront prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    addresses::{Address, AddressKind},
    discounts::{CustomAmount, Discount, DiscountCalculator, DiscountError},
    items::LineItem,
    orders::{AuthorizationStatus, ChargeStatus, OrderDraft, OrderLineDraft, OrderStatus},
    prices::{PriceError, currency},
    pricing::{PromoCodeApplication, Pricing, Quote, QuoteError, QuoteInput, QuoteLine},
    promo_codes::{
        CustomerStanding, PromoCode, PromoCodeError, PromoCodeKind, PromoCodeValidator,
    },
    shipping::{Destination, ShippingCalculator, ShippingError, ShippingFee, ShippingRate},
    taxes::{TaxCalculator, TaxLine, TaxRate, TaxSummary},
    weights::{Weight, WeightUnit},
};
