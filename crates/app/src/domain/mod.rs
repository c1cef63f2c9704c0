//! Storefront Domain Concerns

pub mod checkout;
pub mod promo_codes;
