//! Storefront
//!
//! Order pricing for a storefront: promo code validation, discounts, shipping
//! fees and taxes, combined into a quote that can be turned into an order.

pub mod addresses;
pub mod discounts;
pub mod items;
pub mod orders;
pub mod prelude;
pub mod prices;
pub mod pricing;
pub mod promo_codes;
pub mod shipping;
pub mod taxes;
pub mod weights;
