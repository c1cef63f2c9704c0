//! Checkout
//!
//! Prices carts and places orders.

pub mod data;
pub mod errors;
pub mod models;
pub mod records;
pub(crate) mod repositories;
pub mod service;
pub mod store;

pub use errors::{CheckoutError, StoreError, ValidationError};
pub use service::*;
pub use store::{CheckoutStore, MockCheckoutStore, PgCheckoutStore};
