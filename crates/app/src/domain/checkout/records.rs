//! Checkout Records

use jiff::Timestamp;
use rust_decimal::Decimal;
use storefront::{items::LineItem, weights::Weight};
use uuid::Uuid;

use crate::uuids::TypedUuid;

/// Order UUID
pub type OrderUuid = TypedUuid<OrderRecord>;

/// Address UUID
pub type AddressUuid = TypedUuid<AddressRecord>;

/// Order Record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderRecord {
    pub uuid: OrderUuid,
    pub shipping_address: Option<AddressUuid>,
    pub billing_address: Option<AddressUuid>,
}

/// Address Record
#[derive(Debug, Clone, Copy)]
pub struct AddressRecord;

/// A purchasable product variant.
#[derive(Debug, Clone, PartialEq)]
pub struct VariantRecord {
    pub uuid: Uuid,
    pub alias: String,
    pub product: Uuid,
    pub price: Decimal,
    pub currency: String,
    pub weight: Option<Weight>,
    pub tax_class: Option<Uuid>,
}

impl VariantRecord {
    /// Cart line for `quantity` units of this variant.
    pub fn line_item(&self, quantity: u32) -> LineItem {
        let item = LineItem::new(self.uuid, self.product, quantity, self.price);

        let item = match self.weight {
            Some(weight) => item.with_weight(weight),
            None => item,
        };

        match self.tax_class {
            Some(tax_class) => item.with_tax_class(tax_class),
            None => item,
        }
    }
}

/// Customer Record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CustomerRecord {
    pub uuid: Uuid,
    pub registered_at: Timestamp,
}
