//! Items

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::weights::Weight;

/// One product variant and quantity within a cart or order.
#[derive(Clone, Debug, PartialEq)]
pub struct LineItem {
    variant: Uuid,
    product: Uuid,
    quantity: u32,
    unit_price: Decimal,
    weight: Option<Weight>,
    tax_class: Option<Uuid>,
}

impl LineItem {
    /// Creates a new line item without weight or tax class.
    pub fn new(variant: Uuid, product: Uuid, quantity: u32, unit_price: Decimal) -> Self {
        Self {
            variant,
            product,
            quantity,
            unit_price,
            weight: None,
            tax_class: None,
        }
    }

    /// Sets the per-unit weight.
    #[must_use]
    pub fn with_weight(mut self, weight: Weight) -> Self {
        self.weight = Some(weight);
        self
    }

    /// Sets the tax class of the variant's product.
    #[must_use]
    pub fn with_tax_class(mut self, tax_class: Uuid) -> Self {
        self.tax_class = Some(tax_class);
        self
    }

    /// Variant identifier
    pub fn variant(&self) -> Uuid {
        self.variant
    }

    /// Product identifier
    pub fn product(&self) -> Uuid {
        self.product
    }

    /// Quantity ordered
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Price of one unit
    pub fn unit_price(&self) -> Decimal {
        self.unit_price
    }

    /// Per-unit weight, if the variant has one.
    pub fn weight(&self) -> Option<Weight> {
        self.weight
    }

    /// Tax class of the product, if any.
    pub fn tax_class(&self) -> Option<Uuid> {
        self.tax_class
    }

    /// Quantity multiplied by unit price.
    pub fn subtotal(&self) -> Decimal {
        Decimal::from(self.quantity) * self.unit_price
    }

    /// Quantity multiplied by unit weight, in kilograms. Weightless variants count as zero.
    pub fn total_weight_kg(&self) -> Decimal {
        self.weight
            .map_or(Decimal::ZERO, |weight| weight.to_kilograms() * Decimal::from(self.quantity))
    }
}

/// Sum of every line subtotal.
pub fn subtotal(items: &[LineItem]) -> Decimal {
    items.iter().map(LineItem::subtotal).sum()
}

/// Total number of units across all lines.
pub fn item_count(items: &[LineItem]) -> u64 {
    items.iter().map(|item| u64::from(item.quantity)).sum()
}

/// Total cart weight in kilograms.
pub fn total_weight_kg(items: &[LineItem]) -> Decimal {
    items.iter().map(LineItem::total_weight_kg).sum()
}
