//! Weights

use std::{fmt, str::FromStr};

use rust_decimal::Decimal;
use thiserror::Error;

/// Errors raised while reading weight units.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum WeightError {
    /// The stored unit code is not one we understand.
    #[error("unknown weight unit {0:?}")]
    UnknownUnit(String),
}

/// Units a variant weight can be recorded in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum WeightUnit {
    /// Grams
    Gram,

    /// Kilograms; shipping rates are expressed in this unit.
    #[default]
    Kilogram,

    /// Avoirdupois pounds
    Pound,

    /// Avoirdupois ounces
    Ounce,

    /// Metric tonnes
    Ton,
}

impl WeightUnit {
    /// Stored code for the unit.
    pub fn as_str(self) -> &'static str {
        match self {
            WeightUnit::Gram => "GRAM",
            WeightUnit::Kilogram => "KG",
            WeightUnit::Pound => "LB",
            WeightUnit::Ounce => "OZ",
            WeightUnit::Ton => "TON",
        }
    }

    /// Number of kilograms in one of this unit.
    pub fn kilograms(self) -> Decimal {
        match self {
            WeightUnit::Gram => Decimal::new(1, 3),
            WeightUnit::Kilogram => Decimal::ONE,
            WeightUnit::Pound => Decimal::new(45_359_237, 8),
            WeightUnit::Ounce => Decimal::new(28_349_523_125, 12),
            WeightUnit::Ton => Decimal::ONE_THOUSAND,
        }
    }
}

impl fmt::Display for WeightUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WeightUnit {
    type Err = WeightError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "GRAM" | "G" => Ok(WeightUnit::Gram),
            "KG" | "KILOGRAM" => Ok(WeightUnit::Kilogram),
            "LB" | "POUND" => Ok(WeightUnit::Pound),
            "OZ" | "OUNCE" => Ok(WeightUnit::Ounce),
            "TON" | "TONNE" => Ok(WeightUnit::Ton),
            _ => Err(WeightError::UnknownUnit(s.to_string())),
        }
    }
}

/// A weight with its unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Weight {
    value: Decimal,
    unit: WeightUnit,
}

impl Weight {
    /// Creates a new weight.
    pub fn new(value: Decimal, unit: WeightUnit) -> Self {
        Self { value, unit }
    }

    /// Creates a weight expressed in kilograms.
    pub fn kilograms(value: Decimal) -> Self {
        Self::new(value, WeightUnit::Kilogram)
    }

    /// Raw value in [`Weight::unit`].
    pub fn value(&self) -> Decimal {
        self.value
    }

    /// The unit the value is expressed in.
    pub fn unit(&self) -> WeightUnit {
        self.unit
    }

    /// The weight converted to kilograms.
    pub fn to_kilograms(&self) -> Decimal {
        self.value * self.unit.kilograms()
    }
}
