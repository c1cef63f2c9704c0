//! Addresses

use std::{fmt, str::FromStr};

use thiserror::Error;
use uuid::Uuid;

use crate::shipping::Destination;

/// Unknown address kind
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown address kind {0:?}")]
pub struct UnknownAddressKind(pub String);

/// What an address is used for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum AddressKind {
    /// Used for both shipping and billing.
    #[default]
    ShippingAndBilling,

    /// Shipping only
    Shipping,

    /// Billing only
    Billing,
}

impl AddressKind {
    /// Stored representation
    pub fn as_str(self) -> &'static str {
        match self {
            AddressKind::ShippingAndBilling => "SHIPPING_AND_BILLING",
            AddressKind::Shipping => "SHIPPING",
            AddressKind::Billing => "BILLING",
        }
    }
}

impl fmt::Display for AddressKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AddressKind {
    type Err = UnknownAddressKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "SHIPPING_AND_BILLING" => Ok(AddressKind::ShippingAndBilling),
            "SHIPPING" => Ok(AddressKind::Shipping),
            "BILLING" => Ok(AddressKind::Billing),
            _ => Err(UnknownAddressKind(s.to_string())),
        }
    }
}

/// A postal address attached to an order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Address {
    /// Owning customer, if any.
    pub customer: Option<Uuid>,

    /// First name
    pub first_name: String,

    /// Last name
    pub last_name: String,

    /// Phone number
    pub phone_number: Option<String>,

    /// Email address
    pub email_address: Option<String>,

    /// Address kind
    pub kind: AddressKind,

    /// Street address
    pub street_address: String,

    /// City
    pub city: String,

    /// State or region
    pub state: Option<String>,

    /// Postal code; not part of the natural key.
    pub postal_code: Option<String>,

    /// Country code
    pub country: String,
}

/// The fields that identify an address. Two addresses with the same key are the same record.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AddressKey<'a> {
    /// Owning customer
    pub customer: Option<Uuid>,
    /// First name
    pub first_name: &'a str,
    /// Last name
    pub last_name: &'a str,
    /// Phone number
    pub phone_number: Option<&'a str>,
    /// Email address
    pub email_address: Option<&'a str>,
    /// Address kind
    pub kind: AddressKind,
    /// Street address
    pub street_address: &'a str,
    /// City
    pub city: &'a str,
    /// State or region
    pub state: Option<&'a str>,
    /// Country code
    pub country: &'a str,
}

impl Address {
    /// Natural key used to reuse existing address records.
    pub fn key(&self) -> AddressKey<'_> {
        AddressKey {
            customer: self.customer,
            first_name: &self.first_name,
            last_name: &self.last_name,
            phone_number: self.phone_number.as_deref(),
            email_address: self.email_address.as_deref(),
            kind: self.kind,
            street_address: &self.street_address,
            city: &self.city,
            state: self.state.as_deref(),
            country: &self.country,
        }
    }

    /// Shipping destination for this address.
    pub fn destination(&self) -> Destination {
        Destination::new(
            Some(&self.country),
            self.state.as_deref(),
            Some(&self.city),
        )
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    fn address() -> Address {
        Address {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            street_address: "1 Main St".to_string(),
            city: "Springfield".to_string(),
            state: Some("IL".to_string()),
            country: "us".to_string(),
            ..Address::default()
        }
    }

    #[test]
    fn kind_round_trips_through_storage() -> TestResult {
        for kind in [
            AddressKind::ShippingAndBilling,
            AddressKind::Shipping,
            AddressKind::Billing,
        ] {
            assert_eq!(kind.as_str().parse::<AddressKind>()?, kind);
        }

        assert!("HOME".parse::<AddressKind>().is_err());

        Ok(())
    }

    #[test]
    fn postal_code_is_not_part_of_the_key() {
        let first = address();
        let second = Address {
            postal_code: Some("62701".to_string()),
            ..address()
        };

        assert_eq!(first.key(), second.key());
    }

    #[test]
    fn kind_is_part_of_the_key() {
        let first = address();
        let second = Address {
            kind: AddressKind::Billing,
            ..address()
        };

        assert_ne!(first.key(), second.key());
    }

    #[test]
    fn destination_is_normalised() {
        assert_eq!(
            address().destination(),
            Destination::new(Some("US"), Some("il"), Some("springfield"))
        );
    }
}
