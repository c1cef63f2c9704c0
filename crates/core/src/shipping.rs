//! Shipping
//!
//! Rates are scoped by location, from most to least specific: city, region,
//! country, then global. The most specific matching scope always wins.

use rust_decimal::Decimal;
use rusty_money::iso::Currency;
use thiserror::Error;
use uuid::Uuid;

use crate::discounts::CustomAmount;

/// Label for resolved rates without a name.
pub const STANDARD_SHIPPING_LABEL: &str = "Standard Shipping";

/// Label for custom shipping amounts supplied without a name.
pub const CUSTOM_SHIPPING_LABEL: &str = "Custom Shipping";

/// Label when no shipping applies.
pub const NO_SHIPPING_LABEL: &str = "No Shipping";

/// Errors while working out a shipping fee.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ShippingError {
    /// No rate covers the destination country.
    #[error("no shipping rate available for the provided location")]
    NoRateAvailable,

    /// The destination has no country and no global rate exists.
    #[error("we don't ship to this location")]
    UnreachableDestination,

    /// The custom shipping amount is not a non-negative decimal.
    #[error("invalid shipping amount {0:?}")]
    InvalidAmount(String),

    /// The resolved rate is priced in another currency (rate currency, order currency).
    #[error("shipping rate is in {0}, but the order is in {1}")]
    CurrencyMismatch(&'static str, &'static str),
}

/// Where an order is shipped. Countries are stored uppercased, regions and cities lowercased.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Destination {
    country: Option<String>,
    region: Option<String>,
    city: Option<String>,
}

impl Destination {
    /// Creates a normalised destination. Blank parts are treated as absent.
    pub fn new(country: Option<&str>, region: Option<&str>, city: Option<&str>) -> Self {
        Self {
            country: normalize(country).map(|country| country.to_uppercase()),
            region: normalize(region).map(|region| region.to_lowercase()),
            city: normalize(city).map(|city| city.to_lowercase()),
        }
    }

    /// Country code
    pub fn country(&self) -> Option<&str> {
        self.country.as_deref()
    }

    /// Region or state
    pub fn region(&self) -> Option<&str> {
        self.region.as_deref()
    }

    /// City
    pub fn city(&self) -> Option<&str> {
        self.city.as_deref()
    }
}

fn normalize(part: Option<&str>) -> Option<&str> {
    part.map(str::trim).filter(|part| !part.is_empty())
}

/// How specific a rate's location is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RateScope {
    /// Matches a single city.
    City,

    /// Matches a region within a country.
    Region,

    /// Matches a whole country.
    Country,

    /// Matches anywhere.
    Global,
}

impl RateScope {
    /// Scopes in lookup order.
    pub const PRECEDENCE: [RateScope; 4] = [
        RateScope::City,
        RateScope::Region,
        RateScope::Country,
        RateScope::Global,
    ];
}

/// Shipping Rate
#[derive(Debug, Clone, PartialEq)]
pub struct ShippingRate {
    /// Identifier
    pub uuid: Uuid,

    /// Shipping method the rate belongs to.
    pub method: Uuid,

    /// Customer-facing name
    pub name: Option<String>,

    /// Location the rate applies to.
    pub location: Destination,

    /// Weight covered by `base_rate`, in kilograms.
    pub weight_min: Decimal,

    /// Upper weight bound, in kilograms.
    pub weight_max: Decimal,

    /// Fee up to `weight_min`.
    pub base_rate: Decimal,

    /// Fee per kilogram above `weight_min`.
    pub incremental_rate: Decimal,

    /// Currency of the fees.
    pub currency: &'static Currency,
}

impl ShippingRate {
    /// Location scope implied by which parts are set.
    pub fn scope(&self) -> RateScope {
        match (
            self.location.country(),
            self.location.region(),
            self.location.city(),
        ) {
            (_, _, Some(_)) => RateScope::City,
            (_, Some(_), None) => RateScope::Region,
            (Some(_), None, None) => RateScope::Country,
            (None, None, None) => RateScope::Global,
        }
    }

    fn matches(&self, destination: &Destination) -> bool {
        let location = &self.location;

        match self.scope() {
            RateScope::City => {
                destination.city.is_some()
                    && location.city == destination.city
                    && location.region == destination.region
                    && location.country == destination.country
            }
            RateScope::Region => {
                destination.region.is_some()
                    && location.region == destination.region
                    && location.country == destination.country
            }
            RateScope::Country => {
                destination.country.is_some() && location.country == destination.country
            }
            RateScope::Global => true,
        }
    }

    /// Whether `total_weight` falls in `[weight_min, weight_max)`.
    pub fn covers(&self, total_weight: Decimal) -> bool {
        self.weight_min <= total_weight && total_weight < self.weight_max
    }

    /// Fee for a parcel of `total_weight` kilograms.
    pub fn fee(&self, total_weight: Decimal) -> Decimal {
        if total_weight <= self.weight_min {
            return self.base_rate;
        }

        self.base_rate + (total_weight - self.weight_min) * self.incremental_rate
    }

    fn label(&self) -> String {
        self.name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or(STANDARD_SHIPPING_LABEL)
            .to_string()
    }
}

/// Computed shipping fee.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShippingFee {
    /// Fee amount
    pub amount: Decimal,

    /// Customer-facing label
    pub label: String,

    /// Rate used, if one was resolved.
    pub rate: Option<Uuid>,
}

impl ShippingFee {
    fn none() -> Self {
        Self {
            amount: Decimal::ZERO,
            label: NO_SHIPPING_LABEL.to_string(),
            rate: None,
        }
    }

    fn custom(custom: &CustomAmount) -> Result<Self, ShippingError> {
        let amount = custom
            .amount()
            .ok_or_else(|| ShippingError::InvalidAmount(custom.price.clone()))?;

        Ok(Self {
            amount,
            label: custom.label_or(CUSTOM_SHIPPING_LABEL),
            rate: None,
        })
    }
}

/// Resolves shipping rates and computes fees.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShippingCalculator;

impl ShippingCalculator {
    /// Creates a shipping calculator.
    pub fn new() -> Self {
        Self
    }

    /// Find the most specific rate of `method` for `destination`.
    ///
    /// Within one scope a rate whose weight range covers `total_weight` wins. Ties,
    /// and scopes where no range covers it, go to the lowest `weight_min`, then the lowest id.
    pub fn resolve_rate<'r>(
        &self,
        rates: &'r [ShippingRate],
        method: Uuid,
        destination: &Destination,
        total_weight: Decimal,
    ) -> Option<&'r ShippingRate> {
        RateScope::PRECEDENCE.iter().find_map(|scope| {
            rates
                .iter()
                .filter(|rate| rate.method == method && rate.scope() == *scope)
                .filter(|rate| rate.matches(destination))
                .min_by(|a, b| {
                    b.covers(total_weight)
                        .cmp(&a.covers(total_weight))
                        .then_with(|| a.weight_min.cmp(&b.weight_min))
                        .then_with(|| a.uuid.cmp(&b.uuid))
                })
        })
    }

    /// Work out the shipping fee for a cart.
    ///
    /// # Errors
    ///
    /// - [`ShippingError::NoRateAvailable`]: no rate resolves, no custom amount, destination has a country.
    /// - [`ShippingError::UnreachableDestination`]: as above, but the destination has no country.
    /// - [`ShippingError::InvalidAmount`]: the custom amount cannot be parsed.
    /// - [`ShippingError::CurrencyMismatch`]: the resolved rate uses another currency.
    pub fn fee(
        &self,
        rates: &[ShippingRate],
        method: Option<Uuid>,
        destination: &Destination,
        total_weight: Decimal,
        custom: Option<&CustomAmount>,
        currency: &'static Currency,
    ) -> Result<ShippingFee, ShippingError> {
        let Some(method) = method else {
            return custom.map_or_else(|| Ok(ShippingFee::none()), ShippingFee::custom);
        };

        if let Some(rate) = self.resolve_rate(rates, method, destination, total_weight) {
            if rate.currency != currency {
                return Err(ShippingError::CurrencyMismatch(
                    rate.currency.iso_alpha_code,
                    currency.iso_alpha_code,
                ));
            }

            return Ok(ShippingFee {
                amount: rate.fee(total_weight),
                label: rate.label(),
                rate: Some(rate.uuid),
            });
        }

        if let Some(custom) = custom {
            return ShippingFee::custom(custom);
        }

        if destination.country.is_some() {
            Err(ShippingError::NoRateAvailable)
        } else {
            Err(ShippingError::UnreachableDestination)
        }
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso;
    use testresult::TestResult;

    use super::*;

    const METHOD: Uuid = Uuid::from_u128(100);

    fn rate(id: u128, country: Option<&str>, region: Option<&str>, city: Option<&str>) -> ShippingRate {
        ShippingRate {
            uuid: Uuid::from_u128(id),
            method: METHOD,
            name: None,
            location: Destination::new(country, region, city),
            weight_min: Decimal::TWO,
            weight_max: Decimal::new(10, 0),
            base_rate: Decimal::new(5, 0),
            incremental_rate: Decimal::new(150, 2),
            currency: iso::USD,
        }
    }

    fn all_scopes() -> Vec<ShippingRate> {
        vec![
            rate(4, None, None, None),
            rate(3, Some("us"), None, None),
            rate(2, Some("US"), Some("California"), None),
            rate(1, Some("US"), Some("california"), Some("San Francisco")),
        ]
    }

    #[test]
    fn scope_follows_set_parts() {
        let rates = all_scopes();
        let scopes: Vec<RateScope> = rates.iter().map(ShippingRate::scope).collect();

        assert_eq!(
            scopes,
            [
                RateScope::Global,
                RateScope::Country,
                RateScope::Region,
                RateScope::City
            ]
        );
    }

    #[test]
    fn city_rate_wins_over_everything_else() {
        let rates = all_scopes();
        let destination = Destination::new(Some("us"), Some("CALIFORNIA"), Some("san francisco"));

        let resolved =
            ShippingCalculator::new().resolve_rate(&rates, METHOD, &destination, Decimal::new(3, 0));

        assert_eq!(resolved.map(|rate| rate.uuid), Some(Uuid::from_u128(1)));
    }

    #[test]
    fn falls_back_through_region_country_and_global() {
        let calculator = ShippingCalculator::new();
        let rates = all_scopes();

        let region = Destination::new(Some("US"), Some("California"), Some("Los Angeles"));
        let country = Destination::new(Some("US"), Some("Oregon"), None);
        let global = Destination::new(Some("DE"), None, Some("Berlin"));

        let resolve = |destination: &Destination| {
            calculator
                .resolve_rate(&rates, METHOD, destination, Decimal::new(3, 0))
                .map(|rate| rate.uuid.as_u128())
        };

        assert_eq!(resolve(&region), Some(2));
        assert_eq!(resolve(&country), Some(3));
        assert_eq!(resolve(&global), Some(4));
    }

    #[test]
    fn other_methods_are_ignored() {
        let mut other = rate(1, Some("US"), None, None);
        other.method = Uuid::from_u128(200);

        let rates = [other];
        let resolved = ShippingCalculator::new().resolve_rate(
            &rates,
            METHOD,
            &Destination::new(Some("US"), None, None),
            Decimal::new(3, 0),
        );

        assert!(resolved.is_none());
    }

    #[test]
    fn resolution_is_deterministic_within_a_scope() {
        let mut heavy = rate(1, Some("US"), None, None);
        heavy.weight_min = Decimal::new(5, 0);
        let light_b = rate(3, Some("US"), None, None);
        let light_a = rate(2, Some("US"), None, None);

        let rates = [heavy, light_b, light_a];
        let destination = Destination::new(Some("US"), None, None);

        let resolved =
            ShippingCalculator::new().resolve_rate(&rates, METHOD, &destination, Decimal::new(3, 0));

        assert_eq!(resolved.map(|rate| rate.uuid.as_u128()), Some(2));
    }

    fn weight_tiers() -> [ShippingRate; 2] {
        let mut light = rate(1, Some("US"), None, None);
        light.weight_min = Decimal::ZERO;
        light.weight_max = Decimal::TWO;
        light.base_rate = Decimal::new(5, 0);
        light.incremental_rate = Decimal::new(10, 0);

        let mut heavy = rate(2, Some("US"), None, None);
        heavy.weight_min = Decimal::TWO;
        heavy.weight_max = Decimal::new(10, 0);
        heavy.base_rate = Decimal::new(12, 0);
        heavy.incremental_rate = Decimal::new(10, 0);

        [light, heavy]
    }

    #[test]
    fn weight_tier_covering_the_cart_wins() -> TestResult {
        let rates = weight_tiers();
        let destination = Destination::new(Some("US"), None, None);

        let fee = ShippingCalculator::new().fee(
            &rates,
            Some(METHOD),
            &destination,
            Decimal::new(5, 0),
            None,
            iso::USD,
        )?;

        assert_eq!(fee.rate, Some(Uuid::from_u128(2)));
        assert_eq!(fee.amount, Decimal::new(42, 0));

        Ok(())
    }

    #[test]
    fn weight_range_excludes_its_upper_bound() {
        let rates = weight_tiers();
        let destination = Destination::new(Some("US"), None, None);
        let calculator = ShippingCalculator::new();

        let resolve = |weight: Decimal| {
            calculator
                .resolve_rate(&rates, METHOD, &destination, weight)
                .map(|rate| rate.uuid.as_u128())
        };

        assert_eq!(resolve(Decimal::ONE), Some(1));
        assert_eq!(resolve(Decimal::TWO), Some(2));
    }

    #[test]
    fn lowest_tier_is_used_when_no_range_covers_the_weight() {
        let rates = weight_tiers();

        let resolved = ShippingCalculator::new().resolve_rate(
            &rates,
            METHOD,
            &Destination::new(Some("US"), None, None),
            Decimal::new(50, 0),
        );

        assert_eq!(resolved.map(|rate| rate.uuid.as_u128()), Some(1));
    }

    #[test]
    fn fee_uses_base_rate_up_to_weight_min() {
        let rate = rate(1, None, None, None);

        assert_eq!(rate.fee(Decimal::ONE), Decimal::new(5, 0));
        assert_eq!(rate.fee(Decimal::TWO), Decimal::new(5, 0));
    }

    #[test]
    fn fee_adds_incremental_rate_beyond_weight_min() {
        let rate = rate(1, None, None, None);

        assert_eq!(rate.fee(Decimal::new(45, 1)), Decimal::new(8_75, 2));
    }

    #[test]
    fn fee_reports_label_and_rate() -> TestResult {
        let mut named = rate(1, Some("US"), None, None);
        named.name = Some("Express".to_string());

        let fee = ShippingCalculator::new().fee(
            &[named],
            Some(METHOD),
            &Destination::new(Some("US"), None, None),
            Decimal::ONE,
            None,
            iso::USD,
        )?;

        assert_eq!(fee.amount, Decimal::new(5, 0));
        assert_eq!(fee.label, "Express");
        assert_eq!(fee.rate, Some(Uuid::from_u128(1)));

        Ok(())
    }

    #[test]
    fn unconfigured_country_without_custom_amount_fails() {
        let rates = [rate(1, Some("US"), None, None)];

        let result = ShippingCalculator::new().fee(
            &rates,
            Some(METHOD),
            &Destination::new(Some("FR"), None, None),
            Decimal::ONE,
            None,
            iso::USD,
        );

        assert_eq!(result, Err(ShippingError::NoRateAvailable));
    }

    #[test]
    fn missing_country_without_global_rate_is_unreachable() {
        let rates = [rate(1, Some("US"), None, None)];

        let result = ShippingCalculator::new().fee(
            &rates,
            Some(METHOD),
            &Destination::default(),
            Decimal::ONE,
            None,
            iso::USD,
        );

        assert_eq!(result, Err(ShippingError::UnreachableDestination));
    }

    #[test]
    fn missing_country_uses_global_rate() -> TestResult {
        let rates = [rate(1, Some("US"), None, None), rate(2, None, None, None)];

        let fee = ShippingCalculator::new().fee(
            &rates,
            Some(METHOD),
            &Destination::default(),
            Decimal::ONE,
            None,
            iso::USD,
        )?;

        assert_eq!(fee.rate, Some(Uuid::from_u128(2)));

        Ok(())
    }

    #[test]
    fn custom_amount_covers_missing_rate() -> TestResult {
        let custom = CustomAmount::new("7.50", Some("Courier".to_string()));

        let fee = ShippingCalculator::new().fee(
            &[],
            Some(METHOD),
            &Destination::new(Some("FR"), None, None),
            Decimal::ONE,
            Some(&custom),
            iso::USD,
        )?;

        assert_eq!(fee.amount, Decimal::new(7_50, 2));
        assert_eq!(fee.label, "Courier");

        Ok(())
    }

    #[test]
    fn no_method_means_custom_amount_or_free() -> TestResult {
        let calculator = ShippingCalculator::new();
        let destination = Destination::new(Some("US"), None, None);
        let custom = CustomAmount::new("3", None);

        let free = calculator.fee(&[], None, &destination, Decimal::ONE, None, iso::USD)?;
        let custom = calculator.fee(
            &[],
            None,
            &destination,
            Decimal::ONE,
            Some(&custom),
            iso::USD,
        )?;

        assert_eq!(free.amount, Decimal::ZERO);
        assert_eq!(free.label, NO_SHIPPING_LABEL);
        assert_eq!(custom.amount, Decimal::new(3, 0));
        assert_eq!(custom.label, CUSTOM_SHIPPING_LABEL);

        Ok(())
    }

    #[test]
    fn invalid_custom_amount_is_rejected() {
        let custom = CustomAmount::new("free", None);

        let result = ShippingCalculator::new().fee(
            &[],
            None,
            &Destination::default(),
            Decimal::ONE,
            Some(&custom),
            iso::USD,
        );

        assert_eq!(result, Err(ShippingError::InvalidAmount("free".to_string())));
    }

    #[test]
    fn rate_in_other_currency_is_rejected() {
        let rates = [rate(1, None, None, None)];

        let result = ShippingCalculator::new().fee(
            &rates,
            Some(METHOD),
            &Destination::default(),
            Decimal::ONE,
            None,
            iso::GBP,
        );

        assert_eq!(result, Err(ShippingError::CurrencyMismatch("USD", "GBP")));
    }
}
