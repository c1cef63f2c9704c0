//! In-memory checkout store for service tests.

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use jiff::Timestamp;
use rust_decimal::Decimal;
use rustc_hash::FxHashMap;
use storefront::{
    addresses::Address,
    orders::{AuthorizationStatus, ChargeStatus, OrderDraft, OrderStatus},
    prices,
    promo_codes::{CustomerStanding, PromoCode, PromoCodeError},
    shipping::{Destination, ShippingRate},
    taxes::TaxRate,
    weights::{Weight, WeightUnit},
};
use uuid::Uuid;

use crate::domain::checkout::{
    CheckoutStore, StoreError,
    records::{AddressUuid, CustomerRecord, OrderRecord, OrderUuid, VariantRecord},
};

/// Alias of the seeded $10.00 shirt.
pub(crate) const SHIRT: &str = "shirt-m";

const STANDARD_METHOD: Uuid = Uuid::from_u128(0x5157);
const APPAREL: Uuid = Uuid::from_u128(0xa99a);

/// A customer address at the given location.
pub(crate) fn address(country: &str, state: &str, city: &str) -> Address {
    Address {
        first_name: "Grace".to_string(),
        last_name: "Hopper".to_string(),
        email_address: Some("grace@example.com".to_string()),
        street_address: "1 Harbor Way".to_string(),
        city: city.to_string(),
        state: Some(state.to_string()),
        postal_code: Some("94107".to_string()),
        country: country.to_string(),
        ..Address::default()
    }
}

struct StoredOrder {
    uuid: OrderUuid,
    created_at: Timestamp,
    draft: OrderDraft,
}

struct Usage {
    promo_code: Uuid,
    customer: Option<Uuid>,
}

#[derive(Default)]
struct State {
    variants: Vec<VariantRecord>,
    customers: FxHashMap<Uuid, CustomerRecord>,
    promo_codes: FxHashMap<String, PromoCode>,
    usages: Vec<Usage>,
    shipping_rates: Vec<ShippingRate>,
    tax_rates: Vec<TaxRate>,
    addresses: Vec<(AddressUuid, Address)>,
    orders: Vec<StoredOrder>,
}

#[derive(Default)]
pub(crate) struct InMemoryCheckoutStore {
    state: Mutex<State>,
}

impl InMemoryCheckoutStore {
    /// One weighted, taxed shirt, a US shipping rate and a 10% US sales tax.
    pub(crate) fn seeded() -> Self {
        let usd = prices::currency("USD").expect("USD is a known currency");

        let store = Self::default();

        {
            let mut state = store.state();

            state.variants.push(VariantRecord {
                uuid: Uuid::now_v7(),
                alias: SHIRT.to_string(),
                product: Uuid::now_v7(),
                price: Decimal::new(10_00, 2),
                currency: "USD".to_string(),
                weight: Some(Weight::new(Decimal::new(200, 0), WeightUnit::Gram)),
                tax_class: Some(APPAREL),
            });

            state.shipping_rates.push(ShippingRate {
                uuid: Uuid::now_v7(),
                method: STANDARD_METHOD,
                name: None,
                location: Destination::new(Some("US"), None, None),
                weight_min: Decimal::ONE,
                weight_max: Decimal::new(30, 0),
                base_rate: Decimal::new(5_00, 2),
                incremental_rate: Decimal::new(2_00, 2),
                currency: usd,
            });

            state.tax_rates.push(TaxRate {
                uuid: Uuid::now_v7(),
                tax_class: APPAREL,
                tax_class_name: "Apparel".to_string(),
                country: "US".to_string(),
                state: None,
                rate: Decimal::new(10, 0),
                active: true,
            });
        }

        store
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().expect("store lock poisoned")
    }

    pub(crate) fn standard_method(&self) -> Uuid {
        STANDARD_METHOD
    }

    pub(crate) fn variants(&self) -> Vec<VariantRecord> {
        self.state().variants.clone()
    }

    pub(crate) fn rates(&self) -> Vec<ShippingRate> {
        self.state().shipping_rates.clone()
    }

    pub(crate) fn add_promo_code(&self, promo_code: PromoCode) {
        self.state()
            .promo_codes
            .insert(promo_code.code.clone(), promo_code);
    }

    pub(crate) fn add_customer(&self, registered_at: Timestamp) -> Uuid {
        let uuid = Uuid::now_v7();

        self.state().customers.insert(
            uuid,
            CustomerRecord {
                uuid,
                registered_at,
            },
        );

        uuid
    }

    pub(crate) fn order(&self, order: OrderUuid) -> Option<OrderDraft> {
        self.state()
            .orders
            .iter()
            .find(|stored| stored.uuid == order)
            .map(|stored| stored.draft.clone())
    }

    /// Record a delivered order for `customer` placed at `created_at`.
    pub(crate) fn add_delivered_order(
        &self,
        customer: Uuid,
        customer_total: Decimal,
        created_at: Timestamp,
    ) {
        let usd = prices::currency("USD").expect("USD is a known currency");

        self.state().orders.push(StoredOrder {
            uuid: OrderUuid::new(),
            created_at,
            draft: OrderDraft {
                customer: Some(customer),
                shipping_address: None,
                billing_address: None,
                currency: usd,
                total: 0,
                customer_currency: usd,
                customer_total,
                status: OrderStatus::Delivered,
                authorization_status: AuthorizationStatus::Full,
                charge_status: ChargeStatus::Full,
                promo_code: None,
                lines: Vec::new(),
            },
        });
    }

    pub(crate) fn order_count(&self) -> usize {
        self.state().orders.len()
    }

    pub(crate) fn address_count(&self) -> usize {
        self.state().addresses.len()
    }

    pub(crate) fn redemptions(&self, promo_code: Uuid) -> u64 {
        self.state().redemptions(promo_code, None)
    }
}

impl State {
    fn redemptions(&self, promo_code: Uuid, customer: Option<Uuid>) -> u64 {
        self.usages
            .iter()
            .filter(|usage| usage.promo_code == promo_code)
            .filter(|usage| customer.is_none() || usage.customer == customer)
            .count() as u64
    }

    fn find_or_create_address(&mut self, address: &Address) -> AddressUuid {
        if let Some((uuid, _)) = self
            .addresses
            .iter()
            .find(|(_, existing)| existing.key() == address.key())
        {
            return *uuid;
        }

        let uuid = AddressUuid::new();

        self.addresses.push((uuid, address.clone()));

        uuid
    }

    fn product_of(&self, variant: Uuid) -> Option<Uuid> {
        self.variants
            .iter()
            .find(|record| record.uuid == variant)
            .map(|record| record.product)
    }
}

#[async_trait]
impl CheckoutStore for InMemoryCheckoutStore {
    async fn find_variants(&self, aliases: &[String]) -> Result<Vec<VariantRecord>, StoreError> {
        Ok(self
            .state()
            .variants
            .iter()
            .filter(|variant| aliases.contains(&variant.alias))
            .cloned()
            .collect())
    }

    async fn find_customer(&self, customer: Uuid) -> Result<Option<CustomerRecord>, StoreError> {
        Ok(self.state().customers.get(&customer).copied())
    }

    async fn find_promo_code(&self, code: &str) -> Result<Option<PromoCode>, StoreError> {
        Ok(self.state().promo_codes.get(code).cloned())
    }

    async fn promo_code_redemptions(&self, promo_code: Uuid) -> Result<u64, StoreError> {
        Ok(self.state().redemptions(promo_code, None))
    }

    async fn customer_standing(
        &self,
        customer: &CustomerRecord,
        promo_code: &PromoCode,
        now: Timestamp,
    ) -> Result<CustomerStanding, StoreError> {
        let state = self.state();

        let orders = state
            .orders
            .iter()
            .filter(|stored| stored.draft.customer == Some(customer.uuid));

        let recent_purchase_total = match promo_code.purchase_window_start(now) {
            Some(since) => orders
                .clone()
                .filter(|stored| stored.created_at >= since)
                .map(|stored| &stored.draft)
                .filter(|draft| OrderStatus::FULFILLED.contains(&draft.status))
                .map(|draft| draft.customer_total)
                .sum(),
            None => Decimal::ZERO,
        };

        let purchased_applicable_product = orders
            .map(|stored| &stored.draft)
            .filter(|draft| OrderStatus::PURCHASED.contains(&draft.status))
            .flat_map(|draft| draft.lines.iter())
            .filter_map(|line| state.product_of(line.variant))
            .any(|product| promo_code.applicable_products.contains(&product));

        Ok(CustomerStanding {
            customer: customer.uuid,
            registered_at: customer.registered_at,
            redemptions: state.redemptions(promo_code.uuid, Some(customer.uuid)),
            recent_purchase_total,
            purchased_applicable_product,
        })
    }

    async fn shipping_rates(&self, method: Uuid) -> Result<Vec<ShippingRate>, StoreError> {
        Ok(self
            .state()
            .shipping_rates
            .iter()
            .filter(|rate| rate.method == method)
            .cloned()
            .collect())
    }

    async fn tax_rates(&self, tax_classes: &[Uuid]) -> Result<Vec<TaxRate>, StoreError> {
        Ok(self
            .state()
            .tax_rates
            .iter()
            .filter(|rate| rate.active && tax_classes.contains(&rate.tax_class))
            .cloned()
            .collect())
    }

    async fn place_order(&self, draft: OrderDraft) -> Result<OrderRecord, StoreError> {
        let mut state = self.state();

        if let Some(uuid) = draft.promo_code {
            let promo_code = state
                .promo_codes
                .values()
                .find(|promo_code| promo_code.uuid == uuid)
                .ok_or(StoreError::InvalidReference)?;

            if promo_code
                .redemption_limit
                .is_some_and(|limit| state.redemptions(uuid, None) >= u64::from(limit))
            {
                return Err(StoreError::Redemption(
                    PromoCodeError::RedemptionLimitReached,
                ));
            }

            if draft.customer.is_some()
                && state.redemptions(uuid, draft.customer)
                    >= u64::from(promo_code.usage_limit_per_customer)
            {
                return Err(StoreError::Redemption(
                    PromoCodeError::CustomerUsageLimitReached,
                ));
            }
        }

        let shipping_address = draft
            .shipping_address
            .as_ref()
            .map(|address| state.find_or_create_address(address));
        let billing_address = draft
            .billing_address
            .as_ref()
            .map(|address| state.find_or_create_address(address));

        let uuid = OrderUuid::new();

        if let Some(promo_code) = draft.promo_code {
            state.usages.push(Usage {
                promo_code,
                customer: draft.customer,
            });
        }

        state.orders.push(StoredOrder {
            uuid,
            created_at: Timestamp::now(),
            draft,
        });

        Ok(OrderRecord {
            uuid,
            shipping_address,
            billing_address,
        })
    }
}
