//! Checkout Store
//!
//! Reads the data a quote needs and writes placed orders.

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use rust_decimal::Decimal;
use storefront::{
    orders::OrderDraft,
    promo_codes::{CustomerStanding, PromoCode, PromoCodeError},
    shipping::ShippingRate,
    taxes::TaxRate,
};
use tracing::{Span, info, warn};
use uuid::Uuid;

use crate::{
    database::Db,
    domain::{
        checkout::{
            StoreError,
            records::{CustomerRecord, OrderRecord, VariantRecord},
            repositories::{
                addresses::PgAddressesRepository, customers::PgCustomersRepository,
                orders::PgOrdersRepository, rates::PgRatesRepository,
                variants::PgVariantsRepository,
            },
        },
        promo_codes::{records::PromoCodeUuid, repository::PgPromoCodesRepository},
    },
};

#[automock]
#[async_trait]
pub trait CheckoutStore: Send + Sync {
    /// Variants with any of the given aliases.
    async fn find_variants(&self, aliases: &[String]) -> Result<Vec<VariantRecord>, StoreError>;

    async fn find_customer(&self, customer: Uuid) -> Result<Option<CustomerRecord>, StoreError>;

    /// Promo code by its normalised code.
    async fn find_promo_code(&self, code: &str) -> Result<Option<PromoCode>, StoreError>;

    /// Redemptions of a promo code across all customers.
    async fn promo_code_redemptions(&self, promo_code: Uuid) -> Result<u64, StoreError>;

    /// Purchase history of a customer, as far as `promo_code` needs it.
    async fn customer_standing(
        &self,
        customer: &CustomerRecord,
        promo_code: &PromoCode,
        now: Timestamp,
    ) -> Result<CustomerStanding, StoreError>;

    async fn shipping_rates(&self, method: Uuid) -> Result<Vec<ShippingRate>, StoreError>;

    /// Active tax rates for the given tax classes.
    async fn tax_rates(&self, tax_classes: &[Uuid]) -> Result<Vec<TaxRate>, StoreError>;

    /// Store the order, its lines, its addresses and its promo code usage, or nothing.
    ///
    /// Promo code limits are checked again under a row lock; a limit reached in
    /// the meantime fails with [`StoreError::Redemption`].
    async fn place_order(&self, draft: OrderDraft) -> Result<OrderRecord, StoreError>;
}

#[derive(Debug, Clone)]
pub struct PgCheckoutStore {
    db: Db,
    variants: PgVariantsRepository,
    customers: PgCustomersRepository,
    promo_codes: PgPromoCodesRepository,
    rates: PgRatesRepository,
    addresses: PgAddressesRepository,
    orders: PgOrdersRepository,
}

impl PgCheckoutStore {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            variants: PgVariantsRepository::new(),
            customers: PgCustomersRepository::new(),
            promo_codes: PgPromoCodesRepository::new(),
            rates: PgRatesRepository::new(),
            addresses: PgAddressesRepository::new(),
            orders: PgOrdersRepository::new(),
        }
    }
}

#[async_trait]
impl CheckoutStore for PgCheckoutStore {
    async fn find_variants(&self, aliases: &[String]) -> Result<Vec<VariantRecord>, StoreError> {
        let mut tx = self.db.begin().await?;

        let variants = self.variants.find_by_aliases(&mut tx, aliases).await?;

        tx.commit().await?;

        Ok(variants)
    }

    async fn find_customer(&self, customer: Uuid) -> Result<Option<CustomerRecord>, StoreError> {
        let mut tx = self.db.begin().await?;

        let customer = self.customers.find(&mut tx, customer).await?;

        tx.commit().await?;

        Ok(customer)
    }

    async fn find_promo_code(&self, code: &str) -> Result<Option<PromoCode>, StoreError> {
        let mut tx = self.db.begin().await?;

        let promo_code = self.promo_codes.find_by_code(&mut tx, code).await?;

        tx.commit().await?;

        Ok(promo_code)
    }

    async fn promo_code_redemptions(&self, promo_code: Uuid) -> Result<u64, StoreError> {
        let mut tx = self.db.begin().await?;

        let redemptions = self
            .promo_codes
            .count_redemptions(&mut tx, PromoCodeUuid::from_uuid(promo_code))
            .await?;

        tx.commit().await?;

        Ok(redemptions)
    }

    async fn customer_standing(
        &self,
        customer: &CustomerRecord,
        promo_code: &PromoCode,
        now: Timestamp,
    ) -> Result<CustomerStanding, StoreError> {
        let mut tx = self.db.begin().await?;

        let redemptions = self
            .promo_codes
            .count_customer_redemptions(
                &mut tx,
                PromoCodeUuid::from_uuid(promo_code.uuid),
                customer.uuid,
            )
            .await?;

        let recent_purchase_total = match promo_code.purchase_window_start(now) {
            Some(since) => {
                self.customers
                    .purchase_total_since(&mut tx, customer.uuid, since)
                    .await?
            }
            None => Decimal::ZERO,
        };

        let purchased_applicable_product = if promo_code.applicable_products.is_empty() {
            false
        } else {
            let products: Vec<Uuid> = promo_code.applicable_products.iter().copied().collect();

            self.customers
                .purchased_any(&mut tx, customer.uuid, &products)
                .await?
        };

        tx.commit().await?;

        Ok(CustomerStanding {
            customer: customer.uuid,
            registered_at: customer.registered_at,
            redemptions,
            recent_purchase_total,
            purchased_applicable_product,
        })
    }

    async fn shipping_rates(&self, method: Uuid) -> Result<Vec<ShippingRate>, StoreError> {
        let mut tx = self.db.begin().await?;

        let rates = self.rates.shipping_rates(&mut tx, method).await?;

        tx.commit().await?;

        Ok(rates)
    }

    async fn tax_rates(&self, tax_classes: &[Uuid]) -> Result<Vec<TaxRate>, StoreError> {
        let mut tx = self.db.begin().await?;

        let rates = self.rates.tax_rates(&mut tx, tax_classes).await?;

        tx.commit().await?;

        Ok(rates)
    }

    #[tracing::instrument(
        name = "checkout.store.place_order",
        skip(self, draft),
        fields(
            customer_uuid = ?draft.customer,
            promo_code_uuid = ?draft.promo_code,
            line_count = draft.lines.len(),
            order_uuid = tracing::field::Empty
        ),
        err
    )]
    async fn place_order(&self, draft: OrderDraft) -> Result<OrderRecord, StoreError> {
        let mut tx = self.db.begin().await?;

        let promo_code = draft.promo_code.map(PromoCodeUuid::from_uuid);

        let limits = match promo_code {
            Some(promo_code) => Some(self.promo_codes.lock(&mut tx, promo_code).await?),
            None => None,
        };

        let shipping_address = match &draft.shipping_address {
            Some(address) => Some(self.addresses.find_or_create(&mut tx, address).await?),
            None => None,
        };

        let billing_address = match &draft.billing_address {
            Some(address) => Some(self.addresses.find_or_create(&mut tx, address).await?),
            None => None,
        };

        let order = self
            .orders
            .create_order(&mut tx, &draft, shipping_address, billing_address)
            .await?;

        Span::current().record("order_uuid", tracing::field::display(order));

        self.orders.create_line_items(&mut tx, order, &draft).await?;

        if let (Some(promo_code), Some(limits)) = (promo_code, limits) {
            let recorded = self
                .promo_codes
                .record_usage(&mut tx, promo_code, draft.customer, order.into_uuid())
                .await?;

            if !recorded {
                let redemptions = self.promo_codes.count_redemptions(&mut tx, promo_code).await?;

                let reason = if limits
                    .redemption_limit
                    .is_some_and(|limit| redemptions >= u64::from(limit))
                {
                    PromoCodeError::RedemptionLimitReached
                } else {
                    PromoCodeError::CustomerUsageLimitReached
                };

                warn!(
                    redemptions,
                    redemption_limit = ?limits.redemption_limit,
                    usage_limit_per_customer = limits.usage_limit_per_customer,
                    "promo code limit reached while placing order"
                );

                tx.rollback().await?;

                return Err(StoreError::Redemption(reason));
            }
        }

        tx.commit().await?;

        info!(order_uuid = %order, "placed order");

        Ok(OrderRecord {
            uuid: order,
            shipping_address,
            billing_address,
        })
    }
}
