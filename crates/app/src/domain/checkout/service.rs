//! Checkout Service

use std::{collections::BTreeSet, sync::Arc};

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use rustc_hash::FxHashMap;
use storefront::{
    addresses::Address,
    items::LineItem,
    orders::OrderDraft,
    prices,
    pricing::{PromoCodeApplication, Pricing, Quote, QuoteInput},
    promo_codes::normalize_code,
    shipping::Destination,
};
use tracing::info;
use uuid::Uuid;

use crate::{
    database::Db,
    domain::checkout::{
        CheckoutError, CheckoutStore, PgCheckoutStore, ValidationError,
        data::CheckoutRequest,
        models::{Estimate, PlacedOrder},
        records::VariantRecord,
    },
};

#[derive(Clone)]
pub struct PgCheckoutService {
    store: Arc<dyn CheckoutStore>,
    pricing: Pricing,
}

impl PgCheckoutService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self::with_store(Arc::new(PgCheckoutStore::new(db)))
    }

    #[must_use]
    pub fn with_store(store: Arc<dyn CheckoutStore>) -> Self {
        Self {
            store,
            pricing: Pricing::default(),
        }
    }

    /// Load everything the request refers to and price it.
    async fn quote(
        &self,
        request: &CheckoutRequest,
        now: Timestamp,
    ) -> Result<Quote, CheckoutError> {
        let currency = prices::currency(&request.currency).map_err(|_unknown| {
            ValidationError::UnknownCurrency {
                field: "currency",
                code: request.currency.clone(),
            }
        })?;

        let customer_currency = request
            .customer_currency
            .as_deref()
            .map(|code| {
                prices::currency(code).map_err(|_unknown| ValidationError::UnknownCurrency {
                    field: "customer_currency",
                    code: code.to_string(),
                })
            })
            .transpose()?;

        if request.lines.is_empty() {
            return Err(ValidationError::EmptyCart.into());
        }

        if let Some(line) = request.lines.iter().find(|line| line.quantity == 0) {
            return Err(ValidationError::InvalidQuantity {
                alias: line.alias.clone(),
            }
            .into());
        }

        let variants = self.store.find_variants(&request.aliases()).await?;

        let by_alias: FxHashMap<&str, &VariantRecord> = variants
            .iter()
            .map(|variant| (variant.alias.as_str(), variant))
            .collect();

        let mut items: Vec<LineItem> = Vec::with_capacity(request.lines.len());

        for line in &request.lines {
            let variant =
                by_alias
                    .get(line.alias.as_str())
                    .ok_or_else(|| ValidationError::UnknownVariant {
                        alias: line.alias.clone(),
                    })?;

            if !variant
                .currency
                .trim()
                .eq_ignore_ascii_case(currency.iso_alpha_code)
            {
                return Err(ValidationError::CurrencyMismatch {
                    alias: line.alias.clone(),
                    variant: variant.currency.clone(),
                    order: currency.iso_alpha_code.to_string(),
                }
                .into());
            }

            items.push(variant.line_item(line.quantity));
        }

        let customer = match request.customer {
            Some(uuid) => Some(
                self.store
                    .find_customer(uuid)
                    .await?
                    .ok_or(ValidationError::UnknownCustomer(uuid))?,
            ),
            None => None,
        };

        let code = request
            .promo_code
            .as_deref()
            .map(normalize_code)
            .filter(|code| !code.is_empty());

        let promo_code = match code {
            Some(code) => Some(
                self.store
                    .find_promo_code(&code)
                    .await?
                    .ok_or(ValidationError::PromoCodeNotFound(code))?,
            ),
            None => None,
        };

        let (total_redemptions, standing) = match (&promo_code, &customer) {
            (Some(promo_code), customer) => {
                let total = self.store.promo_code_redemptions(promo_code.uuid).await?;

                let standing = match customer {
                    Some(customer) => Some(
                        self.store
                            .customer_standing(customer, promo_code, now)
                            .await?,
                    ),
                    None => None,
                };

                (total, standing)
            }
            (None, _) => (0, None),
        };

        let shipping_rates = match request.shipping_method {
            Some(method) => self.store.shipping_rates(method).await?,
            None => Vec::new(),
        };

        let tax_classes: Vec<Uuid> = items
            .iter()
            .filter_map(LineItem::tax_class)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let tax_rates = if tax_classes.is_empty() {
            Vec::new()
        } else {
            self.store.tax_rates(&tax_classes).await?
        };

        let destination = request
            .shipping_address
            .as_ref()
            .or(request.billing_address.as_ref())
            .map(Address::destination)
            .unwrap_or_else(Destination::default);

        let input = QuoteInput {
            items: &items,
            currency,
            customer_currency,
            destination,
            shipping_method: request.shipping_method,
            shipping_rates: &shipping_rates,
            tax_rates: &tax_rates,
            promo_code: promo_code.as_ref().map(|promo_code| PromoCodeApplication {
                promo_code,
                total_redemptions,
                customer: standing.as_ref(),
            }),
            custom_discount: request.custom_discount.as_ref(),
            custom_shipping: request.custom_shipping.as_ref(),
            now,
        };

        Ok(self.pricing.quote(&input)?)
    }
}

/// Addresses are stored against the ordering customer.
fn owned_address(address: Option<&Address>, customer: Option<Uuid>) -> Option<Address> {
    address.map(|address| Address {
        customer,
        ..address.clone()
    })
}

#[async_trait]
impl CheckoutService for PgCheckoutService {
    #[tracing::instrument(
        name = "checkout.service.estimate",
        skip(self, request),
        fields(line_count = request.lines.len(), currency = %request.currency),
        err
    )]
    async fn estimate(&self, request: CheckoutRequest) -> Result<Estimate, CheckoutError> {
        let quote = self.quote(&request, Timestamp::now()).await?;

        Ok(Estimate::from(&quote))
    }

    #[tracing::instrument(
        name = "checkout.service.create_order",
        skip(self, request),
        fields(
            line_count = request.lines.len(),
            currency = %request.currency,
            customer_uuid = ?request.customer
        ),
        err
    )]
    async fn create_order(&self, request: CheckoutRequest) -> Result<PlacedOrder, CheckoutError> {
        let quote = self.quote(&request, Timestamp::now()).await?;

        let draft = OrderDraft::from_quote(
            &quote,
            request.customer,
            owned_address(request.shipping_address.as_ref(), request.customer),
            owned_address(request.billing_address.as_ref(), request.customer),
        )?;

        let record = self.store.place_order(draft).await?;

        info!(
            order_uuid = %record.uuid,
            total = %quote.total,
            promo_code_uuid = ?quote.promo_code,
            "created order"
        );

        Ok(PlacedOrder {
            order: record.uuid,
            shipping_address: record.shipping_address,
            billing_address: record.billing_address,
            estimate: Estimate::from(&quote),
        })
    }
}

#[automock]
#[async_trait]
pub trait CheckoutService: Send + Sync {
    /// Price a cart without storing anything.
    async fn estimate(&self, request: CheckoutRequest) -> Result<Estimate, CheckoutError>;

    /// Price a cart and store it as a pending order.
    async fn create_order(&self, request: CheckoutRequest) -> Result<PlacedOrder, CheckoutError>;
}
