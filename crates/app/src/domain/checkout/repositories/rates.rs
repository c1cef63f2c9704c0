//! Shipping & Tax Rates Repository

use sqlx::{Postgres, Row, Transaction, postgres::PgRow, query};
use storefront::{
    prices,
    shipping::{Destination, ShippingRate},
    taxes::TaxRate,
};
use uuid::Uuid;

use super::decode_error;

const LIST_SHIPPING_RATES_SQL: &str = include_str!("../sql/list_shipping_rates.sql");
const LIST_TAX_RATES_SQL: &str = include_str!("../sql/list_tax_rates.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgRatesRepository;

impl PgRatesRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn shipping_rates(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        method: Uuid,
    ) -> Result<Vec<ShippingRate>, sqlx::Error> {
        let rows = query(LIST_SHIPPING_RATES_SQL)
            .bind(method)
            .fetch_all(&mut **tx)
            .await?;

        rows.iter().map(shipping_rate_from_row).collect()
    }

    pub(crate) async fn tax_rates(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        tax_classes: &[Uuid],
    ) -> Result<Vec<TaxRate>, sqlx::Error> {
        let rows = query(LIST_TAX_RATES_SQL)
            .bind(tax_classes)
            .fetch_all(&mut **tx)
            .await?;

        rows.iter().map(tax_rate_from_row).collect()
    }
}

fn shipping_rate_from_row(row: &PgRow) -> Result<ShippingRate, sqlx::Error> {
    let currency: String = row.try_get("currency")?;
    let country: Option<String> = row.try_get("country")?;
    let region: Option<String> = row.try_get("region")?;
    let city: Option<String> = row.try_get("city")?;

    Ok(ShippingRate {
        uuid: row.try_get("uuid")?,
        method: row.try_get("shipping_method_uuid")?,
        name: row.try_get("name")?,
        location: Destination::new(country.as_deref(), region.as_deref(), city.as_deref()),
        weight_min: row.try_get("weight_min")?,
        weight_max: row.try_get("weight_max")?,
        base_rate: row.try_get("base_rate")?,
        incremental_rate: row.try_get("incremental_rate")?,
        currency: prices::currency(&currency).map_err(|e| decode_error("currency", e))?,
    })
}

fn tax_rate_from_row(row: &PgRow) -> Result<TaxRate, sqlx::Error> {
    Ok(TaxRate {
        uuid: row.try_get("uuid")?,
        tax_class: row.try_get("tax_class_uuid")?,
        tax_class_name: row.try_get("tax_class_name")?,
        country: row.try_get("country")?,
        state: row.try_get("state")?,
        rate: row.try_get("rate")?,
        active: row.try_get("active")?,
    })
}
