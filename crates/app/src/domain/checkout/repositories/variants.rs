//! Variants Repository

use rust_decimal::Decimal;
use sqlx::{Postgres, Row, Transaction, postgres::PgRow, query};
use storefront::weights::{Weight, WeightUnit};

use crate::domain::checkout::records::VariantRecord;

use super::decode_error;

const FIND_VARIANTS_BY_ALIAS_SQL: &str = include_str!("../sql/find_variants_by_alias.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgVariantsRepository;

impl PgVariantsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn find_by_aliases(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        aliases: &[String],
    ) -> Result<Vec<VariantRecord>, sqlx::Error> {
        let rows = query(FIND_VARIANTS_BY_ALIAS_SQL)
            .bind(aliases)
            .fetch_all(&mut **tx)
            .await?;

        rows.iter().map(variant_from_row).collect()
    }
}

fn variant_from_row(row: &PgRow) -> Result<VariantRecord, sqlx::Error> {
    let weight_value: Option<Decimal> = row.try_get("weight_value")?;
    let weight_unit: Option<String> = row.try_get("weight_unit")?;

    let weight = match (weight_value, weight_unit) {
        (Some(value), Some(unit)) => Some(Weight::new(
            value,
            unit.parse::<WeightUnit>()
                .map_err(|e| decode_error("weight_unit", e))?,
        )),
        (Some(value), None) => Some(Weight::kilograms(value)),
        (None, _) => None,
    };

    Ok(VariantRecord {
        uuid: row.try_get("uuid")?,
        alias: row.try_get("alias")?,
        product: row.try_get("product_uuid")?,
        price: row.try_get("price")?,
        currency: row.try_get::<String, _>("currency")?.trim().to_string(),
        weight,
        tax_class: row.try_get("tax_class_uuid")?,
    })
}
