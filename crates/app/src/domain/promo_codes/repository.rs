//! Promo Codes Repository

use std::str::FromStr;

use jiff::SignedDuration;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use rust_decimal::Decimal;
use rustc_hash::FxHashSet;
use sqlx::{Postgres, Row, Transaction, postgres::PgRow, query, query_as, query_scalar};
use storefront::promo_codes::{PromoCode, PromoCodeKind};
use uuid::Uuid;

use crate::domain::promo_codes::records::{PromoCodeRecord, PromoCodeUuid, RedemptionLimits};

const FIND_PROMO_CODE_BY_CODE_SQL: &str = include_str!("sql/find_promo_code_by_code.sql");
const LIST_PROMO_CODE_CUSTOMERS_SQL: &str = include_str!("sql/list_promo_code_customers.sql");
const LIST_PROMO_CODE_PRODUCTS_SQL: &str = include_str!("sql/list_promo_code_products.sql");
const COUNT_PROMO_CODE_REDEMPTIONS_SQL: &str =
    include_str!("sql/count_promo_code_redemptions.sql");
const COUNT_CUSTOMER_REDEMPTIONS_SQL: &str = include_str!("sql/count_customer_redemptions.sql");
const LOCK_PROMO_CODE_SQL: &str = include_str!("sql/lock_promo_code.sql");
const CREATE_PROMO_CODE_USAGE_SQL: &str = include_str!("sql/create_promo_code_usage.sql");
const CREATE_PROMO_CODE_SQL: &str = include_str!("sql/create_promo_code.sql");
const CREATE_PROMO_CODE_CUSTOMERS_SQL: &str = include_str!("sql/create_promo_code_customers.sql");
const CREATE_PROMO_CODE_PRODUCTS_SQL: &str = include_str!("sql/create_promo_code_products.sql");

const COLUMN_REDEMPTION_LIMIT: &str = "redemption_limit";
const COLUMN_USAGE_LIMIT_PER_CUSTOMER: &str = "usage_limit_per_customer";
const COLUMN_COUNT: &str = "count";

#[derive(Debug, Clone, Default)]
pub(crate) struct PgPromoCodesRepository;

impl PgPromoCodesRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    /// Find a promo code, with its eligibility sets, by its normalised code.
    pub(crate) async fn find_by_code(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        code: &str,
    ) -> Result<Option<PromoCode>, sqlx::Error> {
        let Some(row) = query(FIND_PROMO_CODE_BY_CODE_SQL)
            .bind(code)
            .fetch_optional(&mut **tx)
            .await?
        else {
            return Ok(None);
        };

        let mut promo_code = promo_code_from_row(&row)?;

        let customers: Vec<Uuid> = query_scalar(LIST_PROMO_CODE_CUSTOMERS_SQL)
            .bind(promo_code.uuid)
            .fetch_all(&mut **tx)
            .await?;

        let products: Vec<Uuid> = query_scalar(LIST_PROMO_CODE_PRODUCTS_SQL)
            .bind(promo_code.uuid)
            .fetch_all(&mut **tx)
            .await?;

        promo_code.eligible_customers = customers.into_iter().collect::<FxHashSet<_>>();
        promo_code.applicable_products = products.into_iter().collect::<FxHashSet<_>>();

        Ok(Some(promo_code))
    }

    pub(crate) async fn count_redemptions(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        promo_code: PromoCodeUuid,
    ) -> Result<u64, sqlx::Error> {
        let count: i64 = query_scalar(COUNT_PROMO_CODE_REDEMPTIONS_SQL)
            .bind(promo_code.into_uuid())
            .fetch_one(&mut **tx)
            .await?;

        try_u64_from_i64(count, COLUMN_COUNT)
    }

    pub(crate) async fn count_customer_redemptions(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        promo_code: PromoCodeUuid,
        customer: Uuid,
    ) -> Result<u64, sqlx::Error> {
        let count: i64 = query_scalar(COUNT_CUSTOMER_REDEMPTIONS_SQL)
            .bind(promo_code.into_uuid())
            .bind(customer)
            .fetch_one(&mut **tx)
            .await?;

        try_u64_from_i64(count, COLUMN_COUNT)
    }

    /// Lock the promo code row for the rest of the transaction.
    pub(crate) async fn lock(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        promo_code: PromoCodeUuid,
    ) -> Result<RedemptionLimits, sqlx::Error> {
        let (redemption_limit, usage_limit_per_customer): (Option<i32>, i32) =
            query_as(LOCK_PROMO_CODE_SQL)
                .bind(promo_code.into_uuid())
                .fetch_one(&mut **tx)
                .await?;

        Ok(RedemptionLimits {
            redemption_limit: redemption_limit
                .map(|limit| try_u32_from_i32(limit, COLUMN_REDEMPTION_LIMIT))
                .transpose()?,
            usage_limit_per_customer: try_u32_from_i32(
                usage_limit_per_customer,
                COLUMN_USAGE_LIMIT_PER_CUSTOMER,
            )?,
        })
    }

    /// Insert a usage record if neither limit has been reached.
    ///
    /// Returns `false` when a limit blocked the insert.
    pub(crate) async fn record_usage(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        promo_code: PromoCodeUuid,
        customer: Option<Uuid>,
        order: Uuid,
    ) -> Result<bool, sqlx::Error> {
        let rows_affected = query(CREATE_PROMO_CODE_USAGE_SQL)
            .bind(Uuid::now_v7())
            .bind(promo_code.into_uuid())
            .bind(customer)
            .bind(order)
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected == 1)
    }

    pub(crate) async fn create_promo_code(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        promo_code: &PromoCode,
    ) -> Result<PromoCodeRecord, sqlx::Error> {
        let redemption_limit = promo_code
            .redemption_limit
            .map(|limit| try_i32_from_u32(limit, COLUMN_REDEMPTION_LIMIT))
            .transpose()?;

        let usage_limit_per_customer = try_i32_from_u32(
            promo_code.usage_limit_per_customer,
            COLUMN_USAGE_LIMIT_PER_CUSTOMER,
        )?;

        let (uuid, code, created_at): (Uuid, String, SqlxTimestamp) =
            query_as(CREATE_PROMO_CODE_SQL)
                .bind(promo_code.uuid)
                .bind(&promo_code.code)
                .bind(promo_code.kind.as_str())
                .bind(promo_code.value)
                .bind(promo_code.expires_at.map(SqlxTimestamp::from))
                .bind(promo_code.active)
                .bind(promo_code.min_purchase_amount)
                .bind(promo_code.min_purchase_period.map(|period| period.as_secs()))
                .bind(redemption_limit)
                .bind(usage_limit_per_customer)
                .bind(promo_code.new_customers_only)
                .fetch_one(&mut **tx)
                .await?;

        if !promo_code.eligible_customers.is_empty() {
            let customers: Vec<Uuid> = promo_code.eligible_customers.iter().copied().collect();

            query(CREATE_PROMO_CODE_CUSTOMERS_SQL)
                .bind(uuid)
                .bind(customers)
                .execute(&mut **tx)
                .await?;
        }

        if !promo_code.applicable_products.is_empty() {
            let products: Vec<Uuid> = promo_code.applicable_products.iter().copied().collect();

            query(CREATE_PROMO_CODE_PRODUCTS_SQL)
                .bind(uuid)
                .bind(products)
                .execute(&mut **tx)
                .await?;
        }

        Ok(PromoCodeRecord {
            uuid: PromoCodeUuid::from_uuid(uuid),
            code,
            created_at: created_at.to_jiff(),
        })
    }
}

fn promo_code_from_row(row: &PgRow) -> Result<PromoCode, sqlx::Error> {
    let kind: String = row.try_get("kind")?;

    let kind = PromoCodeKind::from_str(&kind).map_err(|e| sqlx::Error::ColumnDecode {
        index: "kind".to_string(),
        source: Box::new(e),
    })?;

    let code: String = row.try_get("code")?;
    let value: Decimal = row.try_get("value")?;

    let mut promo_code = PromoCode::new(row.try_get("uuid")?, &code, kind, value);

    promo_code.expires_at = row
        .try_get::<Option<SqlxTimestamp>, _>("expires_at")?
        .map(SqlxTimestamp::to_jiff);
    promo_code.active = row.try_get("active")?;
    promo_code.min_purchase_amount = row.try_get("min_purchase_amount")?;
    promo_code.min_purchase_period = row
        .try_get::<Option<i64>, _>("min_purchase_period_seconds")?
        .map(SignedDuration::from_secs);
    promo_code.redemption_limit = row
        .try_get::<Option<i32>, _>(COLUMN_REDEMPTION_LIMIT)?
        .map(|limit| try_u32_from_i32(limit, COLUMN_REDEMPTION_LIMIT))
        .transpose()?;
    promo_code.usage_limit_per_customer = try_u32_from_i32(
        row.try_get(COLUMN_USAGE_LIMIT_PER_CUSTOMER)?,
        COLUMN_USAGE_LIMIT_PER_CUSTOMER,
    )?;
    promo_code.new_customers_only = row.try_get("new_customers_only")?;

    Ok(promo_code)
}

pub(crate) fn try_u64_from_i64(value: i64, column: &'static str) -> Result<u64, sqlx::Error> {
    u64::try_from(value).map_err(|e| sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(e),
    })
}

fn try_u32_from_i32(value: i32, column: &'static str) -> Result<u32, sqlx::Error> {
    u32::try_from(value).map_err(|e| sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(e),
    })
}

fn try_i32_from_u32(value: u32, column: &'static str) -> Result<i32, sqlx::Error> {
    i32::try_from(value).map_err(|e| sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(e),
    })
}
