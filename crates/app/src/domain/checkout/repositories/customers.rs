//! Customers Repository

use jiff::Timestamp;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use rust_decimal::Decimal;
use sqlx::{Postgres, Transaction, query_as, query_scalar};
use storefront::orders::OrderStatus;
use uuid::Uuid;

use crate::domain::checkout::records::CustomerRecord;

const FIND_CUSTOMER_SQL: &str = include_str!("../sql/find_customer.sql");
const SUM_CUSTOMER_PURCHASES_SQL: &str = include_str!("../sql/sum_customer_purchases.sql");
const CUSTOMER_PURCHASED_PRODUCTS_SQL: &str =
    include_str!("../sql/customer_purchased_products.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgCustomersRepository;

impl PgCustomersRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn find(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        customer: Uuid,
    ) -> Result<Option<CustomerRecord>, sqlx::Error> {
        let row: Option<(Uuid, SqlxTimestamp)> = query_as(FIND_CUSTOMER_SQL)
            .bind(customer)
            .fetch_optional(&mut **tx)
            .await?;

        Ok(row.map(|(uuid, registered_at)| CustomerRecord {
            uuid,
            registered_at: registered_at.to_jiff(),
        }))
    }

    /// Customer-currency total of shipped or delivered orders placed since `since`.
    pub(crate) async fn purchase_total_since(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        customer: Uuid,
        since: Timestamp,
    ) -> Result<Decimal, sqlx::Error> {
        query_scalar(SUM_CUSTOMER_PURCHASES_SQL)
            .bind(customer)
            .bind(statuses(&OrderStatus::FULFILLED))
            .bind(SqlxTimestamp::from(since))
            .fetch_one(&mut **tx)
            .await
    }

    /// Whether a pending, shipped or delivered order of the customer contains any of `products`.
    pub(crate) async fn purchased_any(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        customer: Uuid,
        products: &[Uuid],
    ) -> Result<bool, sqlx::Error> {
        query_scalar(CUSTOMER_PURCHASED_PRODUCTS_SQL)
            .bind(customer)
            .bind(statuses(&OrderStatus::PURCHASED))
            .bind(products)
            .fetch_one(&mut **tx)
            .await
    }
}

fn statuses(statuses: &[OrderStatus]) -> Vec<&'static str> {
    statuses.iter().map(|status| status.as_str()).collect()
}
